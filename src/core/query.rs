//! Search criterion, sort specification and page metadata

use crate::core::error::ValidationError;
use crate::core::field::RecordField;
use serde::{Deserialize, Serialize};

/// Field name the search control sends when no field is chosen
pub const NONE_SENTINEL: &str = "not selected";

/// The active search field and query
///
/// A criterion without a field (the "none" sentinel) or with an empty query
/// applies no filter at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriterion {
    field: Option<RecordField>,
    query: String,
}

impl SearchCriterion {
    /// No filter
    pub fn none() -> Self {
        Self::default()
    }

    /// Equality search on `field`; the query is trimmed
    pub fn new(field: RecordField, query: impl AsRef<str>) -> Self {
        Self {
            field: Some(field),
            query: query.as_ref().trim().to_string(),
        }
    }

    /// Parse the (query, field-name) pair a search control submits
    ///
    /// The field may be a wire name, a column label or [`NONE_SENTINEL`].
    pub fn parse(query: &str, field: &str) -> Result<Self, ValidationError> {
        let field = field.trim();
        if field.is_empty() || field == NONE_SENTINEL {
            return Ok(Self {
                field: None,
                query: query.trim().to_string(),
            });
        }
        Ok(Self::new(field.parse()?, query))
    }

    pub fn field(&self) -> Option<RecordField> {
        self.field
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether running this criterion narrows the record set
    pub fn is_active(&self) -> bool {
        self.field.is_some() && !self.query.is_empty()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc", alias = "ASC", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "DESC", alias = "descending")]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The active sort field and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: RecordField,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: RecordField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: RecordField) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    /// Result of clicking the column for `field`
    ///
    /// The active field flips direction; any other field becomes active ascending.
    pub fn toggle(self, field: RecordField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.reversed())
        } else {
            Self::ascending(field)
        }
    }
}

/// Oldest first
impl Default for SortSpec {
    fn default() -> Self {
        Self::ascending(RecordField::CreatedAt)
    }
}

/// Metadata describing one materialized page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PageInfo {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page_size = page_size.max(1);
        let page = page.max(1);
        let total_pages = total.div_ceil(page_size);

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Metadata for a pipeline that produced nothing
    pub fn empty(page_size: usize) -> Self {
        Self::new(1, page_size, 0)
    }
}
