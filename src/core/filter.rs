//! Filter engine: case-insensitive equality on one field

use crate::core::query::SearchCriterion;
use crate::core::record::UserRecord;
use serde::{Deserialize, Serialize};

/// Why a pipeline run has nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The store holds no records and no filter was applied
    NoRecords,
    /// A filter was applied and nothing matched
    NoMatch,
}

impl EmptyReason {
    /// User-facing message
    pub fn message(self) -> &'static str {
        match self {
            EmptyReason::NoRecords => "There is no users yet.",
            EmptyReason::NoMatch => "Sorry, we couldn't find what you're looking for.",
        }
    }
}

/// Records that survived the filter, and whether a filter ran at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub records: Vec<UserRecord>,
    pub applied: bool,
}

impl FilterOutcome {
    /// `Some` when there is nothing to show
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match (self.records.is_empty(), self.applied) {
            (false, _) => None,
            (true, true) => Some(EmptyReason::NoMatch),
            (true, false) => Some(EmptyReason::NoRecords),
        }
    }
}

/// Keep the records whose chosen field equals the query, ignoring case
///
/// An inactive criterion passes every record through unchanged. A record
/// missing the chosen field never matches.
pub fn apply_filter(records: Vec<UserRecord>, criterion: &SearchCriterion) -> FilterOutcome {
    let Some(field) = criterion.field().filter(|_| criterion.is_active()) else {
        return FilterOutcome {
            records,
            applied: false,
        };
    };

    let needle = criterion.query().to_lowercase();
    let records = records
        .into_iter()
        .filter(|record| {
            record
                .field_value(field)
                .is_some_and(|value| value.to_lowercase() == needle)
        })
        .collect();

    FilterOutcome {
        records,
        applied: true,
    }
}
