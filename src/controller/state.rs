//! List state aggregate and its reducer

use crate::core::field::RecordField;
use crate::core::filter::EmptyReason;
use crate::core::paginate::clamp_page;
use crate::core::query::{SearchCriterion, SortSpec};
use std::num::NonZeroUsize;

/// One triggering event from a list control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    /// Search form submitted
    Search(SearchCriterion),
    /// Column header clicked
    SortBy(RecordField),
    /// Page size selector changed
    SetPageSize(NonZeroUsize),
    /// Pager clicked (1-based)
    GoToPage(usize),
}

/// Everything the pipeline needs to produce the displayed page
///
/// `total_pages` is derived: only [`ListState::settle`] writes it, from the
/// result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    criterion: SearchCriterion,
    sort: SortSpec,
    page_size: NonZeroUsize,
    page: usize,
    total_pages: usize,
}

impl ListState {
    pub fn new(sort: SortSpec, page_size: NonZeroUsize) -> Self {
        Self {
            criterion: SearchCriterion::none(),
            sort,
            page_size,
            page: 1,
            total_pages: 0,
        }
    }

    pub fn criterion(&self) -> &SearchCriterion {
        &self.criterion
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Apply one control event
    ///
    /// Changing the criterion, the sort or the page size resets the page to 1.
    /// A page request is kept as asked (at least 1); the next run clamps it
    /// against the page count it computes.
    pub fn apply(&mut self, action: ListAction) {
        match action {
            ListAction::Search(criterion) => {
                self.criterion = criterion;
                self.page = 1;
            }
            ListAction::SortBy(field) => {
                self.sort = self.sort.toggle(field);
                self.page = 1;
            }
            ListAction::SetPageSize(size) => {
                self.page_size = size;
                self.page = 1;
            }
            ListAction::GoToPage(page) => {
                self.page = page.max(1);
            }
        }
    }

    /// Record the page count a pipeline run produced and pull the page back in range
    pub(crate) fn settle(&mut self, total_pages: usize) {
        self.total_pages = total_pages;
        self.page = clamp_page(self.page, total_pages);
    }
}

/// What the list area should show besides the rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    /// A pipeline run is outstanding
    Loading,
    /// Rows are displayed
    Ready,
    /// Nothing to show, for the given reason
    Empty(EmptyReason),
    /// A fetch or mutation failed
    Failed(String),
}

impl ListStatus {
    /// Message for the overlay, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            ListStatus::Loading | ListStatus::Ready => None,
            ListStatus::Empty(reason) => Some(reason.message()),
            ListStatus::Failed(message) => Some(message),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListStatus::Loading)
    }
}
