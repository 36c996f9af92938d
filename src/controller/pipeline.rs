//! One pipeline run: fetch, filter, sort, paginate, select the current page

use crate::controller::state::ListState;
use crate::core::filter::{EmptyReason, apply_filter};
use crate::core::paginate::{clamp_page, page, page_count};
use crate::core::query::{PageInfo, SearchCriterion, SortSpec};
use crate::core::record::UserRecord;
use crate::core::service::UserStore;
use crate::core::sort::sort_records;
use std::num::NonZeroUsize;

/// Snapshot of the list state taken when a run is triggered
///
/// Carries the generation number the controller uses to drop stale results.
#[derive(Debug, PartialEq, Eq)]
pub struct PipelineRun {
    generation: u64,
    criterion: SearchCriterion,
    sort: SortSpec,
    page_size: NonZeroUsize,
    page: usize,
}

/// The displayed page a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub records: Vec<UserRecord>,
    pub info: PageInfo,
    pub empty: Option<EmptyReason>,
}

/// A finished run, successful or not
#[derive(Debug)]
pub struct RunOutcome {
    pub generation: u64,
    pub result: anyhow::Result<PageResult>,
}

impl PipelineRun {
    pub(crate) fn new(generation: u64, state: &ListState) -> Self {
        Self {
            generation,
            criterion: state.criterion().clone(),
            sort: state.sort(),
            page_size: state.page_size(),
            page: state.page(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fetch the full record set and materialize the page
    ///
    /// Borrows only the store, so a shared controller need not be held
    /// across the fetch.
    pub async fn execute(self, store: &dyn UserStore) -> RunOutcome {
        let result = store.list().await.map(|records| self.materialize(records));
        RunOutcome {
            generation: self.generation,
            result,
        }
    }

    /// Filter, sort and paginate `records`, then select the requested page
    ///
    /// The page index is clamped into the page range so a stale index never
    /// yields an empty page while records exist.
    pub fn materialize(&self, records: Vec<UserRecord>) -> PageResult {
        let filtered = apply_filter(records, &self.criterion);
        let empty = filtered.empty_reason();
        let sorted = sort_records(filtered.records, &self.sort);

        let total_pages = page_count(sorted.len(), self.page_size);
        let current = clamp_page(self.page, total_pages);
        let records = page(&sorted, self.page_size, current)
            .map(<[UserRecord]>::to_vec)
            .unwrap_or_default();

        PageResult {
            records,
            info: PageInfo::new(current, self.page_size.get(), sorted.len()),
            empty,
        }
    }
}
