//! The list controller: sole owner of the list state and the displayed page

use crate::config::{DirectoryConfig, ReconcileMode};
use crate::controller::pipeline::{PipelineRun, RunOutcome};
use crate::controller::state::{ListAction, ListState, ListStatus};
use crate::core::error::{DirectoryError, ValidationError};
use crate::core::events::{DirectoryEvent, EventBus};
use crate::core::field::RecordField;
use crate::core::filter::EmptyReason;
use crate::core::mutation::{Clock, RecordMutator};
use crate::core::query::{PageInfo, SearchCriterion, SortSpec};
use crate::core::record::{RecordId, UserForm, UserRecord};
use crate::core::service::UserStore;
use anyhow::Result;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Shown when a pipeline fetch fails
pub const FETCH_FAILED: &str = "Failed to fetch";

const CREATE_FAILED: &str = "Failed to create user";
const UPDATE_FAILED: &str = "Failed to update user";
const DELETE_FAILED: &str = "Failed to delete user";

/// Drives the fetch, filter, sort and paginate pipeline for one list view
///
/// Every control event goes through [`ListController::dispatch`] (or one of
/// its shorthands), which updates [`ListState`] and re-runs the pipeline.
/// Runs are numbered; a completion older than the latest started run is
/// dropped.
///
/// After a successful mutation the displayed page is patched in place by
/// default, without re-running the pipeline. Configure
/// [`ReconcileMode::Refetch`] to re-run it instead.
pub struct ListController {
    store: Arc<dyn UserStore>,
    mutator: RecordMutator,
    state: ListState,
    records: Vec<UserRecord>,
    page_info: PageInfo,
    /// Matching records in the store, as of the last run plus local patches
    known_total: usize,
    status: ListStatus,
    latest_generation: u64,
    reconcile: ReconcileMode,
    events: Option<EventBus>,
}

impl ListController {
    pub fn new(store: Arc<dyn UserStore>, sort: SortSpec, page_size: NonZeroUsize) -> Self {
        Self {
            mutator: RecordMutator::new(store.clone()),
            store,
            state: ListState::new(sort, page_size),
            records: Vec::new(),
            page_info: PageInfo::empty(page_size.get()),
            known_total: 0,
            status: ListStatus::Loading,
            latest_generation: 0,
            reconcile: ReconcileMode::default(),
            events: None,
        }
    }

    /// Controller with the configured default sort, page size and reconcile
    /// mode, publishing on a fresh event bus
    pub fn from_config(store: Arc<dyn UserStore>, config: &DirectoryConfig) -> Self {
        Self::new(store, config.default_sort, config.page_size())
            .with_reconcile(config.reconcile)
            .with_event_bus(EventBus::new(config.event_capacity))
    }

    /// Use `clock` for mutation timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.mutator = RecordMutator::with_clock(self.store.clone(), clock);
        self
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_reconcile(mut self, reconcile: ReconcileMode) -> Self {
        self.reconcile = reconcile;
        self
    }

    pub fn store(&self) -> Arc<dyn UserStore> {
        self.store.clone()
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.events.as_ref()
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Records of the displayed page
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    /// Displayed record with the given id, for the detail, edit and delete dialogs
    pub fn record(&self, id: &RecordId) -> Option<&UserRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Update the state without running the pipeline
    pub fn apply(&mut self, action: ListAction) {
        self.state.apply(action);
    }

    /// Start a pipeline run on the current state
    ///
    /// Marks the view as loading. Any run started earlier becomes stale.
    pub fn begin_run(&mut self) -> PipelineRun {
        self.latest_generation += 1;
        self.status = ListStatus::Loading;
        tracing::debug!(generation = self.latest_generation, "pipeline run started");
        PipelineRun::new(self.latest_generation, &self.state)
    }

    /// Apply a finished run, unless a newer one has started since
    ///
    /// Returns `Ok(false)` for a dropped stale run. A failed fetch of the
    /// latest run sets [`ListStatus::Failed`] and is returned as the error.
    pub fn complete_run(&mut self, outcome: RunOutcome) -> Result<bool> {
        if outcome.generation < self.latest_generation {
            tracing::warn!(
                generation = outcome.generation,
                latest = self.latest_generation,
                "discarding stale pipeline run"
            );
            self.publish(DirectoryEvent::RunDiscarded {
                generation: outcome.generation,
                latest: self.latest_generation,
            });
            return Ok(false);
        }

        let page = match outcome.result {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(generation = outcome.generation, error = %e, "fetch failed");
                self.status = ListStatus::Failed(FETCH_FAILED.to_string());
                self.publish(DirectoryEvent::Failed {
                    message: FETCH_FAILED.to_string(),
                });
                return Err(e);
            }
        };

        self.state.settle(page.info.total_pages);
        self.status = match page.empty {
            Some(reason) => ListStatus::Empty(reason),
            None => ListStatus::Ready,
        };
        tracing::info!(
            generation = outcome.generation,
            total = page.info.total,
            pages = page.info.total_pages,
            page = page.info.page,
            "pipeline run applied"
        );
        self.publish(DirectoryEvent::PageLoaded {
            generation: outcome.generation,
            page: page.info.page,
            total_pages: page.info.total_pages,
            records: page.records.len(),
            empty: page.empty,
        });

        self.known_total = page.info.total;
        self.records = page.records;
        self.page_info = page.info;
        Ok(true)
    }

    /// Run the pipeline on the current state and apply the result
    pub async fn refresh(&mut self) -> Result<()> {
        let run = self.begin_run();
        let outcome = run.execute(self.store.as_ref()).await;
        self.complete_run(outcome).map(|_| ())
    }

    /// Apply a control event and re-run the pipeline
    pub async fn dispatch(&mut self, action: ListAction) -> Result<()> {
        self.state.apply(action);
        self.refresh().await
    }

    /// Search form submitted with `field` as a wire name, a column label or
    /// the "not selected" sentinel
    pub async fn search(&mut self, query: &str, field: &str) -> Result<()> {
        let criterion = SearchCriterion::parse(query, field).map_err(DirectoryError::from)?;
        self.dispatch(ListAction::Search(criterion)).await
    }

    /// Column header clicked
    pub async fn sort_by(&mut self, field: RecordField) -> Result<()> {
        self.dispatch(ListAction::SortBy(field)).await
    }

    /// Column header clicked, identified by its label or wire name
    pub async fn sort_by_name(&mut self, name: &str) -> Result<()> {
        let field: RecordField = name.parse().map_err(DirectoryError::from)?;
        self.sort_by(field).await
    }

    pub async fn set_page_size(&mut self, page_size: NonZeroUsize) -> Result<()> {
        self.dispatch(ListAction::SetPageSize(page_size)).await
    }

    /// Pager clicked; pages start at 1 and a page past the end shows the last one
    pub async fn go_to_page(&mut self, page: usize) -> Result<()> {
        if page == 0 {
            return Err(DirectoryError::from(ValidationError::InvalidPage {
                page,
                message: "pages start at 1".to_string(),
            })
            .into());
        }
        self.dispatch(ListAction::GoToPage(page)).await
    }

    /// Create a record and mirror it locally
    pub async fn create(&mut self, form: UserForm) -> Result<UserRecord> {
        let created = match self.mutator.create(form).await {
            Ok(created) => created,
            Err(e) => return Err(self.mutation_failed(CREATE_FAILED, e)),
        };

        if self.reconcile == ReconcileMode::Refetch {
            self.refetch_after_mutation().await;
        } else {
            match self.records.iter_mut().find(|r| r.id == created.id) {
                Some(existing) => *existing = created.clone(),
                None => {
                    self.records.push(created.clone());
                    self.known_total += 1;
                }
            }
            self.settle_patched_status();
        }

        self.publish(DirectoryEvent::RecordCreated {
            id: created.id.clone(),
        });
        Ok(created)
    }

    /// Update a record and replace it locally
    pub async fn update(&mut self, id: &RecordId, form: UserForm) -> Result<UserRecord> {
        let updated = match self.mutator.update(id, form).await {
            Ok(updated) => updated,
            Err(e) => return Err(self.mutation_failed(UPDATE_FAILED, e)),
        };

        if self.reconcile == ReconcileMode::Refetch {
            self.refetch_after_mutation().await;
        } else {
            if let Some(existing) = self.records.iter_mut().find(|r| &r.id == id) {
                *existing = updated.clone();
            }
            self.settle_patched_status();
        }

        self.publish(DirectoryEvent::RecordUpdated { id: id.clone() });
        Ok(updated)
    }

    /// Delete a record and remove it locally
    pub async fn delete(&mut self, id: &RecordId) -> Result<()> {
        if let Err(e) = self.mutator.delete(id).await {
            return Err(self.mutation_failed(DELETE_FAILED, e));
        }

        if self.reconcile == ReconcileMode::Refetch {
            self.refetch_after_mutation().await;
        } else {
            let shown = self.records.len();
            self.records.retain(|r| &r.id != id);
            if self.records.len() < shown {
                self.known_total = self.known_total.saturating_sub(1);
            }
            self.settle_patched_status();
        }

        self.publish(DirectoryEvent::RecordDeleted { id: id.clone() });
        Ok(())
    }

    async fn refetch_after_mutation(&mut self) {
        // The write already succeeded; a failed refetch only shows in the status
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "refetch after mutation failed");
        }
    }

    /// Status of a patched page; counts and page bounds stay as of the last run
    ///
    /// An emptied page is only reported empty when nothing is left to show on
    /// any page. Otherwise the rows come back on the next run.
    fn settle_patched_status(&mut self) {
        self.status = if !self.records.is_empty() || self.known_total > 0 {
            ListStatus::Ready
        } else if self.state.criterion().is_active() {
            ListStatus::Empty(EmptyReason::NoMatch)
        } else {
            ListStatus::Empty(EmptyReason::NoRecords)
        };
    }

    fn mutation_failed(&mut self, message: &str, error: anyhow::Error) -> anyhow::Error {
        tracing::error!(error = %error, "{}", message);
        self.status = ListStatus::Failed(message.to_string());
        self.publish(DirectoryEvent::Failed {
            message: message.to_string(),
        });
        error
    }

    fn publish(&self, event: DirectoryEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}
