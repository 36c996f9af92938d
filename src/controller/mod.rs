//! List controller: state reducer, pipeline runs and mutation reconciliation

pub mod list;
pub mod pipeline;
pub mod state;

pub use list::{FETCH_FAILED, ListController};
pub use pipeline::{PageResult, PipelineRun, RunOutcome};
pub use state::{ListAction, ListState, ListStatus};
