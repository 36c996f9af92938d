//! Core module containing the record model, the list pipeline stages and the store seam

pub mod error;
pub mod events;
pub mod field;
pub mod filter;
pub mod mutation;
pub mod paginate;
pub mod query;
pub mod record;
pub mod service;
pub mod sort;

pub use error::{
    ConfigError, DirectoryError, FieldValidationError, RecordError, StoreError, ValidationError,
};
pub use events::{DirectoryEvent, EventBus, EventEnvelope};
pub use field::{FieldFormat, RecordField};
pub use filter::{EmptyReason, FilterOutcome, apply_filter};
pub use mutation::{Clock, FixedClock, RecordMutator, SystemClock};
pub use paginate::{clamp_page, page, page_count, paginate};
pub use query::{NONE_SENTINEL, PageInfo, SearchCriterion, SortDirection, SortSpec};
pub use record::{Address, RecordBody, RecordId, UserForm, UserRecord};
pub use service::UserStore;
pub use sort::{collate, sort_records};
