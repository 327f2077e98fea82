//! Per-account refund boundaries: storage, the record aggregate, and the manager that enforces
//! their lifecycle.

pub mod manager;
pub mod record;
pub mod store;

pub use manager::BoundaryManager;
pub use record::{BoundaryRecord, RecipientSet};
pub use store::{BoundaryStore, InMemoryBoundaryStore};
