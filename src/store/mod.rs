//! Persistence seam of the engine.

pub mod in_memory;
pub mod provider;

pub use in_memory::InMemoryStore;
pub use provider::{StoreError, StudyStore};
