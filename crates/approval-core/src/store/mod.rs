//! Profile store: approval and live tables per role

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileProfileStore;
pub use memory::InMemoryProfileStore;
pub use traits::{ProfileStore, PromotionIntent, StoreResult, UpsertOutcome};
