//! Sync job storage.

mod model;
mod repository;

pub use model::SyncJobDB;
pub use repository::SyncJobRepository;
