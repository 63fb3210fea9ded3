//! Domain core for the Adsight Google Ads sync backend.
//!
//! This crate holds the database-agnostic domain: models, repository and
//! service traits, and the service implementations for OAuth connections,
//! the advertiser-customer registry, sync-job bookkeeping, and the stored
//! performance entities. Storage specifics live in
//! `adsight-storage-sqlite`; upstream API specifics live in `adsight-gads`;
//! sync orchestration lives in `adsight-connect`.

pub mod connections;
pub mod constants;
pub mod customers;
pub mod errors;
pub mod identity;
pub mod search_terms;
pub mod structure;
pub mod sync;

pub use errors::{DatabaseError, Error, Result, ValidationError};
