//! SQLite storage implementation for Adsight.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `adsight-core` and contains:
//! - Database connection pooling and the single-writer actor
//! - Embedded Diesel migrations
//! - Repository implementations for connections, customers, sync jobs,
//!   search terms, and the campaign/ad-group/keyword structure
//! - The token cipher applied at the persistence boundary
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. All other crates (`core`, `connect`) are database-agnostic and
//! work with traits.
//!
//! ```text
//! core (domain)          connect (sync)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod crypto;
pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod connections;
pub mod customers;
pub mod search_terms;
pub mod structure;
pub mod sync_jobs;


// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export the token cipher and storage errors
pub use crypto::TokenCipher;
pub use errors::{IntoCore, StorageError};

// Re-export from adsight-core for convenience
pub use adsight_core::errors::{DatabaseError, Error, Result};
