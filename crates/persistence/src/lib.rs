// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the market participant store.
//!
//! [`Persistence`] implements every repository trait of the
//! `market-participant` core on top of Diesel and `SQLite`, so the command
//! handlers and jobs run unchanged against a real database.
//!
//! ## Transactions
//!
//! A unit of work is a `BEGIN IMMEDIATE` transaction. The write lock is taken
//! when the unit of work begins, so concurrent writers run one after the
//! other and each sees the reservations the previous one committed.
//!
//! ## Reservation ledger
//!
//! `market_role_grid_area_reservations` has the primary key
//! `(eic_function, grid_area_id)`. A reservation is an insert-or-ignore
//! followed by reading back the owner.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives every caller its own shared-cache
//! in-memory database with all migrations applied.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use data_models::StoredDomainEvent;
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite` backed store for actors, reservations, delegations,
/// consolidations and the domain event outbox.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_market_participant_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // WAL lets the jobs binary read while another process writes.
        backend::sqlite::enable_wal_mode(&mut conn)?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Domain event outbox
    // ========================================================================

    /// Retrieves up to `limit` unpublished domain events, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored payload is invalid.
    pub fn get_unpublished_domain_events(
        &mut self,
        limit: i64,
    ) -> Result<Vec<StoredDomainEvent>, PersistenceError> {
        queries::events::get_unpublished_events(&mut self.conn, limit)
    }

    /// Retrieves every domain event stored for one aggregate, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored payload is invalid.
    pub fn get_domain_events_for_aggregate(
        &mut self,
        aggregate_id: &str,
    ) -> Result<Vec<StoredDomainEvent>, PersistenceError> {
        queries::events::get_events_for_aggregate(&mut self.conn, aggregate_id)
    }

    /// Marks domain events as published.
    ///
    /// # Returns
    ///
    /// The number of events updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_domain_events_published(
        &mut self,
        event_ids: &[i64],
        published_at: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        mutations::events::mark_events_published(&mut self.conn, event_ids, published_at)
    }
}
