// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain event outbox queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{DomainEventRow, StoredDomainEvent};
use crate::diesel_schema::domain_events;
use crate::error::PersistenceError;

/// Retrieves unpublished events in the order they were stored.
///
/// # Errors
///
/// Returns an error if the database query fails or a payload cannot be decoded.
pub fn get_unpublished_events(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<StoredDomainEvent>, PersistenceError> {
    let rows: Vec<DomainEventRow> = domain_events::table
        .filter(domain_events::published_at.is_null())
        .order(domain_events::event_id.asc())
        .limit(limit)
        .select(DomainEventRow::as_select())
        .load(conn)?;
    rows.into_iter().map(DomainEventRow::into_stored).collect()
}

/// Retrieves every event stored for one aggregate, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a payload cannot be decoded.
pub fn get_events_for_aggregate(
    conn: &mut SqliteConnection,
    aggregate_id: &str,
) -> Result<Vec<StoredDomainEvent>, PersistenceError> {
    let rows: Vec<DomainEventRow> = domain_events::table
        .filter(domain_events::aggregate_id.eq(aggregate_id))
        .order(domain_events::event_id.asc())
        .select(DomainEventRow::as_select())
        .load(conn)?;
    rows.into_iter().map(DomainEventRow::into_stored).collect()
}
