// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain event outbox and entity lock mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use market_participant_domain::DomainEvent;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::data_models::format_instant;
use crate::diesel_schema::{domain_events, entity_locks};
use crate::error::PersistenceError;

/// Appends events to the outbox.
///
/// # Errors
///
/// Returns an error if an event cannot be serialized or stored.
pub fn enqueue_events(
    conn: &mut SqliteConnection,
    aggregate_id: &str,
    events: &[DomainEvent],
) -> Result<(), PersistenceError> {
    for event in events {
        let payload_json: String = serde_json::to_string(event)?;
        diesel::insert_into(domain_events::table)
            .values((
                domain_events::aggregate_id.eq(aggregate_id),
                domain_events::event_type.eq(event.name()),
                domain_events::payload_json.eq(&payload_json),
            ))
            .execute(conn)?;
        debug!("Enqueued {} for {}", event.name(), aggregate_id);
    }
    Ok(())
}

/// Marks outbox events as published.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn mark_events_published(
    conn: &mut SqliteConnection,
    event_ids: &[i64],
    published_at: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(
        domain_events::table.filter(domain_events::event_id.eq_any(event_ids.to_vec())),
    )
    .set(domain_events::published_at.eq(Some(format_instant(published_at)?)))
    .execute(conn)?;
    info!("Marked {} domain events as published", updated);
    Ok(updated)
}

/// Takes the lock row for `entity`, creating it if missing.
///
/// Inside a `BEGIN IMMEDIATE` transaction the database write lock is already
/// held; the update records the lock and fails fast if the row is unusable.
///
/// # Errors
///
/// Returns an error if the database statement fails.
pub fn lock_entity(conn: &mut SqliteConnection, entity: &str) -> Result<(), PersistenceError> {
    diesel::insert_or_ignore_into(entity_locks::table)
        .values((entity_locks::entity.eq(entity), entity_locks::lock_count.eq(0_i64)))
        .execute(conn)?;
    diesel::update(entity_locks::table.filter(entity_locks::entity.eq(entity)))
        .set(entity_locks::lock_count.eq(entity_locks::lock_count + 1_i64))
        .execute(conn)?;
    debug!("Locked {}", entity);
    Ok(())
}
