// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor consolidation queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use market_participant_domain::{ActorConsolidation, ActorConsolidationId, ConsolidationStatus};
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::ConsolidationRow;
use crate::diesel_schema::actor_consolidations;
use crate::error::PersistenceError;

/// Retrieves every consolidation regardless of status.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_consolidations(
    conn: &mut SqliteConnection,
) -> Result<Vec<ActorConsolidation>, PersistenceError> {
    let rows: Vec<ConsolidationRow> = actor_consolidations::table
        .order(actor_consolidations::consolidation_id.asc())
        .select(ConsolidationRow::as_select())
        .load(conn)?;
    rows.into_iter().map(ConsolidationRow::into_domain).collect()
}

/// Retrieves a consolidation by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_consolidation(
    conn: &mut SqliteConnection,
    consolidation_id: ActorConsolidationId,
) -> Result<Option<ActorConsolidation>, PersistenceError> {
    let row: Option<ConsolidationRow> = actor_consolidations::table
        .filter(actor_consolidations::consolidation_id.eq(consolidation_id.to_string()))
        .select(ConsolidationRow::as_select())
        .first(conn)
        .optional()?;
    row.map(ConsolidationRow::into_domain).transpose()
}

/// Retrieves pending consolidations scheduled at or before `now`.
///
/// Instants are compared after parsing, not as text, since RFC 3339 strings
/// with different sub-second precision do not sort chronologically.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_ready_to_consolidate(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<Vec<ActorConsolidation>, PersistenceError> {
    let rows: Vec<ConsolidationRow> = actor_consolidations::table
        .filter(actor_consolidations::status.eq(ConsolidationStatus::Pending.as_str()))
        .order(actor_consolidations::consolidation_id.asc())
        .select(ConsolidationRow::as_select())
        .load(conn)?;

    let mut ready: Vec<ActorConsolidation> = Vec::new();
    for row in rows {
        let consolidation: ActorConsolidation = row.into_domain()?;
        if consolidation.is_ready(now) {
            ready.push(consolidation);
        }
    }
    debug!("{} consolidations ready at {}", ready.len(), now);
    Ok(ready)
}
