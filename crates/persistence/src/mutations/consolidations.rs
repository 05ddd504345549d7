// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor consolidation mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use market_participant_domain::ActorConsolidation;
use tracing::debug;

use crate::data_models::format_instant;
use crate::diesel_schema::actor_consolidations;
use crate::error::PersistenceError;

/// Inserts a consolidation or updates the status of an existing one.
///
/// # Errors
///
/// Returns an error if a database statement fails.
pub fn save_consolidation(
    conn: &mut SqliteConnection,
    consolidation: &ActorConsolidation,
) -> Result<(), PersistenceError> {
    diesel::insert_into(actor_consolidations::table)
        .values((
            actor_consolidations::consolidation_id.eq(consolidation.id().to_string()),
            actor_consolidations::actor_from.eq(consolidation.actor_from().to_string()),
            actor_consolidations::actor_to.eq(consolidation.actor_to().to_string()),
            actor_consolidations::scheduled_at.eq(format_instant(consolidation.scheduled_at())?),
            actor_consolidations::status.eq(consolidation.status().as_str()),
        ))
        .on_conflict(actor_consolidations::consolidation_id)
        .do_update()
        .set(actor_consolidations::status.eq(consolidation.status().as_str()))
        .execute(conn)?;

    debug!(
        "Saved consolidation {} with status {}",
        consolidation.id(),
        consolidation.status()
    );
    Ok(())
}
