// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Grid area reservation ledger queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use market_participant_domain::{ActorId, EicFunction, GridAreaId};

use crate::data_models::parse_column;
use crate::diesel_schema::market_role_grid_area_reservations as reservations;
use crate::error::PersistenceError;

/// Returns the actor holding the reservation for `(function, grid_area_id)`.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored owner is invalid.
pub fn get_reservation_owner(
    conn: &mut SqliteConnection,
    function: EicFunction,
    grid_area_id: GridAreaId,
) -> Result<Option<ActorId>, PersistenceError> {
    let owner: Option<String> = reservations::table
        .filter(reservations::eic_function.eq(function.as_str()))
        .filter(reservations::grid_area_id.eq(grid_area_id.to_string()))
        .select(reservations::actor_id)
        .first::<String>(conn)
        .optional()?;

    owner
        .map(|owner| parse_column("market_role_grid_area_reservations.actor_id", &owner))
        .transpose()
}
