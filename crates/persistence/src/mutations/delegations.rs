// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delegation mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use market_participant_domain::{Delegation, DelegationKind};
use tracing::debug;

use crate::data_models::format_instant;
use crate::diesel_schema::{delegation_periods, delegations};
use crate::error::PersistenceError;

/// Inserts a delegation or replaces the periods of an existing one.
///
/// The delegator, scope and kind of a delegation never change, so an
/// existing row is left as it is.
///
/// # Errors
///
/// Returns an error if a database statement fails, including a second
/// delegation for the same delegator, scope and kind.
pub fn save_delegation<K: DelegationKind>(
    conn: &mut SqliteConnection,
    delegation: &Delegation<K>,
) -> Result<(), PersistenceError> {
    let delegation_id: String = delegation.id().to_string();

    diesel::insert_into(delegations::table)
        .values((
            delegations::delegation_id.eq(&delegation_id),
            delegations::delegation_scope.eq(K::SCOPE.as_str()),
            delegations::delegated_by.eq(delegation.delegated_by().to_string()),
            delegations::delegation_kind.eq(delegation.kind().as_str()),
        ))
        .on_conflict(delegations::delegation_id)
        .do_nothing()
        .execute(conn)?;

    diesel::delete(
        delegation_periods::table.filter(delegation_periods::delegation_id.eq(&delegation_id)),
    )
    .execute(conn)?;

    for (index, period) in delegation.periods().iter().enumerate() {
        let stops_at: Option<String> = period.stops_at().map(format_instant).transpose()?;
        let position: i32 = i32::try_from(index)
            .map_err(|e| PersistenceError::QueryFailed(format!("Invalid position: {e}")))?;
        diesel::insert_into(delegation_periods::table)
            .values((
                delegation_periods::period_id.eq(period.id().to_string()),
                delegation_periods::delegation_id.eq(&delegation_id),
                delegation_periods::delegated_to.eq(period.delegated_to().to_string()),
                delegation_periods::grid_area_id.eq(period.grid_area_id().to_string()),
                delegation_periods::starts_at.eq(format_instant(period.starts_at())?),
                delegation_periods::stops_at.eq(stops_at),
                delegation_periods::position.eq(position),
            ))
            .execute(conn)?;
    }

    debug!(
        "Saved {} {} with {} periods",
        K::SCOPE,
        delegation_id,
        delegation.periods().len()
    );
    Ok(())
}
