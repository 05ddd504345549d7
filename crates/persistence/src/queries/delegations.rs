// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delegation queries.
//!
//! Message and process delegations share the `delegations` table and are
//! told apart by `delegation_scope`. Every query is scoped to the scope of
//! the requested kind, so a message delegation id never resolves as a
//! process delegation.

use diesel::SqliteConnection;
use diesel::prelude::*;
use market_participant_domain::{
    ActorId, Delegation, DelegationId, DelegationKind, DelegationPeriod,
};
use std::collections::HashMap;
use tracing::debug;

use crate::data_models::{DelegationPeriodRow, DelegationRow, parse_column};
use crate::diesel_schema::{delegation_periods, delegations};
use crate::error::PersistenceError;

/// Retrieves a delegation of kind `K` by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if no delegation of this scope has the id.
pub fn get_delegation<K: DelegationKind>(
    conn: &mut SqliteConnection,
    delegation_id: DelegationId,
) -> Result<Option<Delegation<K>>, PersistenceError> {
    debug!("Looking up {} {}", K::SCOPE, delegation_id);

    let rows: Vec<DelegationRow> = delegations::table
        .filter(delegations::delegation_id.eq(delegation_id.to_string()))
        .filter(delegations::delegation_scope.eq(K::SCOPE.as_str()))
        .select(DelegationRow::as_select())
        .load(conn)?;
    Ok(load_delegations(conn, rows)?.pop())
}

/// Retrieves every delegation of kind `K` made by `actor_id`.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_delegations_for_actor<K: DelegationKind>(
    conn: &mut SqliteConnection,
    actor_id: ActorId,
) -> Result<Vec<Delegation<K>>, PersistenceError> {
    let rows: Vec<DelegationRow> = delegations::table
        .filter(delegations::delegated_by.eq(actor_id.to_string()))
        .filter(delegations::delegation_scope.eq(K::SCOPE.as_str()))
        .order(delegations::delegation_id.asc())
        .select(DelegationRow::as_select())
        .load(conn)?;
    load_delegations(conn, rows)
}

/// Retrieves the delegation `actor_id` made for `kind`, if any.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_delegation_for_actor<K: DelegationKind>(
    conn: &mut SqliteConnection,
    actor_id: ActorId,
    kind: K,
) -> Result<Option<Delegation<K>>, PersistenceError> {
    let rows: Vec<DelegationRow> = delegations::table
        .filter(delegations::delegated_by.eq(actor_id.to_string()))
        .filter(delegations::delegation_scope.eq(K::SCOPE.as_str()))
        .filter(delegations::delegation_kind.eq(kind.as_str()))
        .select(DelegationRow::as_select())
        .load(conn)?;
    Ok(load_delegations(conn, rows)?.pop())
}

/// Retrieves every delegation of kind `K` with a period delegated to `actor_id`.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_delegations_to_actor<K: DelegationKind>(
    conn: &mut SqliteConnection,
    actor_id: ActorId,
) -> Result<Vec<Delegation<K>>, PersistenceError> {
    let recipients = delegation_periods::table
        .filter(delegation_periods::delegated_to.eq(actor_id.to_string()))
        .select(delegation_periods::delegation_id);

    let rows: Vec<DelegationRow> = delegations::table
        .filter(delegations::delegation_scope.eq(K::SCOPE.as_str()))
        .filter(delegations::delegation_id.eq_any(recipients))
        .order(delegations::delegation_id.asc())
        .select(DelegationRow::as_select())
        .load(conn)?;
    load_delegations(conn, rows)
}

fn load_delegations<K: DelegationKind>(
    conn: &mut SqliteConnection,
    rows: Vec<DelegationRow>,
) -> Result<Vec<Delegation<K>>, PersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = rows.iter().map(|row| row.delegation_id.clone()).collect();

    let period_rows: Vec<DelegationPeriodRow> = delegation_periods::table
        .filter(delegation_periods::delegation_id.eq_any(ids))
        .order((
            delegation_periods::delegation_id.asc(),
            delegation_periods::position.asc(),
        ))
        .select(DelegationPeriodRow::as_select())
        .load(conn)?;

    let mut periods: HashMap<String, Vec<DelegationPeriod>> = HashMap::new();
    for row in period_rows {
        let delegation_id: String = row.delegation_id.clone();
        periods
            .entry(delegation_id)
            .or_default()
            .push(row.into_domain()?);
    }

    let mut loaded: Vec<Delegation<K>> = Vec::with_capacity(rows.len());
    for row in rows {
        let restored_periods: Vec<DelegationPeriod> =
            periods.remove(&row.delegation_id).unwrap_or_default();
        loaded.push(Delegation::restore(
            parse_column("delegations.delegation_id", &row.delegation_id)?,
            parse_column("delegations.delegated_by", &row.delegated_by)?,
            parse_column::<K>("delegations.delegation_kind", &row.delegation_kind)?,
            restored_periods,
        ));
    }
    Ok(loaded)
}
