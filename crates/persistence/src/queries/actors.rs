// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor queries.
//!
//! Actors are read in two steps: the `actors` rows first, then their market
//! roles, grid areas and credentials for the whole batch at once.

use diesel::SqliteConnection;
use diesel::prelude::*;
use market_participant_domain::{
    Actor, ActorCredentials, ActorId, ActorNumber, ActorParts, ActorStatus, EicFunction,
    GridAreaId, MarketRole, OrganizationId,
};
use std::collections::HashMap;
use tracing::debug;

use crate::data_models::{
    ActorRow, CredentialsRow, MarketRoleGridAreaRow, MarketRoleRow, parse_column,
};
use crate::diesel_schema::{
    actor_credentials, actor_market_role_grid_areas, actor_market_roles, actors,
};
use crate::error::PersistenceError;

/// Retrieves an actor by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
/// Returns `Ok(None)` if the actor is not found.
pub fn get_actor(
    conn: &mut SqliteConnection,
    actor_id: ActorId,
) -> Result<Option<Actor>, PersistenceError> {
    debug!("Looking up actor {}", actor_id);

    let result: Result<ActorRow, diesel::result::Error> = actors::table
        .filter(actors::actor_id.eq(actor_id.to_string()))
        .select(ActorRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(load_actors(conn, vec![row])?.pop()),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves the actors among `actor_ids` that exist, ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_actors(
    conn: &mut SqliteConnection,
    actor_ids: &[ActorId],
) -> Result<Vec<Actor>, PersistenceError> {
    let ids: Vec<String> = actor_ids.iter().map(ToString::to_string).collect();
    let rows: Vec<ActorRow> = actors::table
        .filter(actors::actor_id.eq_any(ids))
        .order(actors::actor_id.asc())
        .select(ActorRow::as_select())
        .load(conn)?;
    load_actors(conn, rows)
}

/// Retrieves every actor in an organization.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_actors_in_organization(
    conn: &mut SqliteConnection,
    organization_id: OrganizationId,
) -> Result<Vec<Actor>, PersistenceError> {
    let rows: Vec<ActorRow> = actors::table
        .filter(actors::organization_id.eq(organization_id.to_string()))
        .order(actors::actor_id.asc())
        .select(ActorRow::as_select())
        .load(conn)?;
    debug!(
        "Found {} actors in organization {}",
        rows.len(),
        organization_id
    );
    load_actors(conn, rows)
}

/// Retrieves `Active` actors holding a market role with `function`.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_active_actors_with_function(
    conn: &mut SqliteConnection,
    function: EicFunction,
) -> Result<Vec<Actor>, PersistenceError> {
    let holders = actor_market_roles::table
        .filter(actor_market_roles::eic_function.eq(function.as_str()))
        .select(actor_market_roles::actor_id);

    let rows: Vec<ActorRow> = actors::table
        .filter(actors::status.eq(ActorStatus::Active.as_str()))
        .filter(actors::actor_id.eq_any(holders))
        .order(actors::actor_id.asc())
        .select(ActorRow::as_select())
        .load(conn)?;
    load_actors(conn, rows)
}

/// Retrieves one page of all actors ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored value is invalid.
pub fn get_actors_page(
    conn: &mut SqliteConnection,
    offset: usize,
    limit: usize,
) -> Result<Vec<Actor>, PersistenceError> {
    let offset: i64 = i64::try_from(offset)
        .map_err(|e| PersistenceError::QueryFailed(format!("Invalid page offset: {e}")))?;
    let limit: i64 = i64::try_from(limit)
        .map_err(|e| PersistenceError::QueryFailed(format!("Invalid page size: {e}")))?;

    let rows: Vec<ActorRow> = actors::table
        .order(actors::actor_id.asc())
        .limit(limit)
        .offset(offset)
        .select(ActorRow::as_select())
        .load(conn)?;
    load_actors(conn, rows)
}

/// Returns the id of the actor whose certificate has `thumbprint`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_thumbprint_owner(
    conn: &mut SqliteConnection,
    thumbprint: &str,
) -> Result<Option<String>, PersistenceError> {
    Ok(actor_credentials::table
        .filter(actor_credentials::thumbprint.eq(thumbprint))
        .select(actor_credentials::actor_id)
        .first::<String>(conn)
        .optional()?)
}

fn load_actors(
    conn: &mut SqliteConnection,
    rows: Vec<ActorRow>,
) -> Result<Vec<Actor>, PersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = rows.iter().map(|row| row.actor_id.clone()).collect();

    let role_rows: Vec<MarketRoleRow> = actor_market_roles::table
        .filter(actor_market_roles::actor_id.eq_any(ids.clone()))
        .order((
            actor_market_roles::actor_id.asc(),
            actor_market_roles::position.asc(),
        ))
        .select(MarketRoleRow::as_select())
        .load(conn)?;
    let grid_area_rows: Vec<MarketRoleGridAreaRow> = actor_market_role_grid_areas::table
        .filter(actor_market_role_grid_areas::actor_id.eq_any(ids.clone()))
        .order((
            actor_market_role_grid_areas::actor_id.asc(),
            actor_market_role_grid_areas::eic_function.asc(),
            actor_market_role_grid_areas::position.asc(),
        ))
        .select(MarketRoleGridAreaRow::as_select())
        .load(conn)?;
    let credential_rows: Vec<CredentialsRow> = actor_credentials::table
        .filter(actor_credentials::actor_id.eq_any(ids))
        .select(CredentialsRow::as_select())
        .load(conn)?;

    let mut grid_areas: HashMap<(String, String), Vec<GridAreaId>> = HashMap::new();
    for row in grid_area_rows {
        let grid_area_id: GridAreaId =
            parse_column("actor_market_role_grid_areas.grid_area_id", &row.grid_area_id)?;
        grid_areas
            .entry((row.actor_id, row.eic_function))
            .or_default()
            .push(grid_area_id);
    }

    let mut roles: HashMap<String, Vec<MarketRole>> = HashMap::new();
    for row in role_rows {
        let function: EicFunction =
            parse_column("actor_market_roles.eic_function", &row.eic_function)?;
        let role_grid_areas: Vec<GridAreaId> = grid_areas
            .remove(&(row.actor_id.clone(), row.eic_function))
            .unwrap_or_default();
        roles
            .entry(row.actor_id)
            .or_default()
            .push(MarketRole::restore(function, role_grid_areas, row.comment));
    }

    let mut credentials: HashMap<String, CredentialsRow> = credential_rows
        .into_iter()
        .map(|row| (row.actor_id.clone(), row))
        .collect();

    let mut loaded: Vec<Actor> = Vec::with_capacity(rows.len());
    for row in rows {
        let actor_credentials: Option<ActorCredentials> = credentials
            .remove(&row.actor_id)
            .map(CredentialsRow::into_domain)
            .transpose()?;
        let market_roles: Vec<MarketRole> = roles.remove(&row.actor_id).unwrap_or_default();

        loaded.push(Actor::restore(ActorParts {
            id: parse_column("actors.actor_id", &row.actor_id)?,
            organization_id: parse_column("actors.organization_id", &row.organization_id)?,
            actor_number: ActorNumber::new(&row.actor_number)?,
            name: row.name,
            status: parse_column("actors.status", &row.status)?,
            external_actor_id: row.external_actor_id,
            credentials: actor_credentials,
            market_roles,
        }));
    }
    Ok(loaded)
}
