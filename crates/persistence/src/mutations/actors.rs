// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor mutations.
//!
//! An actor is saved as a whole: the `actors` row is upserted and its market
//! roles, grid areas and credentials are replaced.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use market_participant::ActorError;
use market_participant_domain::{Actor, ActorCredentials, MarketRole};
use tracing::{debug, info, warn};

use crate::data_models::format_instant;
use crate::diesel_schema::{
    actor_credentials, actor_market_role_grid_areas, actor_market_roles, actors,
};
use crate::error::PersistenceError;
use crate::queries::actors::find_thumbprint_owner;

/// Inserts or updates an actor with its market roles and credentials.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `actor` - The actor to save
///
/// # Returns
///
/// `Ok(Err(ActorError::ThumbprintCredentialsConflict))` if another actor
/// already uses the certificate thumbprint. Nothing is written in that case.
///
/// # Errors
///
/// Returns an error if a database statement fails.
pub fn save_actor(
    conn: &mut SqliteConnection,
    actor: &Actor,
) -> Result<Result<(), ActorError>, PersistenceError> {
    let actor_id: String = actor.id().to_string();

    if let Some(thumbprint) = actor.credentials().and_then(ActorCredentials::thumbprint) {
        let owner: Option<String> = find_thumbprint_owner(conn, thumbprint)?;
        if owner.is_some_and(|owner| owner != actor_id) {
            warn!(
                "Certificate thumbprint {} is already assigned to another actor",
                thumbprint
            );
            return Ok(Err(ActorError::ThumbprintCredentialsConflict {
                thumbprint: thumbprint.to_string(),
            }));
        }
    }

    let organization_id: String = actor.organization_id().to_string();
    diesel::insert_into(actors::table)
        .values((
            actors::actor_id.eq(&actor_id),
            actors::organization_id.eq(&organization_id),
            actors::actor_number.eq(actor.actor_number().value()),
            actors::name.eq(actor.name()),
            actors::status.eq(actor.status().as_str()),
            actors::external_actor_id.eq(actor.external_actor_id()),
        ))
        .on_conflict(actors::actor_id)
        .do_update()
        .set((
            actors::organization_id.eq(&organization_id),
            actors::actor_number.eq(actor.actor_number().value()),
            actors::name.eq(actor.name()),
            actors::status.eq(actor.status().as_str()),
            actors::external_actor_id.eq(actor.external_actor_id()),
        ))
        .execute(conn)?;

    replace_market_roles(conn, &actor_id, actor.market_roles())?;

    if let Err(conflict) = replace_credentials(conn, &actor_id, actor.credentials())? {
        return Ok(Err(conflict));
    }

    debug!(
        "Saved actor {} with status {} and {} market roles",
        actor_id,
        actor.status(),
        actor.market_roles().len()
    );
    Ok(Ok(()))
}

fn replace_market_roles(
    conn: &mut SqliteConnection,
    actor_id: &str,
    roles: &[MarketRole],
) -> Result<(), PersistenceError> {
    diesel::delete(
        actor_market_role_grid_areas::table
            .filter(actor_market_role_grid_areas::actor_id.eq(actor_id)),
    )
    .execute(conn)?;
    diesel::delete(actor_market_roles::table.filter(actor_market_roles::actor_id.eq(actor_id)))
        .execute(conn)?;

    for (role_position, role) in roles.iter().enumerate() {
        diesel::insert_into(actor_market_roles::table)
            .values((
                actor_market_roles::actor_id.eq(actor_id),
                actor_market_roles::eic_function.eq(role.function().as_str()),
                actor_market_roles::comment.eq(role.comment()),
                actor_market_roles::position.eq(position(role_position)?),
            ))
            .execute(conn)?;

        for (grid_area_position, grid_area_id) in role.grid_areas().iter().enumerate() {
            diesel::insert_into(actor_market_role_grid_areas::table)
                .values((
                    actor_market_role_grid_areas::actor_id.eq(actor_id),
                    actor_market_role_grid_areas::eic_function.eq(role.function().as_str()),
                    actor_market_role_grid_areas::grid_area_id.eq(grid_area_id.to_string()),
                    actor_market_role_grid_areas::position.eq(position(grid_area_position)?),
                ))
                .execute(conn)?;
        }
    }
    Ok(())
}

fn replace_credentials(
    conn: &mut SqliteConnection,
    actor_id: &str,
    credentials: Option<&ActorCredentials>,
) -> Result<Result<(), ActorError>, PersistenceError> {
    diesel::delete(actor_credentials::table.filter(actor_credentials::actor_id.eq(actor_id)))
        .execute(conn)?;

    let Some(credentials) = credentials else {
        return Ok(Ok(()));
    };

    let expires_at: String = format_instant(credentials.expires_at())?;
    let inserted: Result<usize, diesel::result::Error> = match credentials {
        ActorCredentials::Certificate(certificate) => diesel::insert_into(actor_credentials::table)
            .values((
                actor_credentials::actor_id.eq(actor_id),
                actor_credentials::credential_kind.eq(credentials.kind()),
                actor_credentials::thumbprint.eq(Some(certificate.thumbprint.as_str())),
                actor_credentials::key_vault_secret_identifier
                    .eq(Some(certificate.key_vault_secret_identifier.as_str())),
                actor_credentials::expires_at.eq(&expires_at),
            ))
            .execute(conn),
        ActorCredentials::ClientSecret(secret) => diesel::insert_into(actor_credentials::table)
            .values((
                actor_credentials::actor_id.eq(actor_id),
                actor_credentials::credential_kind.eq(credentials.kind()),
                actor_credentials::client_id.eq(Some(secret.client_id.as_str())),
                actor_credentials::secret_identifier.eq(Some(secret.secret_identifier.as_str())),
                actor_credentials::expires_at.eq(&expires_at),
            ))
            .execute(conn),
    };

    match inserted {
        Ok(_) => {
            info!("Stored {} credentials for actor {}", credentials.kind(), actor_id);
            Ok(Ok(()))
        }
        // The thumbprint was checked above; a violation means another writer got there first.
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            let thumbprint: String = credentials.thumbprint().unwrap_or_default().to_string();
            warn!("Certificate thumbprint {} was taken concurrently", thumbprint);
            Ok(Err(ActorError::ThumbprintCredentialsConflict { thumbprint }))
        }
        Err(e) => Err(e.into()),
    }
}

fn position(index: usize) -> Result<i32, PersistenceError> {
    i32::try_from(index).map_err(|e| PersistenceError::QueryFailed(format!("Invalid position: {e}")))
}
