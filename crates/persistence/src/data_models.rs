// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and the conversions between rows and domain values.
//!
//! Rows select only the columns read back; ordering columns such as
//! `position` are used in queries only.
//!
//! Ids are stored as hyphenated UUID text, enums by their `as_str` form and
//! instants as RFC 3339 text in UTC.

use diesel::prelude::*;
use market_participant_domain::{
    ActorConsolidation, ActorCredentials, CertificateCredentials, ClientSecretCredentials,
    DelegationPeriod, DomainEvent,
};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::diesel_schema::{
    actor_consolidations, actor_credentials, actor_market_role_grid_areas, actor_market_roles,
    actors, delegation_periods, delegations, domain_events,
};
use crate::error::PersistenceError;

/// A domain event read back from the outbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDomainEvent {
    pub event_id: i64,
    pub aggregate_id: String,
    pub event: DomainEvent,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = actors)]
pub struct ActorRow {
    pub actor_id: String,
    pub organization_id: String,
    pub actor_number: String,
    pub name: String,
    pub status: String,
    pub external_actor_id: Option<String>,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = actor_market_roles)]
pub struct MarketRoleRow {
    pub actor_id: String,
    pub eic_function: String,
    pub comment: Option<String>,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = actor_market_role_grid_areas)]
pub struct MarketRoleGridAreaRow {
    pub actor_id: String,
    pub eic_function: String,
    pub grid_area_id: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = actor_credentials)]
pub struct CredentialsRow {
    pub actor_id: String,
    pub credential_kind: String,
    pub thumbprint: Option<String>,
    pub key_vault_secret_identifier: Option<String>,
    pub client_id: Option<String>,
    pub secret_identifier: Option<String>,
    pub expires_at: String,
}

impl CredentialsRow {
    pub fn into_domain(self) -> Result<ActorCredentials, PersistenceError> {
        let expires_at: OffsetDateTime = parse_instant(&self.expires_at)?;
        match (self.credential_kind.as_str(), self.thumbprint, self.key_vault_secret_identifier) {
            ("certificate", Some(thumbprint), Some(key_vault_secret_identifier)) => {
                Ok(ActorCredentials::Certificate(CertificateCredentials {
                    thumbprint,
                    key_vault_secret_identifier,
                    expires_at,
                }))
            }
            ("client_secret", _, _) => match (self.client_id, self.secret_identifier) {
                (Some(client_id), Some(secret_identifier)) => {
                    Ok(ActorCredentials::ClientSecret(ClientSecretCredentials {
                        client_id,
                        secret_identifier,
                        expires_at,
                    }))
                }
                _ => Err(PersistenceError::invalid(
                    "actor_credentials.client_id",
                    self.actor_id,
                )),
            },
            (kind, _, _) => Err(PersistenceError::invalid(
                "actor_credentials.credential_kind",
                format!("{kind} for actor {}", self.actor_id),
            )),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = delegations)]
pub struct DelegationRow {
    pub delegation_id: String,
    pub delegated_by: String,
    pub delegation_kind: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = delegation_periods)]
pub struct DelegationPeriodRow {
    pub period_id: String,
    pub delegation_id: String,
    pub delegated_to: String,
    pub grid_area_id: String,
    pub starts_at: String,
    pub stops_at: Option<String>,
}

impl DelegationPeriodRow {
    pub fn into_domain(self) -> Result<DelegationPeriod, PersistenceError> {
        let stops_at: Option<OffsetDateTime> = match self.stops_at {
            Some(stops_at) => Some(parse_instant(&stops_at)?),
            None => None,
        };
        Ok(DelegationPeriod::restore(
            parse_column("delegation_periods.period_id", &self.period_id)?,
            parse_column("delegation_periods.delegated_to", &self.delegated_to)?,
            parse_column("delegation_periods.grid_area_id", &self.grid_area_id)?,
            parse_instant(&self.starts_at)?,
            stops_at,
        ))
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = actor_consolidations)]
pub struct ConsolidationRow {
    pub consolidation_id: String,
    pub actor_from: String,
    pub actor_to: String,
    pub scheduled_at: String,
    pub status: String,
}

impl ConsolidationRow {
    pub fn into_domain(self) -> Result<ActorConsolidation, PersistenceError> {
        Ok(ActorConsolidation::restore(
            parse_column("actor_consolidations.consolidation_id", &self.consolidation_id)?,
            parse_column("actor_consolidations.actor_from", &self.actor_from)?,
            parse_column("actor_consolidations.actor_to", &self.actor_to)?,
            parse_instant(&self.scheduled_at)?,
            parse_column("actor_consolidations.status", &self.status)?,
        ))
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = domain_events)]
pub struct DomainEventRow {
    pub event_id: i64,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload_json: String,
}

impl DomainEventRow {
    pub fn into_stored(self) -> Result<StoredDomainEvent, PersistenceError> {
        let event: DomainEvent = serde_json::from_str(&self.payload_json)?;
        if event.name() != self.event_type {
            return Err(PersistenceError::invalid(
                "domain_events.event_type",
                self.event_type,
            ));
        }
        Ok(StoredDomainEvent {
            event_id: self.event_id,
            aggregate_id: self.aggregate_id,
            event,
        })
    }
}

/// Parses a text column into a domain value.
pub fn parse_column<T: FromStr>(column: &'static str, value: &str) -> Result<T, PersistenceError> {
    value
        .parse::<T>()
        .map_err(|_| PersistenceError::invalid(column, value))
}

/// Formats an instant for storage.
pub fn format_instant(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(instant.to_offset(UtcOffset::UTC).format(&Rfc3339)?)
}

pub fn parse_instant(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::parse(value, &Rfc3339)?)
}
