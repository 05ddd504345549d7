// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain events raised by aggregates.
//!
//! Aggregates accumulate events in an owned list. The event repository drains
//! that list with [`HasDomainEvents::take_domain_events`] and stores the events
//! in the same transaction as the aggregate.

use crate::delegation::DelegationScope;
use crate::eic_function::EicFunction;
use crate::ids::{
    ActorConsolidationId, ActorId, DelegationId, DelegationPeriodId, GridAreaId,
};
use crate::types::ActorNumber;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Something that happened in the domain and must be published downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    ActorActivated {
        actor_id: ActorId,
        actor_number: ActorNumber,
    },
    /// The actor became the exclusive owner of a grid area for a market role.
    GridAreaOwnershipAssigned {
        actor_id: ActorId,
        actor_number: ActorNumber,
        function: EicFunction,
        grid_area_id: GridAreaId,
    },
    ActorCredentialsAssigned {
        actor_id: ActorId,
        credential_kind: String,
    },
    ActorCredentialsRemoved {
        actor_id: ActorId,
    },
    ActorCredentialsExpiring {
        actor_id: ActorId,
        #[serde(with = "time::serde::rfc3339")]
        expires_at: OffsetDateTime,
    },
    /// A delegation period was added or stopped.
    DelegationConfigured {
        scope: DelegationScope,
        delegation_id: DelegationId,
        period_id: DelegationPeriodId,
        delegated_by: ActorId,
        delegated_to: ActorId,
        kind: String,
        grid_area_id: GridAreaId,
        #[serde(with = "time::serde::rfc3339")]
        starts_at: OffsetDateTime,
        #[serde(with = "time::serde::rfc3339::option")]
        stops_at: Option<OffsetDateTime>,
    },
    ActorConsolidationScheduled {
        consolidation_id: ActorConsolidationId,
        actor_from: ActorId,
        actor_to: ActorId,
        #[serde(with = "time::serde::rfc3339")]
        scheduled_at: OffsetDateTime,
    },
    /// Asks for a DataHub administrator to be told about a scheduled consolidation.
    ConsolidationNotificationRequested {
        recipient: ActorId,
        consolidation_id: ActorConsolidationId,
        actor_from: ActorId,
        actor_to: ActorId,
        #[serde(with = "time::serde::rfc3339")]
        scheduled_at: OffsetDateTime,
    },
    ActorConsolidated {
        consolidation_id: ActorConsolidationId,
        actor_from: ActorId,
        actor_to: ActorId,
    },
}

impl DomainEvent {
    /// Returns the event name used for storage and routing.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ActorActivated { .. } => "actor_activated",
            Self::GridAreaOwnershipAssigned { .. } => "grid_area_ownership_assigned",
            Self::ActorCredentialsAssigned { .. } => "actor_credentials_assigned",
            Self::ActorCredentialsRemoved { .. } => "actor_credentials_removed",
            Self::ActorCredentialsExpiring { .. } => "actor_credentials_expiring",
            Self::DelegationConfigured { .. } => "delegation_configured",
            Self::ActorConsolidationScheduled { .. } => "actor_consolidation_scheduled",
            Self::ConsolidationNotificationRequested { .. } => {
                "consolidation_notification_requested"
            }
            Self::ActorConsolidated { .. } => "actor_consolidated",
        }
    }
}

/// An aggregate that records domain events.
pub trait HasDomainEvents {
    /// Returns the identifier the events are stored under.
    fn aggregate_id(&self) -> String;

    /// Returns pending events without clearing them.
    fn domain_events(&self) -> &[DomainEvent];

    /// Removes and returns all pending events.
    fn take_domain_events(&mut self) -> Vec<DomainEvent>;
}
