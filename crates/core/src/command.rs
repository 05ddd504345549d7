// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use market_participant_domain::{
    ActorConsolidationId, ActorCredentials, ActorId, ActorNumber, ActorStatus, DelegatedProcess,
    DelegationId, DelegationMessageType, DelegationPeriodId, GridAreaId, MarketRole,
    OrganizationId,
};
use time::OffsetDateTime;

/// A command represents caller intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new actor in an organization.
    CreateActor {
        /// The owning organization.
        organization_id: OrganizationId,
        /// The business identifier.
        actor_number: ActorNumber,
        /// Display name.
        name: String,
        /// Initial market roles.
        market_roles: Vec<MarketRole>,
    },
    /// Rename an actor.
    UpdateActorName {
        /// The actor.
        actor_id: ActorId,
        /// The new name.
        name: String,
    },
    /// Move an actor to another status.
    UpdateActorStatus {
        /// The actor.
        actor_id: ActorId,
        /// The requested status.
        status: ActorStatus,
    },
    /// Replace the market roles of a `New` actor.
    UpdateActorMarketRoles {
        /// The actor.
        actor_id: ActorId,
        /// The complete new set of market roles.
        market_roles: Vec<MarketRole>,
    },
    /// Assign credentials to an actor without any.
    AssignActorCredentials {
        /// The actor.
        actor_id: ActorId,
        /// The credentials.
        credentials: ActorCredentials,
    },
    /// Remove an actor's credentials.
    RemoveActorCredentials {
        /// The actor.
        actor_id: ActorId,
    },
    /// Delegate a message type for one or more grid areas.
    CreateMessageDelegation {
        /// The delegating actor.
        delegated_by: ActorId,
        /// The receiving actor.
        delegated_to: ActorId,
        /// The message type.
        message_type: DelegationMessageType,
        /// Grid areas, one period each.
        grid_areas: Vec<GridAreaId>,
        /// Start of the periods.
        starts_at: OffsetDateTime,
    },
    /// Delegate a process for one or more grid areas.
    CreateProcessDelegation {
        /// The delegating actor.
        delegated_by: ActorId,
        /// The receiving actor.
        delegated_to: ActorId,
        /// The process.
        process: DelegatedProcess,
        /// Grid areas, one period each.
        grid_areas: Vec<GridAreaId>,
        /// Start of the periods.
        starts_at: OffsetDateTime,
    },
    /// Stop a message delegation period.
    StopMessageDelegation {
        /// The delegation.
        delegation_id: DelegationId,
        /// The period to stop.
        period_id: DelegationPeriodId,
        /// When it stops; `None` cancels the period.
        stops_at: Option<OffsetDateTime>,
    },
    /// Stop a process delegation period.
    StopProcessDelegation {
        /// The delegation.
        delegation_id: DelegationId,
        /// The period to stop.
        period_id: DelegationPeriodId,
        /// When it stops; `None` cancels the period.
        stops_at: Option<OffsetDateTime>,
    },
    /// Schedule the merge of one actor into another.
    ScheduleConsolidation {
        /// The actor merged away.
        actor_from: ActorId,
        /// The actor taking over.
        actor_to: ActorId,
        /// When the merge runs.
        scheduled_at: OffsetDateTime,
    },
}

impl Command {
    /// Returns the command name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateActor { .. } => "CreateActor",
            Self::UpdateActorName { .. } => "UpdateActorName",
            Self::UpdateActorStatus { .. } => "UpdateActorStatus",
            Self::UpdateActorMarketRoles { .. } => "UpdateActorMarketRoles",
            Self::AssignActorCredentials { .. } => "AssignActorCredentials",
            Self::RemoveActorCredentials { .. } => "RemoveActorCredentials",
            Self::CreateMessageDelegation { .. } => "CreateMessageDelegation",
            Self::CreateProcessDelegation { .. } => "CreateProcessDelegation",
            Self::StopMessageDelegation { .. } => "StopMessageDelegation",
            Self::StopProcessDelegation { .. } => "StopProcessDelegation",
            Self::ScheduleConsolidation { .. } => "ScheduleConsolidation",
        }
    }
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A new actor was created.
    ActorCreated(ActorId),
    /// An existing actor was changed.
    ActorUpdated(ActorId),
    /// Delegation periods were added.
    DelegationPeriodsCreated(Vec<DelegationPeriodId>),
    /// A delegation period was stopped.
    DelegationStopped(DelegationPeriodId),
    /// A consolidation was scheduled.
    ConsolidationScheduled(ActorConsolidationId),
}
