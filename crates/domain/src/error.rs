// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::actor_status::ActorStatus;
use crate::consolidation::ConsolidationStatus;
use crate::delegation::{DelegatedProcess, DelegationScope};
use crate::eic_function::EicFunction;
use crate::ids::{
    ActorConsolidationId, ActorId, DelegationId, DelegationPeriodId, GridAreaId, OrganizationId,
};

/// Errors raised when a domain rule is violated.
///
/// Every variant maps to a stable machine-readable code (see [`DomainError::code`])
/// and carries the entities involved so a presentation layer can build a
/// user-facing message from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// The actor number is neither a GLN nor an EIC code.
    #[error("Invalid actor number '{value}': expected a 13 digit GLN or a 16 character EIC")]
    InvalidActorNumber {
        /// The rejected value.
        value: String,
    },
    /// A stored or supplied enum value could not be parsed.
    #[error("Unknown {kind} value '{value}'")]
    UnknownValue {
        /// The kind of value being parsed.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The requested status change is not allowed from the current status.
    #[error("Cannot change actor status from {from} to {to}")]
    InvalidStatusTransition {
        /// The current status.
        from: ActorStatus,
        /// The requested status.
        to: ActorStatus,
    },
    /// Market roles can only change while the actor is New.
    #[error("Market roles of actor {actor_id} cannot change while it is {status}")]
    MarketRolesLocked {
        /// The actor being modified.
        actor_id: ActorId,
        /// The actor's current status.
        status: ActorStatus,
    },
    /// The market role is already used by an actor with the same actor number.
    #[error("Market role {function} is already assigned to actor number {actor_number}")]
    MarketRoleReserved {
        /// The actor number owning the market role.
        actor_number: String,
        /// The duplicated function.
        function: EicFunction,
    },
    /// The market role permits only a single grid area.
    #[error("Market role {function} allows only one grid area, got {count}")]
    TooManyGridAreas {
        /// The market role function.
        function: EicFunction,
        /// Number of grid areas requested.
        count: usize,
    },
    /// The (market role, grid area) pair is owned by another actor.
    #[error("Grid area {grid_area_id} is already reserved for market role {function}")]
    GridAreaReserved {
        /// The reserved market role function.
        function: EicFunction,
        /// The reserved grid area.
        grid_area_id: GridAreaId,
    },
    /// A new actor cannot introduce the first DataHub administrator role.
    #[error("Organization {organization_id} has no DataHub administrator to add another one to")]
    DataHubAdministratorNotAllowed {
        /// The organization of the actor.
        organization_id: OrganizationId,
    },
    /// Adding the market role would create a forbidden combination with an existing delegation.
    #[error(
        "Market role {function} cannot be added to organization {organization_id}: it receives delegations from {delegator_function}"
    )]
    MarketRoleForbiddenByDelegation {
        /// The organization receiving the role.
        organization_id: OrganizationId,
        /// The market role being added.
        function: EicFunction,
        /// The conflicting role of the delegating actor.
        delegator_function: EicFunction,
    },
    /// The actor already has credentials.
    #[error("Actor {actor_id} already has credentials assigned")]
    CredentialsAlreadyAssigned {
        /// The actor.
        actor_id: ActorId,
    },
    /// The certificate thumbprint is used by another actor.
    #[error("Certificate thumbprint {thumbprint} is already in use")]
    CertificateThumbprintReserved {
        /// The conflicting thumbprint.
        thumbprint: String,
    },
    /// The actor does not exist.
    #[error("Actor {0} not found")]
    ActorNotFound(ActorId),
    /// The delegation does not exist.
    #[error("{scope} {delegation_id} not found")]
    DelegationNotFound {
        /// Message or process delegation.
        scope: DelegationScope,
        /// The missing delegation.
        delegation_id: DelegationId,
    },
    /// The period does not belong to the delegation.
    #[error("{scope} period {period_id} not found")]
    DelegationPeriodNotFound {
        /// Message or process delegation.
        scope: DelegationScope,
        /// The missing period.
        period_id: DelegationPeriodId,
    },
    /// Delegating between these market roles is forbidden.
    #[error(
        "{scope} from {delegator_function} into an organization holding {recipient_function} is forbidden"
    )]
    DelegationMarketRoleForbidden {
        /// Message or process delegation.
        scope: DelegationScope,
        /// The delegating actor's role.
        delegator_function: EicFunction,
        /// The conflicting role in the recipient's organization.
        recipient_function: EicFunction,
    },
    /// One of the actors taking part in the delegation is not Active.
    #[error("{scope} requires both actors to be active ({delegated_by} -> {delegated_to})")]
    DelegationActorsInactive {
        /// Message or process delegation.
        scope: DelegationScope,
        /// The delegating actor.
        delegated_by: ActorId,
        /// The receiving actor.
        delegated_to: ActorId,
    },
    /// An actor cannot delegate to itself.
    #[error("{scope}: actor {actor_id} cannot delegate to itself")]
    DelegatedToSelf {
        /// Message or process delegation.
        scope: DelegationScope,
        /// The actor.
        actor_id: ActorId,
    },
    /// A period for the same grid area and type is still open.
    #[error("{scope} of {kind} already has an open period for grid area {grid_area_id}")]
    DelegationOverlappingPeriod {
        /// Message or process delegation.
        scope: DelegationScope,
        /// The message type or process being delegated.
        kind: String,
        /// The grid area.
        grid_area_id: GridAreaId,
    },
    /// The stop instant lies before the period's start.
    #[error("{scope} period {period_id} cannot stop before it starts")]
    DelegationStopsBeforeStart {
        /// Message or process delegation.
        scope: DelegationScope,
        /// The period.
        period_id: DelegationPeriodId,
    },
    /// A stopped period cannot be extended or reopened.
    #[error("{scope} period {period_id} is already stopped")]
    DelegationPeriodAlreadyStopped {
        /// Message or process delegation.
        scope: DelegationScope,
        /// The period.
        period_id: DelegationPeriodId,
    },
    /// The delegating actor already delegated this process to a different actor.
    #[error("Actor {actor_id} already delegates process {process} to another actor")]
    ProcessAlreadyDelegatedFrom {
        /// The delegating actor.
        actor_id: ActorId,
        /// The process.
        process: DelegatedProcess,
    },
    /// The receiving actor already receives this process from a different actor.
    #[error("Actor {actor_id} already receives process {process} from another actor")]
    ProcessAlreadyDelegatedTo {
        /// The receiving actor.
        actor_id: ActorId,
        /// The process.
        process: DelegatedProcess,
    },
    /// The source actor already takes part in a consolidation.
    #[error("Actor {actor_id} is already part of a consolidation")]
    ConsolidationFromExists {
        /// The source actor.
        actor_id: ActorId,
    },
    /// The target actor is already being consolidated away.
    #[error("Actor {actor_id} is already scheduled to be consolidated into another actor")]
    ConsolidationToExists {
        /// The target actor.
        actor_id: ActorId,
    },
    /// An actor cannot be consolidated into itself.
    #[error("Actor {actor_id} cannot be consolidated into itself")]
    ConsolidationSameActor {
        /// The actor.
        actor_id: ActorId,
    },
    /// The consolidation has already been executed or failed.
    #[error("Consolidation {consolidation_id} is {status}, expected pending")]
    ConsolidationNotPending {
        /// The consolidation.
        consolidation_id: ActorConsolidationId,
        /// Its current status.
        status: ConsolidationStatus,
    },
    /// The consolidation does not exist.
    #[error("Consolidation {0} not found")]
    ConsolidationNotFound(ActorConsolidationId),
}

impl DomainError {
    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidActorNumber { .. } => "actor.number.invalid",
            Self::UnknownValue { .. } => "value.unknown",
            Self::InvalidStatusTransition { .. } => "actor.status.invalid_transition",
            Self::MarketRolesLocked { .. } => "actor.market_roles.locked",
            Self::MarketRoleReserved { .. } => "actor.market_role.reserved",
            Self::TooManyGridAreas { .. } => "actor.grid_area.only_one_allowed",
            Self::GridAreaReserved { .. } => "actor.grid_area.reserved",
            Self::DataHubAdministratorNotAllowed { .. } => {
                "actor.market_role.datahub_administrator_forbidden"
            }
            Self::MarketRoleForbiddenByDelegation { .. } => {
                "actor.market_role.forbidden_by_delegation"
            }
            Self::CredentialsAlreadyAssigned { .. } => "actor.credentials.already_assigned",
            Self::CertificateThumbprintReserved { .. } => "actor.credentials.thumbprint_reserved",
            Self::ActorNotFound(_) => "actor.not_found",
            Self::DelegationNotFound { scope, .. } => match scope {
                DelegationScope::Message => "message_delegation.not_found",
                DelegationScope::Process => "process_delegation.not_found",
            },
            Self::DelegationPeriodNotFound { scope, .. } => match scope {
                DelegationScope::Message => "message_delegation.period.not_found",
                DelegationScope::Process => "process_delegation.period.not_found",
            },
            Self::DelegationMarketRoleForbidden { scope, .. } => match scope {
                DelegationScope::Message => "message_delegation.market_role_forbidden",
                DelegationScope::Process => "process_delegation.market_role_forbidden",
            },
            Self::DelegationActorsInactive { scope, .. } => match scope {
                DelegationScope::Message => "message_delegation.actors_from_or_to_inactive",
                DelegationScope::Process => "process_delegation.actors_from_or_to_inactive",
            },
            Self::DelegatedToSelf { scope, .. } => match scope {
                DelegationScope::Message => "message_delegation.delegated_to_self",
                DelegationScope::Process => "process_delegation.delegated_to_self",
            },
            Self::DelegationOverlappingPeriod { scope, .. } => match scope {
                DelegationScope::Message => "message_delegation.overlapping_period",
                DelegationScope::Process => "process_delegation.overlapping_period",
            },
            Self::DelegationStopsBeforeStart { scope, .. } => match scope {
                DelegationScope::Message => "message_delegation.stops_at_before_starts_at",
                DelegationScope::Process => "process_delegation.stops_at_before_starts_at",
            },
            Self::DelegationPeriodAlreadyStopped { scope, .. } => match scope {
                DelegationScope::Message => "message_delegation.period_already_stopped",
                DelegationScope::Process => "process_delegation.period_already_stopped",
            },
            Self::ProcessAlreadyDelegatedFrom { .. } => {
                "process_delegation.actor_from_already_has_delegated_process"
            }
            Self::ProcessAlreadyDelegatedTo { .. } => {
                "process_delegation.actor_to_already_has_delegated_process"
            }
            Self::ConsolidationFromExists { .. } => "actor.consolidation.fromexists",
            Self::ConsolidationToExists { .. } => "actor.consolidation.toexists",
            Self::ConsolidationSameActor { .. } => "actor.consolidation.same_actor",
            Self::ConsolidationNotPending { .. } => "actor.consolidation.not_pending",
            Self::ConsolidationNotFound(_) => "actor.consolidation.not_found",
        }
    }

    /// Returns true when the error reports a missing entity rather than a rule conflict.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ActorNotFound(_)
                | Self::DelegationNotFound { .. }
                | Self::DelegationPeriodNotFound { .. }
                | Self::ConsolidationNotFound(_)
        )
    }
}
