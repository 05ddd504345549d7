// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod actor;
mod actor_status;
mod consolidation;
mod credentials;
mod delegation;
mod eic_function;
mod error;
mod events;
mod ids;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use actor::{Actor, ActorParts};
pub use actor_status::{ActorStatus, ActorStatusTransitioner};
pub use consolidation::{ActorConsolidation, ConsolidationStatus};
pub use credentials::{
    ActorCredentials, CertificateCredentials, ClientSecretCredentials, EXPIRES_SOON_WINDOW,
};
pub use delegation::{
    DelegatedProcess, Delegation, DelegationKind, DelegationMessageType, DelegationPeriod,
    DelegationScope, MessageDelegation, ProcessDelegation,
};
pub use eic_function::{ALL_EIC_FUNCTIONS, EicFunction, reservable_functions};
pub use error::DomainError;
pub use events::{DomainEvent, HasDomainEvents};
pub use ids::{
    ActorConsolidationId, ActorId, DelegationId, DelegationPeriodId, GridAreaId, OrganizationId,
};
pub use types::{ActorNumber, ActorNumberKind, MarketRole};
pub use validation::{
    FORBIDDEN_DELEGATION_COMBINATIONS, is_forbidden_combination, validate_datahub_administrator,
    validate_delegation_combination, validate_market_role_against_delegations,
    validate_unique_functions_per_actor_number,
};
