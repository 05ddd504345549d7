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

mod apply;
mod command;
mod error;
mod handlers;
mod jobs;
mod repositories;
mod rules;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply;
pub use command::{Command, CommandOutcome};
pub use error::{ActorError, CoreError, StoreError};
pub use handlers::{
    assign_actor_credentials, create_actor, create_delegation, remove_actor_credentials,
    schedule_consolidation, stop_delegation, update_actor_market_roles, update_actor_name,
    update_actor_status,
};
pub use jobs::{
    CREDENTIAL_SCAN_BATCH_SIZE, ConsolidationReport, ExpiringCredentials,
    consolidate_ready_actors, scan_expiring_credentials,
};
pub use repositories::{
    ActorConsolidationRepository, ActorRepository, DelegationRepository, DomainEventRepository,
    EntityLock, LockableEntity, MarketParticipantStore, MarketRoleAndGridAreaReservationService,
    MessageDelegationRepository, ProcessDelegationRepository, UnitOfWork, UnitOfWorkScope,
};
pub use rules::{
    check_existing_consolidation, validate_delegation_allowed, validate_market_role_allowed,
    validate_overlapping_eic_functions, validate_unique_market_role_grid_areas,
};
