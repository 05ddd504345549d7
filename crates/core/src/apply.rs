// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, CommandOutcome};
use crate::error::CoreError;
use crate::handlers;
use crate::repositories::MarketParticipantStore;
use market_participant_domain::{DelegatedProcess, DelegationMessageType};
use tracing::{debug, warn};

/// Applies a command to the store.
///
/// Each command runs in its own unit of work. On error nothing is persisted.
///
/// # Arguments
///
/// * `store` - The store holding every aggregate
/// * `command` - The command to apply
///
/// # Returns
///
/// * `Ok(CommandOutcome)` describing what was created or changed
/// * `Err(CoreError)` if the command was rejected or the store failed
///
/// # Errors
///
/// Returns an error if:
/// - A referenced entity does not exist
/// - The command violates a domain rule
/// - The store fails
pub fn apply<S>(store: &mut S, command: Command) -> Result<CommandOutcome, CoreError>
where
    S: MarketParticipantStore,
{
    let name: &'static str = command.name();
    debug!(command = name, "Applying command");

    let result: Result<CommandOutcome, CoreError> = dispatch(store, command);
    if let Err(err) = &result {
        warn!(command = name, code = err.code().unwrap_or("store"), error = %err, "Command rejected");
    }
    result
}

fn dispatch<S>(store: &mut S, command: Command) -> Result<CommandOutcome, CoreError>
where
    S: MarketParticipantStore,
{
    match command {
        Command::CreateActor {
            organization_id,
            actor_number,
            name,
            market_roles,
        } => handlers::create_actor(store, organization_id, actor_number, name, market_roles)
            .map(CommandOutcome::ActorCreated),
        Command::UpdateActorName { actor_id, name } => {
            handlers::update_actor_name(store, actor_id, name)?;
            Ok(CommandOutcome::ActorUpdated(actor_id))
        }
        Command::UpdateActorStatus { actor_id, status } => {
            handlers::update_actor_status(store, actor_id, status)?;
            Ok(CommandOutcome::ActorUpdated(actor_id))
        }
        Command::UpdateActorMarketRoles {
            actor_id,
            market_roles,
        } => {
            handlers::update_actor_market_roles(store, actor_id, market_roles)?;
            Ok(CommandOutcome::ActorUpdated(actor_id))
        }
        Command::AssignActorCredentials {
            actor_id,
            credentials,
        } => {
            handlers::assign_actor_credentials(store, actor_id, credentials)?;
            Ok(CommandOutcome::ActorUpdated(actor_id))
        }
        Command::RemoveActorCredentials { actor_id } => {
            handlers::remove_actor_credentials(store, actor_id)?;
            Ok(CommandOutcome::ActorUpdated(actor_id))
        }
        Command::CreateMessageDelegation {
            delegated_by,
            delegated_to,
            message_type,
            grid_areas,
            starts_at,
        } => handlers::create_delegation::<DelegationMessageType, S>(
            store,
            delegated_by,
            delegated_to,
            message_type,
            &grid_areas,
            starts_at,
        )
        .map(CommandOutcome::DelegationPeriodsCreated),
        Command::CreateProcessDelegation {
            delegated_by,
            delegated_to,
            process,
            grid_areas,
            starts_at,
        } => handlers::create_delegation::<DelegatedProcess, S>(
            store,
            delegated_by,
            delegated_to,
            process,
            &grid_areas,
            starts_at,
        )
        .map(CommandOutcome::DelegationPeriodsCreated),
        Command::StopMessageDelegation {
            delegation_id,
            period_id,
            stops_at,
        } => {
            handlers::stop_delegation::<DelegationMessageType, S>(
                store,
                delegation_id,
                period_id,
                stops_at,
            )?;
            Ok(CommandOutcome::DelegationStopped(period_id))
        }
        Command::StopProcessDelegation {
            delegation_id,
            period_id,
            stops_at,
        } => {
            handlers::stop_delegation::<DelegatedProcess, S>(
                store,
                delegation_id,
                period_id,
                stops_at,
            )?;
            Ok(CommandOutcome::DelegationStopped(period_id))
        }
        Command::ScheduleConsolidation {
            actor_from,
            actor_to,
            scheduled_at,
        } => handlers::schedule_consolidation(store, actor_from, actor_to, scheduled_at)
            .map(CommandOutcome::ConsolidationScheduled),
    }
}
