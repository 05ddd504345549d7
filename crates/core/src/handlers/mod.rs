// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Command handlers.
//!
//! Each handler opens one unit of work, loads what it needs, runs the rules
//! and persists the aggregates together with their events. Any error drops
//! the unit of work uncommitted, which rolls everything back.

mod actor;
mod consolidation;
mod delegation;

pub use actor::{
    assign_actor_credentials, create_actor, remove_actor_credentials, update_actor_market_roles,
    update_actor_name, update_actor_status,
};
pub use consolidation::schedule_consolidation;
pub use delegation::{create_delegation, stop_delegation};

use crate::error::CoreError;
use crate::repositories::{ActorRepository, DomainEventRepository};
use market_participant_domain::{Actor, ActorId, DomainError};
use tracing::warn;

pub(crate) fn load_actor<S>(store: &mut S, actor_id: ActorId) -> Result<Actor, CoreError>
where
    S: ActorRepository,
{
    store
        .get_actor(actor_id)?
        .ok_or_else(|| DomainError::ActorNotFound(actor_id).into())
}

/// Persists the actor and its pending events.
pub(crate) fn save_actor<S>(store: &mut S, actor: &mut Actor) -> Result<(), CoreError>
where
    S: ActorRepository + DomainEventRepository,
{
    if let Err(conflict) = store.add_or_update_actor(actor)? {
        warn!(actor_id = %actor.id(), error = %conflict, "Actor store rejected update");
        return Err(DomainError::from(conflict).into());
    }
    store.enqueue(actor)?;
    Ok(())
}
