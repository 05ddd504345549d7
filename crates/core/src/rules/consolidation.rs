// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::repositories::ActorConsolidationRepository;
use market_participant_domain::{ActorConsolidation, ActorId, DomainError};

/// Ensures neither actor has taken part in a consolidation before.
///
/// Every stored consolidation counts, whatever its status, and each actor
/// takes part in at most one. The source is checked first.
///
/// # Errors
///
/// Returns `DomainError::ConsolidationFromExists` or
/// `DomainError::ConsolidationToExists`, or a store error.
pub fn check_existing_consolidation<S>(
    store: &mut S,
    actor_from: ActorId,
    actor_to: ActorId,
) -> Result<(), CoreError>
where
    S: ActorConsolidationRepository,
{
    let existing: Vec<ActorConsolidation> = store.get_consolidations()?;

    for consolidation in &existing {
        if consolidation.actor_from() == actor_from || consolidation.actor_to() == actor_from {
            return Err(DomainError::ConsolidationFromExists {
                actor_id: actor_from,
            }
            .into());
        }
        if consolidation.actor_from() == actor_to || consolidation.actor_to() == actor_to {
            return Err(DomainError::ConsolidationToExists { actor_id: actor_to }.into());
        }
    }

    Ok(())
}
