// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::load_actor;
use crate::error::CoreError;
use crate::repositories::{MarketParticipantStore, UnitOfWorkScope};
use crate::rules::check_existing_consolidation;
use market_participant_domain::{
    Actor, ActorConsolidation, ActorConsolidationId, ActorId, EicFunction,
};
use time::OffsetDateTime;
use tracing::info;

/// Schedules the merge of `actor_from` into `actor_to` at `scheduled_at`.
///
/// Every `Active` DataHub administrator is notified through one
/// `ConsolidationNotificationRequested` event each.
///
/// # Errors
///
/// Returns an error if either actor does not exist, both are the same actor
/// or either actor already took part in a consolidation.
pub fn schedule_consolidation<S>(
    store: &mut S,
    actor_from: ActorId,
    actor_to: ActorId,
    scheduled_at: OffsetDateTime,
) -> Result<ActorConsolidationId, CoreError>
where
    S: MarketParticipantStore,
{
    let mut uow = UnitOfWorkScope::begin(store)?;

    load_actor(&mut *uow, actor_from)?;
    load_actor(&mut *uow, actor_to)?;

    let mut consolidation: ActorConsolidation =
        ActorConsolidation::schedule(actor_from, actor_to, scheduled_at)?;
    check_existing_consolidation(&mut *uow, actor_from, actor_to)?;

    let administrators: Vec<Actor> =
        uow.get_active_actors_with_function(EicFunction::DataHubAdministrator)?;
    for administrator in &administrators {
        consolidation.request_notification(administrator.id());
    }

    uow.add_or_update_consolidation(&consolidation)?;
    uow.enqueue(&mut consolidation)?;
    uow.commit()?;

    info!(
        consolidation_id = %consolidation.id(),
        %actor_from,
        %actor_to,
        %scheduled_at,
        notified = administrators.len(),
        "Scheduled actor consolidation"
    );
    Ok(consolidation.id())
}
