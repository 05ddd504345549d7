// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ActorConsolidationRepository, ActorError, ActorRepository, DelegationRepository,
    DomainEventRepository, EntityLock, LockableEntity, MarketRoleAndGridAreaReservationService,
    StoreError, UnitOfWork, create_actor, update_actor_status,
};
use market_participant_domain::{
    Actor, ActorConsolidation, ActorConsolidationId, ActorId, ActorNumber, ActorParts,
    ActorStatus, DelegatedProcess, Delegation, DelegationId, DelegationKind,
    DelegationMessageType, DomainEvent, EicFunction, GridAreaId, HasDomainEvents, MarketRole,
    OrganizationId,
};
use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(Debug, Clone, Default)]
struct StoreState {
    actors: BTreeMap<ActorId, Actor>,
    reservations: BTreeMap<(EicFunction, GridAreaId), ActorId>,
    message_delegations: BTreeMap<DelegationId, Delegation<DelegationMessageType>>,
    process_delegations: BTreeMap<DelegationId, Delegation<DelegatedProcess>>,
    consolidations: BTreeMap<ActorConsolidationId, ActorConsolidation>,
    events: Vec<(String, DomainEvent)>,
}

/// Store used by handler tests.
///
/// `begin` snapshots the whole state and `rollback` restores it.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: StoreState,
    snapshot: Option<StoreState>,
    pub locks: Vec<LockableEntity>,
    pub rollbacks: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.state
            .events
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn actor(&self, actor_id: ActorId) -> Actor {
        self.state.actors[&actor_id].clone()
    }

    pub fn actor_count(&self) -> usize {
        self.state.actors.len()
    }

    pub fn owner(&self, function: EicFunction, grid_area_id: GridAreaId) -> Option<ActorId> {
        self.state.reservations.get(&(function, grid_area_id)).copied()
    }

    pub fn consolidation(&self, consolidation_id: ActorConsolidationId) -> ActorConsolidation {
        self.state.consolidations[&consolidation_id].clone()
    }

    pub fn message_delegations(&self) -> Vec<Delegation<DelegationMessageType>> {
        self.state.message_delegations.values().cloned().collect()
    }

    pub fn process_delegations(&self) -> Vec<Delegation<DelegatedProcess>> {
        self.state.process_delegations.values().cloned().collect()
    }
}

fn without_events<T: HasDomainEvents + Clone>(aggregate: &T) -> T {
    let mut stored: T = aggregate.clone();
    stored.take_domain_events();
    stored
}

impl ActorRepository for InMemoryStore {
    fn get_actor(&mut self, actor_id: ActorId) -> Result<Option<Actor>, StoreError> {
        Ok(self.state.actors.get(&actor_id).cloned())
    }

    fn get_actors(&mut self, actor_ids: &[ActorId]) -> Result<Vec<Actor>, StoreError> {
        Ok(actor_ids
            .iter()
            .filter_map(|id| self.state.actors.get(id).cloned())
            .collect())
    }

    fn get_actors_in_organization(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Actor>, StoreError> {
        Ok(self
            .state
            .actors
            .values()
            .filter(|actor| actor.organization_id() == organization_id)
            .cloned()
            .collect())
    }

    fn get_active_actors_with_function(
        &mut self,
        function: EicFunction,
    ) -> Result<Vec<Actor>, StoreError> {
        Ok(self
            .state
            .actors
            .values()
            .filter(|actor| actor.status() == ActorStatus::Active && actor.has_function(function))
            .cloned()
            .collect())
    }

    fn get_actors_page(&mut self, offset: usize, limit: usize) -> Result<Vec<Actor>, StoreError> {
        Ok(self
            .state
            .actors
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn add_or_update_actor(&mut self, actor: &Actor) -> Result<Result<(), ActorError>, StoreError> {
        if let Some(thumbprint) = actor.credentials().and_then(|c| c.thumbprint()) {
            let taken: bool = self.state.actors.values().any(|other| {
                other.id() != actor.id()
                    && other.credentials().and_then(|c| c.thumbprint()) == Some(thumbprint)
            });
            if taken {
                return Ok(Err(ActorError::ThumbprintCredentialsConflict {
                    thumbprint: thumbprint.to_string(),
                }));
            }
        }
        self.state.actors.insert(actor.id(), without_events(actor));
        Ok(Ok(()))
    }
}

impl MarketRoleAndGridAreaReservationService for InMemoryStore {
    fn try_reserve(
        &mut self,
        actor_id: ActorId,
        function: EicFunction,
        grid_area_id: GridAreaId,
    ) -> Result<bool, StoreError> {
        let owner: &ActorId = self
            .state
            .reservations
            .entry((function, grid_area_id))
            .or_insert(actor_id);
        Ok(*owner == actor_id)
    }

    fn remove_all_reservations(&mut self, actor_id: ActorId) -> Result<(), StoreError> {
        self.state.reservations.retain(|_, owner| *owner != actor_id);
        Ok(())
    }

    fn get_reservation_owner(
        &mut self,
        function: EicFunction,
        grid_area_id: GridAreaId,
    ) -> Result<Option<ActorId>, StoreError> {
        Ok(self.owner(function, grid_area_id))
    }
}

fn find_for_actor<K: DelegationKind>(
    delegations: &BTreeMap<DelegationId, Delegation<K>>,
    actor_id: ActorId,
) -> Vec<Delegation<K>> {
    delegations
        .values()
        .filter(|delegation| delegation.delegated_by() == actor_id)
        .cloned()
        .collect()
}

fn find_to_actor<K: DelegationKind>(
    delegations: &BTreeMap<DelegationId, Delegation<K>>,
    actor_id: ActorId,
) -> Vec<Delegation<K>> {
    delegations
        .values()
        .filter(|delegation| delegation.delegates_to(actor_id))
        .cloned()
        .collect()
}

macro_rules! in_memory_delegations {
    ($kind:ty, $field:ident) => {
        impl DelegationRepository<$kind> for InMemoryStore {
            fn get_delegation(
                &mut self,
                delegation_id: DelegationId,
            ) -> Result<Option<Delegation<$kind>>, StoreError> {
                Ok(self.state.$field.get(&delegation_id).cloned())
            }

            fn get_delegations_for_actor(
                &mut self,
                actor_id: ActorId,
            ) -> Result<Vec<Delegation<$kind>>, StoreError> {
                Ok(find_for_actor(&self.state.$field, actor_id))
            }

            fn get_delegation_for_actor(
                &mut self,
                actor_id: ActorId,
                kind: $kind,
            ) -> Result<Option<Delegation<$kind>>, StoreError> {
                Ok(find_for_actor(&self.state.$field, actor_id)
                    .into_iter()
                    .find(|delegation| delegation.kind() == kind))
            }

            fn get_delegations_to_actor(
                &mut self,
                actor_id: ActorId,
            ) -> Result<Vec<Delegation<$kind>>, StoreError> {
                Ok(find_to_actor(&self.state.$field, actor_id))
            }

            fn add_or_update_delegation(
                &mut self,
                delegation: &Delegation<$kind>,
            ) -> Result<(), StoreError> {
                self.state
                    .$field
                    .insert(delegation.id(), without_events(delegation));
                Ok(())
            }
        }
    };
}

in_memory_delegations!(DelegationMessageType, message_delegations);
in_memory_delegations!(DelegatedProcess, process_delegations);

impl ActorConsolidationRepository for InMemoryStore {
    fn get_consolidations(&mut self) -> Result<Vec<ActorConsolidation>, StoreError> {
        Ok(self.state.consolidations.values().cloned().collect())
    }

    fn get_consolidation(
        &mut self,
        consolidation_id: ActorConsolidationId,
    ) -> Result<Option<ActorConsolidation>, StoreError> {
        Ok(self.state.consolidations.get(&consolidation_id).cloned())
    }

    fn get_ready_to_consolidate(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<Vec<ActorConsolidation>, StoreError> {
        Ok(self
            .state
            .consolidations
            .values()
            .filter(|consolidation| consolidation.is_ready(now))
            .cloned()
            .collect())
    }

    fn add_or_update_consolidation(
        &mut self,
        consolidation: &ActorConsolidation,
    ) -> Result<(), StoreError> {
        self.state
            .consolidations
            .insert(consolidation.id(), without_events(consolidation));
        Ok(())
    }
}

impl DomainEventRepository for InMemoryStore {
    fn enqueue(&mut self, aggregate: &mut dyn HasDomainEvents) -> Result<(), StoreError> {
        let aggregate_id: String = aggregate.aggregate_id();
        for event in aggregate.take_domain_events() {
            self.state.events.push((aggregate_id.clone(), event));
        }
        Ok(())
    }
}

impl EntityLock for InMemoryStore {
    fn lock(&mut self, entity: LockableEntity) -> Result<(), StoreError> {
        self.locks.push(entity);
        Ok(())
    }
}

impl UnitOfWork for InMemoryStore {
    fn begin(&mut self) -> Result<(), StoreError> {
        if self.snapshot.is_some() {
            return Err(StoreError::Unavailable(String::from(
                "unit of work already open",
            )));
        }
        self.snapshot = Some(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.snapshot = None;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        if let Some(snapshot) = self.snapshot.take() {
            self.state = snapshot;
        }
        self.rollbacks += 1;
        Ok(())
    }
}

pub fn actor_number(value: &str) -> ActorNumber {
    ActorNumber::new(value).unwrap()
}

pub fn role(function: EicFunction, grid_areas: &[GridAreaId]) -> MarketRole {
    MarketRole::new(function, grid_areas.to_vec(), None).unwrap()
}

/// Creates an actor through the handler.
pub fn create_test_actor(
    store: &mut InMemoryStore,
    organization_id: OrganizationId,
    number: &str,
    market_roles: Vec<MarketRole>,
) -> ActorId {
    create_actor(
        store,
        organization_id,
        actor_number(number),
        String::from("Test Actor"),
        market_roles,
    )
    .unwrap()
}

/// Creates and activates an actor through the handlers.
pub fn create_active_actor(
    store: &mut InMemoryStore,
    organization_id: OrganizationId,
    number: &str,
    market_roles: Vec<MarketRole>,
) -> ActorId {
    let actor_id: ActorId = create_test_actor(store, organization_id, number, market_roles);
    update_actor_status(store, actor_id, ActorStatus::Active).unwrap();
    actor_id
}

/// Returns a valid GLN actor number built from `n`.
pub fn gln(n: u32) -> String {
    format!("579{n:010}")
}

/// Stores an actor directly, bypassing the handlers.
///
/// Used for state the handlers refuse to create, such as the first
/// DataHub administrator of an organization.
pub fn seed_actor(
    store: &mut InMemoryStore,
    organization_id: OrganizationId,
    number: &str,
    status: ActorStatus,
    market_roles: Vec<MarketRole>,
) -> ActorId {
    let actor: Actor = Actor::restore(ActorParts {
        id: ActorId::new(),
        organization_id,
        actor_number: actor_number(number),
        name: String::from("Seeded Actor"),
        status,
        external_actor_id: None,
        credentials: None,
        market_roles,
    });
    store.add_or_update_actor(&actor).unwrap().unwrap();
    actor.id()
}
