// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Repository trait implementations for [`Persistence`].
//!
//! Each method forwards to a query or mutation and converts
//! [`PersistenceError`] into the core's [`StoreError`].

use market_participant::{
    ActorConsolidationRepository, ActorError, ActorRepository, DelegationRepository,
    DomainEventRepository, EntityLock, LockableEntity, MarketRoleAndGridAreaReservationService,
    StoreError, UnitOfWork,
};
use market_participant_domain::{
    Actor, ActorConsolidation, ActorConsolidationId, ActorId, Delegation, DelegationId,
    DelegationKind, DomainEvent, EicFunction, GridAreaId, HasDomainEvents, OrganizationId,
};
use time::OffsetDateTime;
use tracing::warn;

use crate::error::PersistenceError;
use crate::{Persistence, backend, mutations, queries};

impl ActorRepository for Persistence {
    fn get_actor(&mut self, actor_id: ActorId) -> Result<Option<Actor>, StoreError> {
        Ok(queries::actors::get_actor(&mut self.conn, actor_id)?)
    }

    fn get_actors(&mut self, actor_ids: &[ActorId]) -> Result<Vec<Actor>, StoreError> {
        Ok(queries::actors::get_actors(&mut self.conn, actor_ids)?)
    }

    fn get_actors_in_organization(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Actor>, StoreError> {
        Ok(queries::actors::get_actors_in_organization(
            &mut self.conn,
            organization_id,
        )?)
    }

    fn get_active_actors_with_function(
        &mut self,
        function: EicFunction,
    ) -> Result<Vec<Actor>, StoreError> {
        Ok(queries::actors::get_active_actors_with_function(
            &mut self.conn,
            function,
        )?)
    }

    fn get_actors_page(&mut self, offset: usize, limit: usize) -> Result<Vec<Actor>, StoreError> {
        Ok(queries::actors::get_actors_page(
            &mut self.conn,
            offset,
            limit,
        )?)
    }

    fn add_or_update_actor(&mut self, actor: &Actor) -> Result<Result<(), ActorError>, StoreError> {
        Ok(mutations::actors::save_actor(&mut self.conn, actor)?)
    }
}

impl MarketRoleAndGridAreaReservationService for Persistence {
    fn try_reserve(
        &mut self,
        actor_id: ActorId,
        function: EicFunction,
        grid_area_id: GridAreaId,
    ) -> Result<bool, StoreError> {
        Ok(mutations::reservations::try_reserve(
            &mut self.conn,
            actor_id,
            function,
            grid_area_id,
        )?)
    }

    fn remove_all_reservations(&mut self, actor_id: ActorId) -> Result<(), StoreError> {
        Ok(mutations::reservations::remove_all_reservations(
            &mut self.conn,
            actor_id,
        )?)
    }

    fn get_reservation_owner(
        &mut self,
        function: EicFunction,
        grid_area_id: GridAreaId,
    ) -> Result<Option<ActorId>, StoreError> {
        Ok(queries::reservations::get_reservation_owner(
            &mut self.conn,
            function,
            grid_area_id,
        )?)
    }
}

impl<K: DelegationKind> DelegationRepository<K> for Persistence {
    fn get_delegation(
        &mut self,
        delegation_id: DelegationId,
    ) -> Result<Option<Delegation<K>>, StoreError> {
        Ok(queries::delegations::get_delegation(
            &mut self.conn,
            delegation_id,
        )?)
    }

    fn get_delegations_for_actor(
        &mut self,
        actor_id: ActorId,
    ) -> Result<Vec<Delegation<K>>, StoreError> {
        Ok(queries::delegations::get_delegations_for_actor(
            &mut self.conn,
            actor_id,
        )?)
    }

    fn get_delegation_for_actor(
        &mut self,
        actor_id: ActorId,
        kind: K,
    ) -> Result<Option<Delegation<K>>, StoreError> {
        Ok(queries::delegations::get_delegation_for_actor(
            &mut self.conn,
            actor_id,
            kind,
        )?)
    }

    fn get_delegations_to_actor(
        &mut self,
        actor_id: ActorId,
    ) -> Result<Vec<Delegation<K>>, StoreError> {
        Ok(queries::delegations::get_delegations_to_actor(
            &mut self.conn,
            actor_id,
        )?)
    }

    fn add_or_update_delegation(&mut self, delegation: &Delegation<K>) -> Result<(), StoreError> {
        Ok(mutations::delegations::save_delegation(
            &mut self.conn,
            delegation,
        )?)
    }
}

impl ActorConsolidationRepository for Persistence {
    fn get_consolidations(&mut self) -> Result<Vec<ActorConsolidation>, StoreError> {
        Ok(queries::consolidations::get_consolidations(&mut self.conn)?)
    }

    fn get_consolidation(
        &mut self,
        consolidation_id: ActorConsolidationId,
    ) -> Result<Option<ActorConsolidation>, StoreError> {
        Ok(queries::consolidations::get_consolidation(
            &mut self.conn,
            consolidation_id,
        )?)
    }

    fn get_ready_to_consolidate(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<Vec<ActorConsolidation>, StoreError> {
        Ok(queries::consolidations::get_ready_to_consolidate(
            &mut self.conn,
            now,
        )?)
    }

    fn add_or_update_consolidation(
        &mut self,
        consolidation: &ActorConsolidation,
    ) -> Result<(), StoreError> {
        Ok(mutations::consolidations::save_consolidation(
            &mut self.conn,
            consolidation,
        )?)
    }
}

impl DomainEventRepository for Persistence {
    fn enqueue(&mut self, aggregate: &mut dyn HasDomainEvents) -> Result<(), StoreError> {
        let aggregate_id: String = aggregate.aggregate_id();
        let events: Vec<DomainEvent> = aggregate.take_domain_events();
        Ok(mutations::events::enqueue_events(
            &mut self.conn,
            &aggregate_id,
            &events,
        )?)
    }
}

impl EntityLock for Persistence {
    fn lock(&mut self, entity: LockableEntity) -> Result<(), StoreError> {
        Ok(mutations::events::lock_entity(
            &mut self.conn,
            entity.as_str(),
        )?)
    }
}

impl UnitOfWork for Persistence {
    fn begin(&mut self) -> Result<(), StoreError> {
        Ok(backend::sqlite::begin_immediate(&mut self.conn)?)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        Ok(backend::sqlite::commit(&mut self.conn)?)
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        backend::sqlite::rollback(&mut self.conn).map_err(|e: PersistenceError| {
            warn!("Rollback failed: {}", e);
            StoreError::from(e)
        })
    }
}
