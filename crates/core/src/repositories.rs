// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Interfaces to the stores behind the rules and handlers.
//!
//! A single store type is expected to implement all of these and is passed
//! to handlers as `&mut S` where `S: MarketParticipantStore`. Every mutation
//! happens inside a [`UnitOfWorkScope`].

use crate::error::{ActorError, StoreError};
use market_participant_domain::{
    Actor, ActorConsolidation, ActorConsolidationId, ActorId, DelegatedProcess, Delegation,
    DelegationId, DelegationKind, DelegationMessageType, EicFunction, GridAreaId, HasDomainEvents,
    OrganizationId,
};
use std::ops::{Deref, DerefMut};
use time::OffsetDateTime;
use tracing::{debug, warn};

/// Access to the actor aggregate.
pub trait ActorRepository {
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_actor(&mut self, actor_id: ActorId) -> Result<Option<Actor>, StoreError>;

    /// Returns the actors among `actor_ids` that exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_actors(&mut self, actor_ids: &[ActorId]) -> Result<Vec<Actor>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_actors_in_organization(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Actor>, StoreError>;

    /// Returns `Active` actors holding `function`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_active_actors_with_function(
        &mut self,
        function: EicFunction,
    ) -> Result<Vec<Actor>, StoreError>;

    /// Returns one page of all actors ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_actors_page(&mut self, offset: usize, limit: usize) -> Result<Vec<Actor>, StoreError>;

    /// Inserts or replaces the actor.
    ///
    /// The outer result reports store failures. The inner result reports
    /// conflicts only detectable by the store, which callers must translate.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn add_or_update_actor(&mut self, actor: &Actor) -> Result<Result<(), ActorError>, StoreError>;
}

/// The reservation ledger mapping (function, grid area) to one owning actor.
pub trait MarketRoleAndGridAreaReservationService {
    /// Binds the pair to `actor_id`.
    ///
    /// Returns `false` without changing anything if another actor holds the
    /// pair, `true` if it is now (or already was) held by `actor_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn try_reserve(
        &mut self,
        actor_id: ActorId,
        function: EicFunction,
        grid_area_id: GridAreaId,
    ) -> Result<bool, StoreError>;

    /// Releases every pair owned by `actor_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn remove_all_reservations(&mut self, actor_id: ActorId) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_reservation_owner(
        &mut self,
        function: EicFunction,
        grid_area_id: GridAreaId,
    ) -> Result<Option<ActorId>, StoreError>;
}

/// Access to delegations of one kind.
pub trait DelegationRepository<K: DelegationKind> {
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_delegation(
        &mut self,
        delegation_id: DelegationId,
    ) -> Result<Option<Delegation<K>>, StoreError>;

    /// Returns every delegation owned by `actor_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_delegations_for_actor(&mut self, actor_id: ActorId)
    -> Result<Vec<Delegation<K>>, StoreError>;

    /// Returns the delegation owned by `actor_id` for `kind`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_delegation_for_actor(
        &mut self,
        actor_id: ActorId,
        kind: K,
    ) -> Result<Option<Delegation<K>>, StoreError>;

    /// Returns delegations with at least one period pointing at `actor_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_delegations_to_actor(
        &mut self,
        actor_id: ActorId,
    ) -> Result<Vec<Delegation<K>>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn add_or_update_delegation(&mut self, delegation: &Delegation<K>) -> Result<(), StoreError>;
}

/// Message delegations.
pub trait MessageDelegationRepository: DelegationRepository<DelegationMessageType> {}

impl<T: DelegationRepository<DelegationMessageType>> MessageDelegationRepository for T {}

/// Process delegations.
pub trait ProcessDelegationRepository: DelegationRepository<DelegatedProcess> {}

impl<T: DelegationRepository<DelegatedProcess>> ProcessDelegationRepository for T {}

/// Access to actor consolidations.
pub trait ActorConsolidationRepository {
    /// Returns every consolidation regardless of status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_consolidations(&mut self) -> Result<Vec<ActorConsolidation>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_consolidation(
        &mut self,
        consolidation_id: ActorConsolidationId,
    ) -> Result<Option<ActorConsolidation>, StoreError>;

    /// Returns pending consolidations scheduled at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn get_ready_to_consolidate(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<Vec<ActorConsolidation>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn add_or_update_consolidation(
        &mut self,
        consolidation: &ActorConsolidation,
    ) -> Result<(), StoreError>;
}

/// Outbox for domain events.
pub trait DomainEventRepository {
    /// Drains the aggregate's pending events and stores them for publication.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    fn enqueue(&mut self, aggregate: &mut dyn HasDomainEvents) -> Result<(), StoreError>;
}

/// Entities that can be locked to serialize conflicting writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockableEntity {
    Actor,
}

impl LockableEntity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Actor => "actor",
        }
    }
}

/// Coarse lock held until the surrounding unit of work ends.
pub trait EntityLock {
    /// # Errors
    ///
    /// Returns an error if the lock cannot be taken.
    fn lock(&mut self, entity: LockableEntity) -> Result<(), StoreError>;
}

/// Transaction control.
///
/// Use [`UnitOfWorkScope::begin`] rather than calling these directly.
pub trait UnitOfWork {
    /// # Errors
    ///
    /// Returns an error if a transaction cannot be started.
    fn begin(&mut self) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns an error if the transaction cannot be committed.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns an error if the transaction cannot be rolled back.
    fn rollback(&mut self) -> Result<(), StoreError>;
}

/// Everything a handler needs from storage.
pub trait MarketParticipantStore:
    ActorRepository
    + MarketRoleAndGridAreaReservationService
    + MessageDelegationRepository
    + ProcessDelegationRepository
    + ActorConsolidationRepository
    + DomainEventRepository
    + EntityLock
    + UnitOfWork
{
}

impl<T> MarketParticipantStore for T where
    T: ActorRepository
        + MarketRoleAndGridAreaReservationService
        + MessageDelegationRepository
        + ProcessDelegationRepository
        + ActorConsolidationRepository
        + DomainEventRepository
        + EntityLock
        + UnitOfWork
{
}

/// An open unit of work.
///
/// Dereferences to the store. Dropping the scope without calling
/// [`UnitOfWorkScope::commit`] rolls back everything written through it.
pub struct UnitOfWorkScope<'a, S: UnitOfWork> {
    store: &'a mut S,
    committed: bool,
}

impl<'a, S: UnitOfWork> UnitOfWorkScope<'a, S> {
    /// Starts a unit of work on `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot start a transaction.
    pub fn begin(store: &'a mut S) -> Result<Self, StoreError> {
        store.begin()?;
        debug!("Unit of work started");
        Ok(Self {
            store,
            committed: false,
        })
    }

    /// Commits all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; the scope then rolls back on drop.
    pub fn commit(mut self) -> Result<(), StoreError> {
        self.store.commit()?;
        self.committed = true;
        debug!("Unit of work committed");
        Ok(())
    }
}

impl<S: UnitOfWork> Deref for UnitOfWorkScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        self.store
    }
}

impl<S: UnitOfWork> DerefMut for UnitOfWorkScope<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.store
    }
}

impl<S: UnitOfWork> Drop for UnitOfWorkScope<'_, S> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match self.store.rollback() {
            Ok(()) => debug!("Unit of work rolled back"),
            Err(err) => warn!(error = %err, "Failed to roll back unit of work"),
        }
    }
}
