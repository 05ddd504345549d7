// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{InMemoryStore, create_test_actor, gln, role};
use crate::{
    CoreError, MarketRoleAndGridAreaReservationService, StoreError, UnitOfWorkScope, create_actor,
};
use market_participant_domain::{ActorId, ActorNumber, EicFunction, GridAreaId, OrganizationId};

#[test]
fn test_dropped_scope_rolls_back() {
    let mut store: InMemoryStore = InMemoryStore::new();
    let grid_area: GridAreaId = GridAreaId::new();

    {
        let mut uow = UnitOfWorkScope::begin(&mut store).unwrap();
        let reserved: Result<bool, StoreError> =
            uow.try_reserve(ActorId::new(), EicFunction::GridAccessProvider, grid_area);
        assert_eq!(reserved, Ok(true));
    }

    assert_eq!(store.owner(EicFunction::GridAccessProvider, grid_area), None);
    assert_eq!(store.rollbacks, 1);
}

#[test]
fn test_committed_scope_keeps_changes() {
    let mut store: InMemoryStore = InMemoryStore::new();
    let grid_area: GridAreaId = GridAreaId::new();
    let actor_id: ActorId = ActorId::new();

    let mut uow = UnitOfWorkScope::begin(&mut store).unwrap();
    uow.try_reserve(actor_id, EicFunction::GridAccessProvider, grid_area)
        .unwrap();
    uow.commit().unwrap();

    assert_eq!(
        store.owner(EicFunction::GridAccessProvider, grid_area),
        Some(actor_id)
    );
    assert_eq!(store.rollbacks, 0);
}

#[test]
fn test_rejected_command_leaves_no_partial_writes() {
    let mut store: InMemoryStore = InMemoryStore::new();
    let organization_id: OrganizationId = OrganizationId::new();
    let grid_area: GridAreaId = GridAreaId::new();
    create_test_actor(
        &mut store,
        organization_id,
        &gln(1),
        vec![role(EicFunction::EnergySupplier, &[])],
    );
    let rollbacks_before: usize = store.rollbacks;

    // The grid area is reserved before the duplicate function is detected.
    let result: Result<ActorId, CoreError> = create_actor(
        &mut store,
        organization_id,
        ActorNumber::new(&gln(1)).unwrap(),
        String::from("Duplicate"),
        vec![
            role(EicFunction::GridAccessProvider, &[grid_area]),
            role(EicFunction::EnergySupplier, &[]),
        ],
    );

    assert_eq!(
        result.unwrap_err().code(),
        Some("actor.market_role.reserved")
    );
    assert_eq!(store.rollbacks, rollbacks_before + 1);
    assert_eq!(store.owner(EicFunction::GridAccessProvider, grid_area), None);
    assert_eq!(store.actor_count(), 1);
    assert!(store.events().is_empty());
}
