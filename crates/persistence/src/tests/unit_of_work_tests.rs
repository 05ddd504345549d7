// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_persistence, remove_db_files, temp_db_path};
use crate::Persistence;
use market_participant::{
    EntityLock, LockableEntity, MarketRoleAndGridAreaReservationService, StoreError, UnitOfWork,
    UnitOfWorkScope,
};
use market_participant_domain::{ActorId, EicFunction, GridAreaId};
use std::path::PathBuf;

#[test]
fn test_dropped_scope_rolls_back_writes() {
    let mut persistence: Persistence = create_test_persistence();
    let grid_area: GridAreaId = GridAreaId::new();

    {
        let mut uow = UnitOfWorkScope::begin(&mut persistence).unwrap();
        assert!(
            uow.try_reserve(ActorId::new(), EicFunction::GridAccessProvider, grid_area)
                .unwrap()
        );
    }

    assert_eq!(
        persistence
            .get_reservation_owner(EicFunction::GridAccessProvider, grid_area)
            .unwrap(),
        None
    );
}

#[test]
fn test_committed_scope_keeps_writes() {
    let mut persistence: Persistence = create_test_persistence();
    let grid_area: GridAreaId = GridAreaId::new();
    let owner: ActorId = ActorId::new();

    let mut uow = UnitOfWorkScope::begin(&mut persistence).unwrap();
    uow.try_reserve(owner, EicFunction::GridAccessProvider, grid_area)
        .unwrap();
    uow.commit().unwrap();

    assert_eq!(
        persistence
            .get_reservation_owner(EicFunction::GridAccessProvider, grid_area)
            .unwrap(),
        Some(owner)
    );
}

#[test]
fn test_nested_begin_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();

    persistence.begin().unwrap();
    let nested: Result<(), StoreError> = persistence.begin();
    persistence.rollback().unwrap();

    assert!(matches!(nested, Err(StoreError::Unavailable(_))));
}

#[test]
fn test_lock_inside_unit_of_work() {
    let mut persistence: Persistence = create_test_persistence();

    let mut uow = UnitOfWorkScope::begin(&mut persistence).unwrap();
    uow.lock(LockableEntity::Actor).unwrap();
    uow.lock(LockableEntity::Actor).unwrap();

    assert!(uow.commit().is_ok());
}

#[test]
fn test_commit_on_one_connection_is_seen_by_another() {
    let path: PathBuf = temp_db_path("shared_ledger");
    let mut first: Persistence = Persistence::new_with_file(&path).unwrap();
    let mut second: Persistence = Persistence::new_with_file(&path).unwrap();
    let grid_area: GridAreaId = GridAreaId::new();
    let owner: ActorId = ActorId::new();

    let mut uow = UnitOfWorkScope::begin(&mut first).unwrap();
    uow.try_reserve(owner, EicFunction::GridAccessProvider, grid_area)
        .unwrap();
    uow.commit().unwrap();

    let mut uow = UnitOfWorkScope::begin(&mut second).unwrap();
    let taken: bool = uow
        .try_reserve(ActorId::new(), EicFunction::GridAccessProvider, grid_area)
        .unwrap();
    uow.commit().unwrap();

    assert!(!taken);
    assert_eq!(
        second
            .get_reservation_owner(EicFunction::GridAccessProvider, grid_area)
            .unwrap(),
        Some(owner)
    );
    drop(first);
    drop(second);
    remove_db_files(&path);
}
