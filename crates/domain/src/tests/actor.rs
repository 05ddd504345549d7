// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Actor, ActorCredentials, ActorNumber, ActorStatus, CertificateCredentials,
    ClientSecretCredentials, DomainError, DomainEvent, EicFunction, GridAreaId, HasDomainEvents,
    MarketRole, OrganizationId,
};
use time::OffsetDateTime;
use time::macros::datetime;

fn create_test_actor() -> Actor {
    Actor::new(
        OrganizationId::new(),
        ActorNumber::new("5790000555550").unwrap(),
        String::from("Test Actor"),
    )
}

fn grid_access_provider(grid_area: GridAreaId) -> MarketRole {
    MarketRole::new(EicFunction::GridAccessProvider, vec![grid_area], None).unwrap()
}

fn certificate(thumbprint: &str, expires_at: OffsetDateTime) -> ActorCredentials {
    ActorCredentials::Certificate(CertificateCredentials {
        thumbprint: thumbprint.to_string(),
        key_vault_secret_identifier: String::from("kv/secret"),
        expires_at,
    })
}

#[test]
fn test_new_actor_starts_new_without_events() {
    let actor: Actor = create_test_actor();
    assert_eq!(actor.status(), ActorStatus::New);
    assert!(actor.domain_events().is_empty());
    assert!(actor.market_roles().is_empty());
}

#[test]
fn test_activation_emits_one_ownership_event_per_grid_area() {
    let grid_area: GridAreaId = GridAreaId::new();
    let mut actor: Actor = create_test_actor();
    actor.add_market_role(grid_access_provider(grid_area)).unwrap();
    actor
        .add_market_role(MarketRole::new(EicFunction::MeterOperator, vec![GridAreaId::new()], None).unwrap())
        .unwrap();

    actor.activate().unwrap();

    let events: Vec<DomainEvent> = actor.take_domain_events();
    let ownership: Vec<&DomainEvent> = events
        .iter()
        .filter(|event| matches!(event, DomainEvent::GridAreaOwnershipAssigned { .. }))
        .collect();
    assert_eq!(ownership.len(), 1);
    assert!(matches!(
        ownership[0],
        DomainEvent::GridAreaOwnershipAssigned { grid_area_id, .. } if *grid_area_id == grid_area
    ));
    assert!(matches!(events[0], DomainEvent::ActorActivated { .. }));
    assert!(actor.domain_events().is_empty());
}

#[test]
fn test_reactivating_active_actor_emits_nothing() {
    let mut actor: Actor = create_test_actor();
    actor.add_market_role(grid_access_provider(GridAreaId::new())).unwrap();
    actor.activate().unwrap();
    actor.take_domain_events();

    actor.activate().unwrap();
    assert!(actor.domain_events().is_empty());
}

#[test]
fn test_market_roles_locked_after_activation() {
    let mut actor: Actor = create_test_actor();
    actor.activate().unwrap();

    let result: Result<(), DomainError> =
        actor.add_market_role(grid_access_provider(GridAreaId::new()));
    assert_eq!(result.unwrap_err().code(), "actor.market_roles.locked");

    let result: Result<bool, DomainError> = actor.remove_market_role(EicFunction::EnergySupplier);
    assert!(result.is_err());
}

#[test]
fn test_duplicate_function_on_actor_is_rejected() {
    let mut actor: Actor = create_test_actor();
    actor.add_market_role(grid_access_provider(GridAreaId::new())).unwrap();

    let result: Result<(), DomainError> =
        actor.add_market_role(grid_access_provider(GridAreaId::new()));
    assert_eq!(result.unwrap_err().code(), "actor.market_role.reserved");

    let result: Result<(), DomainError> = actor.set_market_roles(vec![
        MarketRole::new(EicFunction::EnergySupplier, vec![], None).unwrap(),
        MarketRole::new(EicFunction::EnergySupplier, vec![], None).unwrap(),
    ]);
    assert!(result.is_err());
    assert_eq!(actor.market_roles().len(), 1);
}

#[test]
fn test_set_status_follows_transition_graph() {
    let mut actor: Actor = create_test_actor();

    let result: Result<(), DomainError> = actor.set_status(ActorStatus::Passive);
    assert!(matches!(
        result,
        Err(DomainError::InvalidStatusTransition {
            from: ActorStatus::New,
            to: ActorStatus::Passive
        })
    ));

    actor.set_status(ActorStatus::Active).unwrap();
    actor.set_status(ActorStatus::Passive).unwrap();
    actor.set_status(ActorStatus::Active).unwrap();
    assert_eq!(actor.status(), ActorStatus::Active);

    // Activation through the setter raises the same events.
    let events: Vec<DomainEvent> = actor.take_domain_events();
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, DomainEvent::ActorActivated { .. }))
            .count(),
        2
    );
}

#[test]
fn test_delete_is_terminal_and_drops_credentials() {
    let mut actor: Actor = create_test_actor();
    actor
        .assign_credentials(certificate("AB12", datetime!(2027-01-01 00:00 UTC)))
        .unwrap();
    actor.delete().unwrap();

    assert_eq!(actor.status(), ActorStatus::Deleted);
    assert!(actor.credentials().is_none());
    assert!(actor.activate().is_err());
    assert!(
        actor
            .domain_events()
            .iter()
            .any(|event| matches!(event, DomainEvent::ActorCredentialsRemoved { .. }))
    );
}

#[test]
fn test_credentials_are_exclusive() {
    let mut actor: Actor = create_test_actor();
    actor
        .assign_credentials(certificate("AB12", datetime!(2027-01-01 00:00 UTC)))
        .unwrap();

    let result: Result<(), DomainError> =
        actor.assign_credentials(ActorCredentials::ClientSecret(ClientSecretCredentials {
            client_id: String::from("client"),
            secret_identifier: String::from("secret"),
            expires_at: datetime!(2027-01-01 00:00 UTC),
        }));
    assert_eq!(result.unwrap_err().code(), "actor.credentials.already_assigned");

    assert!(actor.remove_credentials());
    assert!(!actor.remove_credentials());
}

#[test]
fn test_report_expiring_credentials() {
    let now: OffsetDateTime = datetime!(2026-06-01 00:00 UTC);
    let mut actor: Actor = create_test_actor();
    assert!(!actor.report_expiring_credentials(now));

    actor
        .assign_credentials(certificate("AB12", datetime!(2026-06-20 00:00 UTC)))
        .unwrap();
    actor.take_domain_events();

    assert!(actor.report_expiring_credentials(now));
    assert!(matches!(
        actor.domain_events(),
        [DomainEvent::ActorCredentialsExpiring { .. }]
    ));
}

#[test]
fn test_take_over_grid_areas_merges_into_existing_role() {
    let kept: GridAreaId = GridAreaId::new();
    let moved: GridAreaId = GridAreaId::new();

    let mut target: Actor = create_test_actor();
    target.add_market_role(grid_access_provider(kept)).unwrap();
    target.activate().unwrap();
    target.take_domain_events();

    let mut source: Actor = create_test_actor();
    source.add_market_role(grid_access_provider(moved)).unwrap();

    let added: Vec<GridAreaId> = target.take_over_grid_areas(&source);
    assert_eq!(added, vec![moved]);
    assert_eq!(target.market_roles()[0].grid_areas(), &[kept, moved]);
    assert!(matches!(
        target.domain_events(),
        [DomainEvent::GridAreaOwnershipAssigned { grid_area_id, .. }] if *grid_area_id == moved
    ));
}

#[test]
fn test_take_over_grid_areas_creates_role_when_missing() {
    let moved: GridAreaId = GridAreaId::new();
    let mut target: Actor = create_test_actor();
    let mut source: Actor = create_test_actor();
    source.add_market_role(grid_access_provider(moved)).unwrap();

    let added: Vec<GridAreaId> = target.take_over_grid_areas(&source);
    assert_eq!(added, vec![moved]);
    assert!(target.has_function(EicFunction::GridAccessProvider));
    // Target is still New, so ownership is published on activation instead.
    assert!(target.domain_events().is_empty());
}

#[test]
fn test_reservable_pairs_only_cover_grid_access_provider() {
    let grid_area: GridAreaId = GridAreaId::new();
    let mut actor: Actor = create_test_actor();
    actor.add_market_role(grid_access_provider(grid_area)).unwrap();
    actor
        .add_market_role(MarketRole::new(EicFunction::EnergySupplier, vec![GridAreaId::new()], None).unwrap())
        .unwrap();

    assert_eq!(
        actor.reservable_pairs(),
        vec![(EicFunction::GridAccessProvider, grid_area)]
    );
}
