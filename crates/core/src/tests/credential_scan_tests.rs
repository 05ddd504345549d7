// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{InMemoryStore, actor_number, gln};
use crate::{
    ActorRepository, CREDENTIAL_SCAN_BATCH_SIZE, ExpiringCredentials, scan_expiring_credentials,
};
use market_participant_domain::{
    Actor, ActorCredentials, ActorId, ActorParts, ActorStatus, CertificateCredentials,
    DomainEvent, OrganizationId,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

const NOW: OffsetDateTime = datetime!(2026-10-01 12:00 UTC);

fn actor_with_certificate(
    store: &mut InMemoryStore,
    n: u32,
    status: ActorStatus,
    expires_at: OffsetDateTime,
) -> ActorId {
    let actor: Actor = Actor::restore(ActorParts {
        id: ActorId::new(),
        organization_id: OrganizationId::new(),
        actor_number: actor_number(&gln(n)),
        name: format!("Actor {n}"),
        status,
        external_actor_id: None,
        credentials: Some(ActorCredentials::Certificate(CertificateCredentials {
            thumbprint: format!("THUMB{n}"),
            key_vault_secret_identifier: format!("https://vault/secrets/{n}"),
            expires_at,
        })),
        market_roles: Vec::new(),
    });
    store.add_or_update_actor(&actor).unwrap().unwrap();
    actor.id()
}

fn expiring_events(store: &InMemoryStore) -> Vec<ActorId> {
    store
        .events()
        .into_iter()
        .filter_map(|event| match event {
            DomainEvent::ActorCredentialsExpiring { actor_id, .. } => Some(actor_id),
            _ => None,
        })
        .collect()
}

#[test]
fn test_only_credentials_inside_window_are_reported() {
    let mut store: InMemoryStore = InMemoryStore::new();
    let soon: ActorId =
        actor_with_certificate(&mut store, 1, ActorStatus::Active, NOW + Duration::days(10));
    let expired: ActorId =
        actor_with_certificate(&mut store, 2, ActorStatus::Active, NOW - Duration::days(1));
    actor_with_certificate(&mut store, 3, ActorStatus::Active, NOW + Duration::days(90));

    let mut reported: Vec<ActorId> = scan_expiring_credentials(&mut store, NOW)
        .unwrap()
        .into_iter()
        .map(|entry| entry.actor_id)
        .collect();
    reported.sort();

    let mut expected: Vec<ActorId> = vec![soon, expired];
    expected.sort();
    assert_eq!(reported, expected);

    let mut events: Vec<ActorId> = expiring_events(&store);
    events.sort();
    assert_eq!(events, expected);
}

#[test]
fn test_report_carries_actor_number_and_expiry() {
    let mut store: InMemoryStore = InMemoryStore::new();
    let expires_at: OffsetDateTime = NOW + Duration::days(29);
    let actor_id: ActorId = actor_with_certificate(&mut store, 7, ActorStatus::Passive, expires_at);

    let reported: Vec<ExpiringCredentials> = scan_expiring_credentials(&mut store, NOW).unwrap();

    assert_eq!(
        reported,
        vec![ExpiringCredentials {
            actor_id,
            actor_number: actor_number(&gln(7)),
            expires_at,
        }]
    );
}

#[test]
fn test_deleted_actors_are_skipped() {
    let mut store: InMemoryStore = InMemoryStore::new();
    actor_with_certificate(&mut store, 1, ActorStatus::Deleted, NOW + Duration::days(1));

    let reported: Vec<ExpiringCredentials> = scan_expiring_credentials(&mut store, NOW).unwrap();

    assert!(reported.is_empty());
    assert!(expiring_events(&store).is_empty());
}

#[test]
fn test_scan_covers_every_page() {
    let mut store: InMemoryStore = InMemoryStore::new();
    let total: u32 = u32::try_from(CREDENTIAL_SCAN_BATCH_SIZE * 2 + 17).unwrap();
    for n in 0..total {
        actor_with_certificate(&mut store, n, ActorStatus::Active, NOW + Duration::days(5));
    }

    let reported: Vec<ExpiringCredentials> = scan_expiring_credentials(&mut store, NOW).unwrap();

    assert_eq!(reported.len(), total as usize);
    assert_eq!(expiring_events(&store).len(), total as usize);
}

#[test]
fn test_page_boundary_does_not_loop() {
    let mut store: InMemoryStore = InMemoryStore::new();
    let total: u32 = u32::try_from(CREDENTIAL_SCAN_BATCH_SIZE).unwrap();
    for n in 0..total {
        actor_with_certificate(&mut store, n, ActorStatus::Active, NOW + Duration::days(5));
    }

    let reported: Vec<ExpiringCredentials> = scan_expiring_credentials(&mut store, NOW).unwrap();

    assert_eq!(reported.len(), CREDENTIAL_SCAN_BATCH_SIZE);
}

#[test]
fn test_every_scan_reports_again() {
    let mut store: InMemoryStore = InMemoryStore::new();
    actor_with_certificate(&mut store, 1, ActorStatus::Active, NOW + Duration::days(3));

    scan_expiring_credentials(&mut store, NOW).unwrap();
    scan_expiring_credentials(&mut store, NOW + Duration::days(1)).unwrap();

    assert_eq!(expiring_events(&store).len(), 2);
}
