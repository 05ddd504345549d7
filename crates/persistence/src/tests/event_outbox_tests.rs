// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_persistence, gln};
use crate::{Persistence, StoredDomainEvent};
use market_participant::DomainEventRepository;
use market_participant_domain::{
    Actor, ActorNumber, DomainEvent, HasDomainEvents, OrganizationId,
};
use time::macros::datetime;

fn activated_actor(n: u32) -> Actor {
    let mut actor: Actor = Actor::new(
        OrganizationId::new(),
        ActorNumber::new(&gln(n)).unwrap(),
        format!("Actor {n}"),
    );
    actor.activate().unwrap();
    actor
}

#[test]
fn test_enqueue_drains_aggregate_events() {
    let mut persistence: Persistence = create_test_persistence();
    let mut actor: Actor = activated_actor(1);
    assert!(!actor.domain_events().is_empty());

    persistence.enqueue(&mut actor).unwrap();

    assert!(actor.domain_events().is_empty());
}

#[test]
fn test_unpublished_events_decode_in_insertion_order() {
    let mut persistence: Persistence = create_test_persistence();
    let mut first: Actor = activated_actor(1);
    let mut second: Actor = activated_actor(2);
    persistence.enqueue(&mut first).unwrap();
    persistence.enqueue(&mut second).unwrap();

    let stored: Vec<StoredDomainEvent> = persistence.get_unpublished_domain_events(10).unwrap();

    assert_eq!(stored.len(), 2);
    assert!(stored[0].event_id < stored[1].event_id);
    assert_eq!(stored[0].aggregate_id, first.aggregate_id());
    assert_eq!(
        stored[0].event,
        DomainEvent::ActorActivated {
            actor_id: first.id(),
            actor_number: first.actor_number().clone(),
        }
    );
    assert_eq!(stored[1].aggregate_id, second.aggregate_id());
}

#[test]
fn test_unpublished_events_respect_limit() {
    let mut persistence: Persistence = create_test_persistence();
    for n in 1..=3 {
        persistence.enqueue(&mut activated_actor(n)).unwrap();
    }

    let stored: Vec<StoredDomainEvent> = persistence.get_unpublished_domain_events(2).unwrap();

    assert_eq!(stored.len(), 2);
}

#[test]
fn test_published_events_are_no_longer_returned() {
    let mut persistence: Persistence = create_test_persistence();
    let mut first: Actor = activated_actor(1);
    let mut second: Actor = activated_actor(2);
    persistence.enqueue(&mut first).unwrap();
    persistence.enqueue(&mut second).unwrap();
    let stored: Vec<StoredDomainEvent> = persistence.get_unpublished_domain_events(10).unwrap();

    let updated: usize = persistence
        .mark_domain_events_published(&[stored[0].event_id], datetime!(2026-05-01 08:00 UTC))
        .unwrap();
    let remaining: Vec<StoredDomainEvent> =
        persistence.get_unpublished_domain_events(10).unwrap();

    assert_eq!(updated, 1);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].event_id, stored[1].event_id);
}

#[test]
fn test_events_are_listed_per_aggregate_including_published() {
    let mut persistence: Persistence = create_test_persistence();
    let mut actor: Actor = activated_actor(1);
    persistence.enqueue(&mut actor).unwrap();
    persistence.enqueue(&mut activated_actor(2)).unwrap();
    let stored: Vec<StoredDomainEvent> = persistence.get_unpublished_domain_events(10).unwrap();
    persistence
        .mark_domain_events_published(&[stored[0].event_id], datetime!(2026-05-01 08:00 UTC))
        .unwrap();

    let for_actor: Vec<StoredDomainEvent> = persistence
        .get_domain_events_for_aggregate(&actor.aggregate_id())
        .unwrap();

    assert_eq!(for_actor.len(), 1);
    assert_eq!(for_actor[0].event.name(), "actor_activated");
}
