// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ActorConsolidation, ActorId, ConsolidationStatus, DomainError, DomainEvent, HasDomainEvents,
};
use time::OffsetDateTime;
use time::macros::datetime;

const SCHEDULED_AT: OffsetDateTime = datetime!(2026-09-01 00:00 UTC);

#[test]
fn test_schedule_emits_scheduled_event() {
    let consolidation: ActorConsolidation =
        ActorConsolidation::schedule(ActorId::new(), ActorId::new(), SCHEDULED_AT).unwrap();

    assert_eq!(consolidation.status(), ConsolidationStatus::Pending);
    assert!(matches!(
        consolidation.domain_events(),
        [DomainEvent::ActorConsolidationScheduled { .. }]
    ));
}

#[test]
fn test_schedule_into_self_is_rejected() {
    let actor: ActorId = ActorId::new();
    let result: Result<ActorConsolidation, DomainError> =
        ActorConsolidation::schedule(actor, actor, SCHEDULED_AT);
    assert_eq!(result.unwrap_err().code(), "actor.consolidation.same_actor");
}

#[test]
fn test_is_ready_only_when_due_and_pending() {
    let mut consolidation: ActorConsolidation =
        ActorConsolidation::schedule(ActorId::new(), ActorId::new(), SCHEDULED_AT).unwrap();

    assert!(!consolidation.is_ready(datetime!(2026-08-31 23:59 UTC)));
    assert!(consolidation.is_ready(SCHEDULED_AT));

    consolidation.mark_failed().unwrap();
    assert!(!consolidation.is_ready(SCHEDULED_AT));
}

#[test]
fn test_status_only_leaves_pending_once() {
    let mut consolidation: ActorConsolidation =
        ActorConsolidation::schedule(ActorId::new(), ActorId::new(), SCHEDULED_AT).unwrap();
    consolidation.take_domain_events();

    consolidation.mark_consolidated().unwrap();
    assert!(matches!(
        consolidation.domain_events(),
        [DomainEvent::ActorConsolidated { .. }]
    ));

    let result: Result<(), DomainError> = consolidation.mark_failed();
    assert!(matches!(
        result,
        Err(DomainError::ConsolidationNotPending {
            status: ConsolidationStatus::Consolidated,
            ..
        })
    ));
}

#[test]
fn test_notification_names_recipient() {
    let recipient: ActorId = ActorId::new();
    let mut consolidation: ActorConsolidation =
        ActorConsolidation::schedule(ActorId::new(), ActorId::new(), SCHEDULED_AT).unwrap();
    consolidation.take_domain_events();

    consolidation.request_notification(recipient);

    assert!(matches!(
        consolidation.domain_events(),
        [DomainEvent::ConsolidationNotificationRequested { recipient: r, .. }] if *r == recipient
    ));
}

#[test]
fn test_consolidation_status_strings() {
    for status in [
        ConsolidationStatus::Pending,
        ConsolidationStatus::Consolidated,
        ConsolidationStatus::Failed,
    ] {
        assert_eq!(status.as_str().parse::<ConsolidationStatus>(), Ok(status));
    }
}
