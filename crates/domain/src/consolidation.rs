// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduled merge of one actor into another.

use crate::error::DomainError;
use crate::events::{DomainEvent, HasDomainEvents};
use crate::ids::{ActorConsolidationId, ActorId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Progress of a consolidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConsolidationStatus {
    #[default]
    Pending,
    Consolidated,
    Failed,
}

impl ConsolidationStatus {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Consolidated => "consolidated",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ConsolidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsolidationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "consolidated" => Ok(Self::Consolidated),
            "failed" => Ok(Self::Failed),
            _ => Err(DomainError::UnknownValue {
                kind: "consolidation status",
                value: s.to_string(),
            }),
        }
    }
}

/// A merge of `actor_from` into `actor_to` at `scheduled_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorConsolidation {
    id: ActorConsolidationId,
    actor_from: ActorId,
    actor_to: ActorId,
    scheduled_at: OffsetDateTime,
    status: ConsolidationStatus,
    domain_events: Vec<DomainEvent>,
}

impl ActorConsolidation {
    /// Schedules a new consolidation.
    ///
    /// Whether either actor already takes part in another consolidation is
    /// checked by the caller against the stored consolidations.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConsolidationSameActor` if both actors are the same.
    pub fn schedule(
        actor_from: ActorId,
        actor_to: ActorId,
        scheduled_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        if actor_from == actor_to {
            return Err(DomainError::ConsolidationSameActor {
                actor_id: actor_from,
            });
        }

        let id = ActorConsolidationId::new();
        Ok(Self {
            id,
            actor_from,
            actor_to,
            scheduled_at,
            status: ConsolidationStatus::Pending,
            domain_events: vec![DomainEvent::ActorConsolidationScheduled {
                consolidation_id: id,
                actor_from,
                actor_to,
                scheduled_at,
            }],
        })
    }

    /// Rebuilds a consolidation from persisted state.
    #[must_use]
    pub const fn restore(
        id: ActorConsolidationId,
        actor_from: ActorId,
        actor_to: ActorId,
        scheduled_at: OffsetDateTime,
        status: ConsolidationStatus,
    ) -> Self {
        Self {
            id,
            actor_from,
            actor_to,
            scheduled_at,
            status,
            domain_events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> ActorConsolidationId {
        self.id
    }

    #[must_use]
    pub const fn actor_from(&self) -> ActorId {
        self.actor_from
    }

    #[must_use]
    pub const fn actor_to(&self) -> ActorId {
        self.actor_to
    }

    #[must_use]
    pub const fn scheduled_at(&self) -> OffsetDateTime {
        self.scheduled_at
    }

    #[must_use]
    pub const fn status(&self) -> ConsolidationStatus {
        self.status
    }

    /// Returns true when the consolidation is pending and due at `now`.
    #[must_use]
    pub fn is_ready(&self, now: OffsetDateTime) -> bool {
        matches!(self.status, ConsolidationStatus::Pending) && self.scheduled_at <= now
    }

    /// Records that `recipient` must be told about this consolidation.
    pub fn request_notification(&mut self, recipient: ActorId) {
        self.domain_events
            .push(DomainEvent::ConsolidationNotificationRequested {
                recipient,
                consolidation_id: self.id,
                actor_from: self.actor_from,
                actor_to: self.actor_to,
                scheduled_at: self.scheduled_at,
            });
    }

    fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.status == ConsolidationStatus::Pending {
            Ok(())
        } else {
            Err(DomainError::ConsolidationNotPending {
                consolidation_id: self.id,
                status: self.status,
            })
        }
    }

    /// # Errors
    ///
    /// Returns `DomainError::ConsolidationNotPending` unless the consolidation is pending.
    pub fn mark_consolidated(&mut self) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = ConsolidationStatus::Consolidated;
        self.domain_events.push(DomainEvent::ActorConsolidated {
            consolidation_id: self.id,
            actor_from: self.actor_from,
            actor_to: self.actor_to,
        });
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DomainError::ConsolidationNotPending` unless the consolidation is pending.
    pub fn mark_failed(&mut self) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = ConsolidationStatus::Failed;
        Ok(())
    }
}

impl HasDomainEvents for ActorConsolidation {
    fn aggregate_id(&self) -> String {
        self.id.to_string()
    }

    fn domain_events(&self) -> &[DomainEvent] {
        &self.domain_events
    }

    fn take_domain_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.domain_events)
    }
}
