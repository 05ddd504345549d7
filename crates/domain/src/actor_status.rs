// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor status and the transition rules between statuses.
//!
//! Every status change goes through [`ActorStatusTransitioner`], whether it is
//! requested by name (`activate`, `deactivate`, ...) or by target status
//! (`transition_to`). Requesting the current status is always accepted and
//! changes nothing. `Deleted` is terminal.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActorStatus {
    /// Created but not yet in use. Market roles may still change.
    #[default]
    New,
    Active,
    Inactive,
    Passive,
    /// Terminal.
    Deleted,
}

impl ActorStatus {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Passive => "passive",
            Self::Deleted => "deleted",
        }
    }

    /// Returns the statuses from which `self` may be entered.
    #[must_use]
    pub const fn allowed_predecessors(&self) -> &'static [Self] {
        match self {
            Self::New => &[],
            Self::Active => &[Self::New, Self::Inactive, Self::Passive],
            Self::Inactive => &[Self::Active, Self::Passive],
            Self::Passive => &[Self::Active, Self::Inactive],
            Self::Deleted => &[Self::New, Self::Active, Self::Inactive, Self::Passive],
        }
    }
}

impl std::fmt::Display for ActorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "passive" => Ok(Self::Passive),
            "deleted" => Ok(Self::Deleted),
            _ => Err(DomainError::UnknownValue {
                kind: "actor status",
                value: s.to_string(),
            }),
        }
    }
}

/// Finite-state machine owning an actor's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActorStatusTransitioner {
    status: ActorStatus,
}

impl ActorStatusTransitioner {
    /// Starts a transitioner in the `New` status.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: ActorStatus::New,
        }
    }

    /// Restores a transitioner from a persisted status.
    #[must_use]
    pub const fn from_status(status: ActorStatus) -> Self {
        Self { status }
    }

    #[must_use]
    pub const fn status(&self) -> ActorStatus {
        self.status
    }

    /// Moves to `Active`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` unless the current status
    /// is `New`, `Inactive`, `Passive` or already `Active`.
    pub fn activate(&mut self) -> Result<bool, DomainError> {
        self.transition_to(ActorStatus::Active)
    }

    /// Moves to `Inactive`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` unless the current status
    /// is `Active`, `Passive` or already `Inactive`.
    pub fn deactivate(&mut self) -> Result<bool, DomainError> {
        self.transition_to(ActorStatus::Inactive)
    }

    /// Moves to `Passive`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` unless the current status
    /// is `Active`, `Inactive` or already `Passive`.
    pub fn set_as_passive(&mut self) -> Result<bool, DomainError> {
        self.transition_to(ActorStatus::Passive)
    }

    /// Moves to `Deleted`. There is no way back.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the current status is
    /// not an allowed predecessor of `Deleted`.
    pub fn delete(&mut self) -> Result<bool, DomainError> {
        self.transition_to(ActorStatus::Deleted)
    }

    /// Moves to `target`, returning whether the status actually changed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` when `target` differs from
    /// the current status and the current status is not an allowed predecessor.
    pub fn transition_to(&mut self, target: ActorStatus) -> Result<bool, DomainError> {
        if self.status == target {
            return Ok(false);
        }

        if !target.allowed_predecessors().contains(&self.status) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }

        self.status = target;
        Ok(true)
    }
}
