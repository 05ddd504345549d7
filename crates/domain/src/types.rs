// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::eic_function::EicFunction;
use crate::error::DomainError;
use crate::ids::GridAreaId;
use serde::{Deserialize, Serialize};

/// The scheme an actor number is issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorNumberKind {
    /// 13 digit Global Location Number.
    Gln,
    /// 16 character Energy Identification Code.
    Eic,
}

/// The business identifier of an actor.
///
/// Actor numbers are immutable once assigned. Several actors in the same
/// organization may share an actor number, each holding different market roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorNumber {
    value: String,
}

impl ActorNumber {
    /// Creates a validated actor number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidActorNumber` unless the value is a 13 digit
    /// GLN or a 16 character alphanumeric EIC code.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let value: &str = value.trim();
        if Self::classify(value).is_none() {
            return Err(DomainError::InvalidActorNumber {
                value: value.to_string(),
            });
        }
        Ok(Self {
            value: value.to_string(),
        })
    }

    fn classify(value: &str) -> Option<ActorNumberKind> {
        if value.len() == 13 && value.bytes().all(|b| b.is_ascii_digit()) {
            return Some(ActorNumberKind::Gln);
        }
        if value.len() == 16 && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Some(ActorNumberKind::Eic);
        }
        None
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns which numbering scheme the value belongs to.
    #[must_use]
    pub fn kind(&self) -> ActorNumberKind {
        // Construction guarantees classification succeeds.
        Self::classify(&self.value).unwrap_or(ActorNumberKind::Eic)
    }
}

impl std::fmt::Display for ActorNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for ActorNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ActorNumber> for String {
    fn from(number: ActorNumber) -> Self {
        number.value
    }
}

/// A market role held by an actor.
///
/// Market roles have no identity of their own; they live inside the actor aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRole {
    function: EicFunction,
    grid_areas: Vec<GridAreaId>,
    comment: Option<String>,
}

impl MarketRole {
    /// Creates a market role.
    ///
    /// Duplicate grid areas are collapsed, keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TooManyGridAreas` if the function permits only one
    /// grid area and more were given.
    pub fn new(
        function: EicFunction,
        grid_areas: Vec<GridAreaId>,
        comment: Option<String>,
    ) -> Result<Self, DomainError> {
        let mut unique: Vec<GridAreaId> = Vec::with_capacity(grid_areas.len());
        for grid_area in grid_areas {
            if !unique.contains(&grid_area) {
                unique.push(grid_area);
            }
        }

        if function.allows_single_grid_area_only() && unique.len() > 1 {
            return Err(DomainError::TooManyGridAreas {
                function,
                count: unique.len(),
            });
        }

        Ok(Self {
            function,
            grid_areas: unique,
            comment,
        })
    }

    #[must_use]
    pub const fn function(&self) -> EicFunction {
        self.function
    }

    #[must_use]
    pub fn grid_areas(&self) -> &[GridAreaId] {
        &self.grid_areas
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Rebuilds a role from persisted state.
    ///
    /// The grid area limit is not checked: a grid access provider may hold
    /// several grid areas after a consolidation.
    #[must_use]
    pub const fn restore(
        function: EicFunction,
        grid_areas: Vec<GridAreaId>,
        comment: Option<String>,
    ) -> Self {
        Self {
            function,
            grid_areas,
            comment,
        }
    }

    /// An empty role created to receive grid areas during consolidation.
    pub(crate) const fn from_transfer(function: EicFunction) -> Self {
        Self {
            function,
            grid_areas: Vec::new(),
            comment: None,
        }
    }

    /// Adds grid areas taken over from another actor, skipping ones already present.
    pub(crate) fn absorb_grid_areas(&mut self, grid_areas: &[GridAreaId]) -> Vec<GridAreaId> {
        let mut added: Vec<GridAreaId> = Vec::new();
        for grid_area in grid_areas {
            if !self.grid_areas.contains(grid_area) {
                self.grid_areas.push(*grid_area);
                added.push(*grid_area);
            }
        }
        added
    }
}
