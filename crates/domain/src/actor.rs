// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The actor aggregate.

use crate::actor_status::{ActorStatus, ActorStatusTransitioner};
use crate::credentials::ActorCredentials;
use crate::eic_function::EicFunction;
use crate::error::DomainError;
use crate::events::{DomainEvent, HasDomainEvents};
use crate::ids::{ActorId, GridAreaId, OrganizationId};
use crate::types::{ActorNumber, MarketRole};

/// Persisted state of an actor, used to rebuild the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorParts {
    pub id: ActorId,
    pub organization_id: OrganizationId,
    pub actor_number: ActorNumber,
    pub name: String,
    pub status: ActorStatus,
    pub external_actor_id: Option<String>,
    pub credentials: Option<ActorCredentials>,
    pub market_roles: Vec<MarketRole>,
}

/// A market participant.
///
/// Market roles can only be changed while the actor is `New`. Activation
/// publishes ownership of every grid area held as grid access provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: ActorId,
    organization_id: OrganizationId,
    actor_number: ActorNumber,
    name: String,
    status: ActorStatusTransitioner,
    external_actor_id: Option<String>,
    credentials: Option<ActorCredentials>,
    market_roles: Vec<MarketRole>,
    domain_events: Vec<DomainEvent>,
}

impl Actor {
    /// Creates a new actor in the `New` status without market roles.
    #[must_use]
    pub fn new(organization_id: OrganizationId, actor_number: ActorNumber, name: String) -> Self {
        Self {
            id: ActorId::new(),
            organization_id,
            actor_number,
            name,
            status: ActorStatusTransitioner::new(),
            external_actor_id: None,
            credentials: None,
            market_roles: Vec::new(),
            domain_events: Vec::new(),
        }
    }

    /// Rebuilds an actor from persisted state. No events are raised.
    #[must_use]
    pub fn restore(parts: ActorParts) -> Self {
        Self {
            id: parts.id,
            organization_id: parts.organization_id,
            actor_number: parts.actor_number,
            name: parts.name,
            status: ActorStatusTransitioner::from_status(parts.status),
            external_actor_id: parts.external_actor_id,
            credentials: parts.credentials,
            market_roles: parts.market_roles,
            domain_events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    #[must_use]
    pub const fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    #[must_use]
    pub const fn actor_number(&self) -> &ActorNumber {
        &self.actor_number
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn status(&self) -> ActorStatus {
        self.status.status()
    }

    #[must_use]
    pub fn external_actor_id(&self) -> Option<&str> {
        self.external_actor_id.as_deref()
    }

    #[must_use]
    pub const fn credentials(&self) -> Option<&ActorCredentials> {
        self.credentials.as_ref()
    }

    #[must_use]
    pub fn market_roles(&self) -> &[MarketRole] {
        &self.market_roles
    }

    /// Iterates the functions of all market roles.
    pub fn functions(&self) -> impl Iterator<Item = EicFunction> + '_ {
        self.market_roles.iter().map(MarketRole::function)
    }

    #[must_use]
    pub fn has_function(&self, function: EicFunction) -> bool {
        self.functions().any(|f| f == function)
    }

    /// Returns every reservable (function, grid area) pair held by the actor.
    #[must_use]
    pub fn reservable_pairs(&self) -> Vec<(EicFunction, GridAreaId)> {
        self.market_roles
            .iter()
            .filter(|role| role.function().is_reservable())
            .flat_map(|role| {
                role.grid_areas()
                    .iter()
                    .map(move |grid_area| (role.function(), *grid_area))
            })
            .collect()
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn ensure_market_roles_mutable(&self) -> Result<(), DomainError> {
        if self.status() == ActorStatus::New {
            Ok(())
        } else {
            Err(DomainError::MarketRolesLocked {
                actor_id: self.id,
                status: self.status(),
            })
        }
    }

    /// Adds a market role.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not `New` or already holds the function.
    pub fn add_market_role(&mut self, role: MarketRole) -> Result<(), DomainError> {
        self.ensure_market_roles_mutable()?;

        if self.has_function(role.function()) {
            return Err(DomainError::MarketRoleReserved {
                actor_number: self.actor_number.to_string(),
                function: role.function(),
            });
        }

        self.market_roles.push(role);
        Ok(())
    }

    /// Removes the market role with the given function, returning whether one was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not `New`.
    pub fn remove_market_role(&mut self, function: EicFunction) -> Result<bool, DomainError> {
        self.ensure_market_roles_mutable()?;

        let before: usize = self.market_roles.len();
        self.market_roles.retain(|role| role.function() != function);
        Ok(before != self.market_roles.len())
    }

    /// Replaces all market roles.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not `New` or the same function is given twice.
    pub fn set_market_roles(&mut self, roles: Vec<MarketRole>) -> Result<(), DomainError> {
        self.ensure_market_roles_mutable()?;

        for (index, role) in roles.iter().enumerate() {
            if roles[..index]
                .iter()
                .any(|other| other.function() == role.function())
            {
                return Err(DomainError::MarketRoleReserved {
                    actor_number: self.actor_number.to_string(),
                    function: role.function(),
                });
            }
        }

        self.market_roles = roles;
        Ok(())
    }

    /// Activates the actor.
    ///
    /// When the status actually changes, raises `ActorActivated` and one
    /// `GridAreaOwnershipAssigned` per grid access provider grid area.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the actor cannot be activated.
    pub fn activate(&mut self) -> Result<(), DomainError> {
        if !self.status.activate()? {
            return Ok(());
        }

        self.domain_events.push(DomainEvent::ActorActivated {
            actor_id: self.id,
            actor_number: self.actor_number.clone(),
        });

        let owned: Vec<GridAreaId> = self
            .market_roles
            .iter()
            .filter(|role| role.function() == EicFunction::GridAccessProvider)
            .flat_map(|role| role.grid_areas().iter().copied())
            .collect();
        for grid_area_id in owned {
            self.raise_grid_area_ownership(grid_area_id);
        }

        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the actor cannot be deactivated.
    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        self.status.deactivate().map(|_| ())
    }

    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the actor cannot become passive.
    pub fn set_as_passive(&mut self) -> Result<(), DomainError> {
        self.status.set_as_passive().map(|_| ())
    }

    /// Deletes the actor and drops its credentials.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the actor cannot be deleted.
    pub fn delete(&mut self) -> Result<(), DomainError> {
        if self.status.delete()? {
            self.remove_credentials();
        }
        Ok(())
    }

    /// Moves the actor to `target` through the same transitions as the named operations.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is not allowed.
    pub fn set_status(&mut self, target: ActorStatus) -> Result<(), DomainError> {
        match target {
            ActorStatus::Active => self.activate(),
            ActorStatus::Inactive => self.deactivate(),
            ActorStatus::Passive => self.set_as_passive(),
            ActorStatus::Deleted => self.delete(),
            ActorStatus::New => self.status.transition_to(ActorStatus::New).map(|_| ()),
        }
    }

    /// Assigns credentials.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CredentialsAlreadyAssigned` if the actor already has credentials.
    pub fn assign_credentials(&mut self, credentials: ActorCredentials) -> Result<(), DomainError> {
        if self.credentials.is_some() {
            return Err(DomainError::CredentialsAlreadyAssigned { actor_id: self.id });
        }

        self.domain_events
            .push(DomainEvent::ActorCredentialsAssigned {
                actor_id: self.id,
                credential_kind: credentials.kind().to_string(),
            });
        self.credentials = Some(credentials);
        Ok(())
    }

    /// Removes credentials, returning whether there were any.
    pub fn remove_credentials(&mut self) -> bool {
        if self.credentials.take().is_some() {
            self.domain_events
                .push(DomainEvent::ActorCredentialsRemoved { actor_id: self.id });
            true
        } else {
            false
        }
    }

    /// Records that the actor's credentials are about to expire.
    pub fn report_expiring_credentials(&mut self, now: time::OffsetDateTime) -> bool {
        match &self.credentials {
            Some(credentials) if credentials.expires_soon(now) => {
                let expires_at = credentials.expires_at();
                self.domain_events.push(DomainEvent::ActorCredentialsExpiring {
                    actor_id: self.id,
                    expires_at,
                });
                true
            }
            _ => false,
        }
    }

    /// Takes over the grid access provider grid areas of `source` during consolidation.
    ///
    /// This is the only path that changes market roles outside the `New` status,
    /// and it may leave a grid access provider with more than one grid area.
    /// Returns the grid areas that were added.
    pub fn take_over_grid_areas(&mut self, source: &Self) -> Vec<GridAreaId> {
        let transferred: Vec<GridAreaId> = source
            .market_roles
            .iter()
            .filter(|role| role.function() == EicFunction::GridAccessProvider)
            .flat_map(|role| role.grid_areas().iter().copied())
            .collect();
        if transferred.is_empty() {
            return Vec::new();
        }

        let added: Vec<GridAreaId> = match self
            .market_roles
            .iter_mut()
            .find(|role| role.function() == EicFunction::GridAccessProvider)
        {
            Some(role) => role.absorb_grid_areas(&transferred),
            None => {
                let mut role = MarketRole::from_transfer(EicFunction::GridAccessProvider);
                let added = role.absorb_grid_areas(&transferred);
                self.market_roles.push(role);
                added
            }
        };

        if self.status() == ActorStatus::Active {
            for grid_area_id in &added {
                self.raise_grid_area_ownership(*grid_area_id);
            }
        }

        added
    }

    fn raise_grid_area_ownership(&mut self, grid_area_id: GridAreaId) {
        self.domain_events
            .push(DomainEvent::GridAreaOwnershipAssigned {
                actor_id: self.id,
                actor_number: self.actor_number.clone(),
                function: EicFunction::GridAccessProvider,
                grid_area_id,
            });
    }
}

impl HasDomainEvents for Actor {
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
