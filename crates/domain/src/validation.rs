// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure validation rules that span several actors.
//!
//! Callers load the actors and delegations involved and pass them in; none
//! of these functions touch storage.

use crate::actor::Actor;
use crate::actor_status::ActorStatus;
use crate::delegation::DelegationScope;
use crate::eic_function::EicFunction;
use crate::error::DomainError;
use crate::ids::OrganizationId;
use std::collections::{HashMap, HashSet};

/// Market role pairs that must never meet through a delegation.
///
/// The table is symmetric: see [`is_forbidden_combination`].
pub const FORBIDDEN_DELEGATION_COMBINATIONS: &[(EicFunction, EicFunction)] =
    &[(EicFunction::EnergySupplier, EicFunction::GridAccessProvider)];

/// Returns true if `a` and `b` form a forbidden pair in either order.
#[must_use]
pub fn is_forbidden_combination(a: EicFunction, b: EicFunction) -> bool {
    FORBIDDEN_DELEGATION_COMBINATIONS
        .iter()
        .any(|&(left, right)| (left == a && right == b) || (left == b && right == a))
}

/// Validates that market roles are unique per actor number within an organization.
///
/// # Arguments
///
/// * `candidate` - The actor being created or updated
/// * `organization_actors` - Every actor in the candidate's organization; an
///   entry with the candidate's id is ignored in favour of `candidate`
///
/// # Errors
///
/// Returns `DomainError::MarketRoleReserved` naming the first function that
/// is used twice under the same actor number.
pub fn validate_unique_functions_per_actor_number(
    candidate: &Actor,
    organization_actors: &[Actor],
) -> Result<(), DomainError> {
    let mut used: HashMap<&str, HashSet<EicFunction>> = HashMap::new();

    let actors = organization_actors
        .iter()
        .filter(|actor| actor.id() != candidate.id())
        .chain(std::iter::once(candidate));

    for actor in actors {
        let seen = used.entry(actor.actor_number().value()).or_default();
        for function in actor.functions() {
            if !seen.insert(function) {
                return Err(DomainError::MarketRoleReserved {
                    actor_number: actor.actor_number().to_string(),
                    function,
                });
            }
        }
    }

    Ok(())
}

/// Validates that a new actor does not introduce the first DataHub administrator.
///
/// Only applies while the candidate is `New`. Another actor in the
/// organization must already hold the function.
///
/// # Errors
///
/// Returns `DomainError::DataHubAdministratorNotAllowed` if no other actor
/// in the organization is a DataHub administrator.
pub fn validate_datahub_administrator(
    candidate: &Actor,
    organization_actors: &[Actor],
) -> Result<(), DomainError> {
    if candidate.status() != ActorStatus::New
        || !candidate.has_function(EicFunction::DataHubAdministrator)
    {
        return Ok(());
    }

    let has_existing = organization_actors.iter().any(|actor| {
        actor.id() != candidate.id() && actor.has_function(EicFunction::DataHubAdministrator)
    });

    if has_existing {
        Ok(())
    } else {
        Err(DomainError::DataHubAdministratorNotAllowed {
            organization_id: candidate.organization_id(),
        })
    }
}

/// Validates a new or extended delegation against the forbidden pair table.
///
/// # Arguments
///
/// * `scope` - Message or process delegation, used in the error code
/// * `delegator_functions` - Market roles of the delegating actor
/// * `recipient_organization_functions` - Every market role present in the
///   organizations of the delegated-to actors
///
/// # Errors
///
/// Returns `DomainError::DelegationMarketRoleForbidden` on the first forbidden pair.
pub fn validate_delegation_combination(
    scope: DelegationScope,
    delegator_functions: &[EicFunction],
    recipient_organization_functions: &[EicFunction],
) -> Result<(), DomainError> {
    for &delegator_function in delegator_functions {
        for &recipient_function in recipient_organization_functions {
            if is_forbidden_combination(delegator_function, recipient_function) {
                return Err(DomainError::DelegationMarketRoleForbidden {
                    scope,
                    delegator_function,
                    recipient_function,
                });
            }
        }
    }
    Ok(())
}

/// Validates adding a market role to an organization that receives delegations.
///
/// The organization's existing functions plus `new_function` are checked
/// against the market roles of every actor delegating into the organization.
///
/// # Arguments
///
/// * `organization_id` - The organization receiving the role
/// * `new_function` - The market role being added
/// * `organization_functions` - Functions already present in the organization
/// * `delegator_functions` - Functions of every actor that delegates to a
///   `Delegated` actor in the organization
///
/// # Errors
///
/// Returns `DomainError::MarketRoleForbiddenByDelegation` if any resulting
/// function forms a forbidden pair with a delegator's function.
pub fn validate_market_role_against_delegations(
    organization_id: OrganizationId,
    new_function: EicFunction,
    organization_functions: &[EicFunction],
    delegator_functions: &[EicFunction],
) -> Result<(), DomainError> {
    let mut functions: Vec<EicFunction> = organization_functions.to_vec();
    if !functions.contains(&new_function) {
        functions.push(new_function);
    }

    for function in functions {
        if let Some(&delegator_function) = delegator_functions
            .iter()
            .find(|&&delegator_function| is_forbidden_combination(delegator_function, function))
        {
            return Err(DomainError::MarketRoleForbiddenByDelegation {
                organization_id,
                function,
                delegator_function,
            });
        }
    }

    Ok(())
}
