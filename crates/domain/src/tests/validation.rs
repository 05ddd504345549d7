// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Actor, ActorNumber, DelegationScope, DomainError, EicFunction, GridAreaId, MarketRole,
    OrganizationId, is_forbidden_combination, validate_datahub_administrator,
    validate_delegation_combination, validate_market_role_against_delegations,
    validate_unique_functions_per_actor_number,
};

fn create_test_actor(
    organization_id: OrganizationId,
    actor_number: &str,
    functions: &[EicFunction],
) -> Actor {
    let mut actor: Actor = Actor::new(
        organization_id,
        ActorNumber::new(actor_number).unwrap(),
        String::from("Test Actor"),
    );
    for function in functions {
        actor
            .add_market_role(MarketRole::new(*function, vec![GridAreaId::new()], None).unwrap())
            .unwrap();
    }
    actor
}

#[test]
fn test_forbidden_table_is_symmetric() {
    assert!(is_forbidden_combination(
        EicFunction::EnergySupplier,
        EicFunction::GridAccessProvider
    ));
    assert!(is_forbidden_combination(
        EicFunction::GridAccessProvider,
        EicFunction::EnergySupplier
    ));
    assert!(!is_forbidden_combination(
        EicFunction::EnergySupplier,
        EicFunction::BalanceResponsibleParty
    ));
}

#[test]
fn test_same_function_under_same_actor_number_is_rejected() {
    let organization_id: OrganizationId = OrganizationId::new();
    let existing: Actor =
        create_test_actor(organization_id, "5790000555550", &[EicFunction::EnergySupplier]);
    let candidate: Actor =
        create_test_actor(organization_id, "5790000555550", &[EicFunction::EnergySupplier]);

    let result: Result<(), DomainError> =
        validate_unique_functions_per_actor_number(&candidate, &[existing]);
    assert!(matches!(
        result,
        Err(DomainError::MarketRoleReserved {
            function: EicFunction::EnergySupplier,
            ..
        })
    ));
}

#[test]
fn test_same_function_under_other_actor_number_is_allowed() {
    let organization_id: OrganizationId = OrganizationId::new();
    let existing: Actor =
        create_test_actor(organization_id, "5790000555550", &[EicFunction::EnergySupplier]);
    let candidate: Actor =
        create_test_actor(organization_id, "5790000555551", &[EicFunction::EnergySupplier]);

    let result: Result<(), DomainError> =
        validate_unique_functions_per_actor_number(&candidate, &[existing, candidate.clone()]);
    assert!(result.is_ok());
}

#[test]
fn test_first_datahub_administrator_is_rejected() {
    let organization_id: OrganizationId = OrganizationId::new();
    let candidate: Actor = create_test_actor(
        organization_id,
        "5790000555550",
        &[EicFunction::DataHubAdministrator],
    );

    let result: Result<(), DomainError> =
        validate_datahub_administrator(&candidate, &[candidate.clone()]);
    assert_eq!(
        result.unwrap_err().code(),
        "actor.market_role.datahub_administrator_forbidden"
    );

    let existing: Actor = create_test_actor(
        organization_id,
        "5790000555551",
        &[EicFunction::DataHubAdministrator],
    );
    let result: Result<(), DomainError> =
        validate_datahub_administrator(&candidate, &[existing]);
    assert!(result.is_ok());
}

#[test]
fn test_delegation_combination_rejects_both_directions() {
    let result: Result<(), DomainError> = validate_delegation_combination(
        DelegationScope::Message,
        &[EicFunction::EnergySupplier],
        &[EicFunction::BalanceResponsibleParty, EicFunction::GridAccessProvider],
    );
    assert_eq!(
        result.unwrap_err().code(),
        "message_delegation.market_role_forbidden"
    );

    let result: Result<(), DomainError> = validate_delegation_combination(
        DelegationScope::Process,
        &[EicFunction::GridAccessProvider],
        &[EicFunction::EnergySupplier],
    );
    assert_eq!(
        result.unwrap_err().code(),
        "process_delegation.market_role_forbidden"
    );

    let result: Result<(), DomainError> = validate_delegation_combination(
        DelegationScope::Message,
        &[EicFunction::EnergySupplier],
        &[EicFunction::Delegated, EicFunction::BalanceResponsibleParty],
    );
    assert!(result.is_ok());
}

#[test]
fn test_new_market_role_conflicting_with_delegator_is_rejected() {
    let organization_id: OrganizationId = OrganizationId::new();

    let result: Result<(), DomainError> = validate_market_role_against_delegations(
        organization_id,
        EicFunction::GridAccessProvider,
        &[EicFunction::Delegated],
        &[EicFunction::EnergySupplier],
    );
    assert!(matches!(
        result,
        Err(DomainError::MarketRoleForbiddenByDelegation {
            function: EicFunction::GridAccessProvider,
            delegator_function: EicFunction::EnergySupplier,
            ..
        })
    ));

    let result: Result<(), DomainError> = validate_market_role_against_delegations(
        organization_id,
        EicFunction::MeterOperator,
        &[EicFunction::Delegated],
        &[EicFunction::EnergySupplier],
    );
    assert!(result.is_ok());
}
