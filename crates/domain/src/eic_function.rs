// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! EIC market role functions.
//!
//! An EIC function identifies what an actor does in the energy market.
//! Some functions are scoped to grid areas and a subset of those are
//! exclusive: only one actor may hold them for a given grid area.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Market role functions an actor can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EicFunction {
    BalanceResponsibleParty,
    BillingAgent,
    EnergySupplier,
    GridAccessProvider,
    ImbalanceSettlementResponsible,
    MeterOperator,
    MeteredDataAdministrator,
    MeteredDataResponsible,
    MeteringPointAdministrator,
    SystemOperator,
    DanishEnergyAgency,
    DataHubAdministrator,
    IndependentAggregator,
    SerialEnergyTrader,
    /// Held by actors that receive delegated messages or processes.
    Delegated,
    ItSupplier,
}

/// Every function, in declaration order.
pub const ALL_EIC_FUNCTIONS: [EicFunction; 16] = [
    EicFunction::BalanceResponsibleParty,
    EicFunction::BillingAgent,
    EicFunction::EnergySupplier,
    EicFunction::GridAccessProvider,
    EicFunction::ImbalanceSettlementResponsible,
    EicFunction::MeterOperator,
    EicFunction::MeteredDataAdministrator,
    EicFunction::MeteredDataResponsible,
    EicFunction::MeteringPointAdministrator,
    EicFunction::SystemOperator,
    EicFunction::DanishEnergyAgency,
    EicFunction::DataHubAdministrator,
    EicFunction::IndependentAggregator,
    EicFunction::SerialEnergyTrader,
    EicFunction::Delegated,
    EicFunction::ItSupplier,
];

/// Returns the functions whose grid areas are tracked in the reservation ledger.
pub fn reservable_functions() -> impl Iterator<Item = EicFunction> {
    ALL_EIC_FUNCTIONS
        .into_iter()
        .filter(EicFunction::is_reservable)
}

impl EicFunction {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BalanceResponsibleParty => "balance_responsible_party",
            Self::BillingAgent => "billing_agent",
            Self::EnergySupplier => "energy_supplier",
            Self::GridAccessProvider => "grid_access_provider",
            Self::ImbalanceSettlementResponsible => "imbalance_settlement_responsible",
            Self::MeterOperator => "meter_operator",
            Self::MeteredDataAdministrator => "metered_data_administrator",
            Self::MeteredDataResponsible => "metered_data_responsible",
            Self::MeteringPointAdministrator => "metering_point_administrator",
            Self::SystemOperator => "system_operator",
            Self::DanishEnergyAgency => "danish_energy_agency",
            Self::DataHubAdministrator => "datahub_administrator",
            Self::IndependentAggregator => "independent_aggregator",
            Self::SerialEnergyTrader => "serial_energy_trader",
            Self::Delegated => "delegated",
            Self::ItSupplier => "it_supplier",
        }
    }

    /// Returns true if a (function, grid area) pair may be held by one actor only.
    ///
    /// Reservable functions are tracked in the reservation ledger.
    #[must_use]
    pub const fn is_reservable(&self) -> bool {
        matches!(self, Self::GridAccessProvider)
    }

    /// Returns true if the function is limited to a single grid area per actor.
    #[must_use]
    pub const fn allows_single_grid_area_only(&self) -> bool {
        matches!(self, Self::GridAccessProvider)
    }
}

impl std::fmt::Display for EicFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EicFunction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_EIC_FUNCTIONS
            .iter()
            .copied()
            .find(|function| function.as_str() == s)
            .ok_or_else(|| DomainError::UnknownValue {
                kind: "eic function",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_function_parses_from_its_string() {
        for function in ALL_EIC_FUNCTIONS {
            assert_eq!(function.as_str().parse::<EicFunction>(), Ok(function));
        }
    }

    #[test]
    fn test_unknown_function_is_rejected() {
        let result = "grid_operator".parse::<EicFunction>();
        assert!(matches!(result, Err(DomainError::UnknownValue { .. })));
    }

    #[test]
    fn test_only_grid_access_provider_is_reservable() {
        let reservable: Vec<EicFunction> = ALL_EIC_FUNCTIONS
            .iter()
            .copied()
            .filter(EicFunction::is_reservable)
            .collect();
        assert_eq!(reservable, vec![EicFunction::GridAccessProvider]);
    }
}
