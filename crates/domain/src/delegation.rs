// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Message and process delegation aggregates.
//!
//! A delegation belongs to the delegating actor and covers one message type
//! or one business process. It holds an ordered list of periods, each handing
//! responsibility for a single grid area to another actor from a start
//! instant until an optional stop instant. Periods are never removed; they
//! are closed by setting their stop instant.

use crate::error::DomainError;
use crate::events::{DomainEvent, HasDomainEvents};
use crate::ids::{ActorId, DelegationId, DelegationPeriodId, GridAreaId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Distinguishes message delegations from process delegations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelegationScope {
    #[serde(rename = "message_delegation")]
    Message,
    #[serde(rename = "process_delegation")]
    Process,
}

impl DelegationScope {
    /// Returns the string used for persistence and as error code prefix.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message_delegation",
            Self::Process => "process_delegation",
        }
    }
}

impl fmt::Display for DelegationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DelegationScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message_delegation" => Ok(Self::Message),
            "process_delegation" => Ok(Self::Process),
            _ => Err(DomainError::UnknownValue {
                kind: "delegation scope",
                value: s.to_string(),
            }),
        }
    }
}

/// The discriminator a delegation is keyed on.
pub trait DelegationKind:
    Copy + Eq + std::hash::Hash + fmt::Debug + fmt::Display + FromStr<Err = DomainError> + Send + Sync
{
    /// Scope shared by every delegation of this kind.
    const SCOPE: DelegationScope;

    /// Returns the string representation used for persistence.
    fn as_str(&self) -> &'static str;

    /// Returns the process when delegations of this kind are exclusive
    /// between one delegator and one recipient.
    fn as_exclusive_process(&self) -> Option<DelegatedProcess> {
        None
    }
}

macro_rules! delegation_kind_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the string representation used for persistence.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str() == s)
                    .ok_or_else(|| DomainError::UnknownValue {
                        kind: $label,
                        value: s.to_string(),
                    })
            }
        }
    };
}

delegation_kind_enum! {
    /// Message types whose handling can be delegated.
    DelegationMessageType, "delegation message type" {
        Rsm012Inbound => "rsm012_inbound",
        Rsm012Outbound => "rsm012_outbound",
        Rsm014Inbound => "rsm014_inbound",
        Rsm014Outbound => "rsm014_outbound",
        Rsm016Inbound => "rsm016_inbound",
        Rsm016Outbound => "rsm016_outbound",
        Rsm017Inbound => "rsm017_inbound",
        Rsm017Outbound => "rsm017_outbound",
        Rsm018Inbound => "rsm018_inbound",
        Rsm019Inbound => "rsm019_inbound",
    }
}

delegation_kind_enum! {
    /// Business processes whose handling can be delegated.
    DelegatedProcess, "delegated process" {
        RequestEnergyResults => "request_energy_results",
        ReceiveEnergyResults => "receive_energy_results",
        RequestWholesaleResults => "request_wholesale_results",
        ReceiveWholesaleResults => "receive_wholesale_results",
        RequestMeteringPointData => "request_metering_point_data",
        ReceiveMeteringPointData => "receive_metering_point_data",
    }
}

impl DelegationKind for DelegationMessageType {
    const SCOPE: DelegationScope = DelegationScope::Message;

    fn as_str(&self) -> &'static str {
        Self::as_str(self)
    }
}

impl DelegationKind for DelegatedProcess {
    const SCOPE: DelegationScope = DelegationScope::Process;

    fn as_str(&self) -> &'static str {
        Self::as_str(self)
    }

    fn as_exclusive_process(&self) -> Option<DelegatedProcess> {
        Some(*self)
    }
}

/// A single hand-over of responsibility for one grid area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationPeriod {
    id: DelegationPeriodId,
    delegated_to: ActorId,
    grid_area_id: GridAreaId,
    #[serde(with = "time::serde::rfc3339")]
    starts_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    stops_at: Option<OffsetDateTime>,
}

impl DelegationPeriod {
    fn new(delegated_to: ActorId, grid_area_id: GridAreaId, starts_at: OffsetDateTime) -> Self {
        Self {
            id: DelegationPeriodId::new(),
            delegated_to,
            grid_area_id,
            starts_at,
            stops_at: None,
        }
    }

    /// Rebuilds a period from persisted state.
    #[must_use]
    pub const fn restore(
        id: DelegationPeriodId,
        delegated_to: ActorId,
        grid_area_id: GridAreaId,
        starts_at: OffsetDateTime,
        stops_at: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            id,
            delegated_to,
            grid_area_id,
            starts_at,
            stops_at,
        }
    }

    #[must_use]
    pub const fn id(&self) -> DelegationPeriodId {
        self.id
    }

    #[must_use]
    pub const fn delegated_to(&self) -> ActorId {
        self.delegated_to
    }

    #[must_use]
    pub const fn grid_area_id(&self) -> GridAreaId {
        self.grid_area_id
    }

    #[must_use]
    pub const fn starts_at(&self) -> OffsetDateTime {
        self.starts_at
    }

    #[must_use]
    pub const fn stops_at(&self) -> Option<OffsetDateTime> {
        self.stops_at
    }

    /// Returns true when the period is in effect at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: OffsetDateTime) -> bool {
        self.starts_at <= now && self.stops_at.is_none_or(|stops_at| now < stops_at)
    }

    /// Returns true when a period starting at `from` with no end would
    /// share at least one instant with this period.
    ///
    /// A cancelled period (stopped at its own start) covers no instant and
    /// never overlaps.
    #[must_use]
    pub fn overlaps_open_ended_from(&self, from: OffsetDateTime) -> bool {
        self.stops_at
            .is_none_or(|stops_at| self.starts_at < stops_at && from < stops_at)
    }
}

/// A delegation of one message type or process, owned by the delegating actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation<K: DelegationKind> {
    id: DelegationId,
    delegated_by: ActorId,
    kind: K,
    periods: Vec<DelegationPeriod>,
    domain_events: Vec<DomainEvent>,
}

/// Delegation of a message type.
pub type MessageDelegation = Delegation<DelegationMessageType>;

/// Delegation of a business process.
pub type ProcessDelegation = Delegation<DelegatedProcess>;

impl<K: DelegationKind> Delegation<K> {
    /// Creates an empty delegation for `kind` owned by `delegated_by`.
    #[must_use]
    pub fn new(delegated_by: ActorId, kind: K) -> Self {
        Self {
            id: DelegationId::new(),
            delegated_by,
            kind,
            periods: Vec::new(),
            domain_events: Vec::new(),
        }
    }

    /// Rebuilds a delegation from persisted state.
    #[must_use]
    pub const fn restore(
        id: DelegationId,
        delegated_by: ActorId,
        kind: K,
        periods: Vec<DelegationPeriod>,
    ) -> Self {
        Self {
            id,
            delegated_by,
            kind,
            periods,
            domain_events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> DelegationId {
        self.id
    }

    #[must_use]
    pub const fn delegated_by(&self) -> ActorId {
        self.delegated_by
    }

    #[must_use]
    pub const fn kind(&self) -> K {
        self.kind
    }

    #[must_use]
    pub const fn scope(&self) -> DelegationScope {
        K::SCOPE
    }

    #[must_use]
    pub fn periods(&self) -> &[DelegationPeriod] {
        &self.periods
    }

    #[must_use]
    pub fn period(&self, period_id: DelegationPeriodId) -> Option<&DelegationPeriod> {
        self.periods.iter().find(|period| period.id == period_id)
    }

    /// Returns true if any period delegates to `actor_id`.
    #[must_use]
    pub fn delegates_to(&self, actor_id: ActorId) -> bool {
        self.periods.iter().any(|period| period.delegated_to == actor_id)
    }

    /// Recipients of periods that would overlap a new period starting at `from`.
    pub fn recipients_overlapping(&self, from: OffsetDateTime) -> impl Iterator<Item = ActorId> + '_ {
        self.periods
            .iter()
            .filter(move |period| period.overlaps_open_ended_from(from))
            .map(DelegationPeriod::delegated_to)
    }

    /// Returns the first period for `grid_area_id` that would overlap a new
    /// period starting at `from`.
    #[must_use]
    pub fn overlapping_period(
        &self,
        grid_area_id: GridAreaId,
        from: OffsetDateTime,
    ) -> Option<&DelegationPeriod> {
        self.periods
            .iter()
            .find(|period| period.grid_area_id == grid_area_id && period.overlaps_open_ended_from(from))
    }

    /// Appends a period delegating `grid_area_id` to `delegated_to` from `starts_at`.
    ///
    /// Overlap with existing periods is not checked here; the caller loads
    /// the delegation first and rejects overlapping requests.
    pub fn delegate_to(
        &mut self,
        delegated_to: ActorId,
        grid_area_id: GridAreaId,
        starts_at: OffsetDateTime,
    ) -> DelegationPeriodId {
        let period = DelegationPeriod::new(delegated_to, grid_area_id, starts_at);
        let period_id = period.id;
        self.raise_configured(&period);
        self.periods.push(period);
        period_id
    }

    /// Stops a period.
    ///
    /// `None` stops the period at its own start, cancelling it. A stopped
    /// period keeps its stop instant; repeating the same stop is accepted
    /// and changes nothing.
    ///
    /// # Errors
    ///
    /// * `DelegationPeriodNotFound` if the period is not part of this delegation.
    /// * `DelegationStopsBeforeStart` if `stops_at` lies before the period's start.
    /// * `DelegationPeriodAlreadyStopped` if the period already stops at another instant.
    pub fn stop_delegation(
        &mut self,
        period_id: DelegationPeriodId,
        stops_at: Option<OffsetDateTime>,
    ) -> Result<(), DomainError> {
        let scope = K::SCOPE;
        let Some(index) = self.periods.iter().position(|period| period.id == period_id) else {
            return Err(DomainError::DelegationPeriodNotFound { scope, period_id });
        };

        let period = &mut self.periods[index];
        let stops_at = stops_at.unwrap_or(period.starts_at);
        if stops_at < period.starts_at {
            return Err(DomainError::DelegationStopsBeforeStart { scope, period_id });
        }

        match period.stops_at {
            Some(existing) if existing == stops_at => return Ok(()),
            Some(_) => {
                return Err(DomainError::DelegationPeriodAlreadyStopped { scope, period_id });
            }
            None => {}
        }
        period.stops_at = Some(stops_at);

        let period = self.periods[index].clone();
        self.raise_configured(&period);
        Ok(())
    }

    fn raise_configured(&mut self, period: &DelegationPeriod) {
        self.domain_events.push(DomainEvent::DelegationConfigured {
            scope: K::SCOPE,
            delegation_id: self.id,
            period_id: period.id,
            delegated_by: self.delegated_by,
            delegated_to: period.delegated_to,
            kind: self.kind.as_str().to_string(),
            grid_area_id: period.grid_area_id,
            starts_at: period.starts_at,
            stops_at: period.stops_at,
        });
    }
}

impl<K: DelegationKind> HasDomainEvents for Delegation<K> {
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
