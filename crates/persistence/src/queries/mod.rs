// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `actors`: Actor aggregates with their market roles and credentials
//! - `reservations`: The grid area reservation ledger
//! - `delegations`: Message and process delegations with their periods
//! - `consolidations`: Scheduled actor consolidations
//! - `events`: The domain event outbox

pub mod actors;
pub mod consolidations;
pub mod delegations;
pub mod events;
pub mod reservations;
