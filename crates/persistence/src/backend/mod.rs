// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! Only `SQLite` is supported. Everything that cannot be expressed in Diesel
//! DSL lives here:
//!
//! - Connection initialization
//! - Migration execution
//! - PRAGMA configuration
//! - Transaction control with `BEGIN IMMEDIATE`
//!
//! Domain queries and mutations live in `queries/` and `mutations/`.

pub mod sqlite;
