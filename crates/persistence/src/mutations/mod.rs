// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules for persistence layer.
//!
//! Mutations never open transactions of their own. They run inside the unit
//! of work opened by the caller.

pub mod actors;
pub mod consolidations;
pub mod delegations;
pub mod events;
pub mod reservations;
