// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validation rules that need to read from the store.
//!
//! Handlers run them in a fixed order inside an open unit of work:
//! status change, reservation, function uniqueness, delegation combinations.

mod consolidation;
mod delegation_combinations;
mod overlapping_functions;
mod reservation;

pub use consolidation::check_existing_consolidation;
pub use delegation_combinations::{validate_delegation_allowed, validate_market_role_allowed};
pub use overlapping_functions::validate_overlapping_eic_functions;
pub use reservation::validate_unique_market_role_grid_areas;
