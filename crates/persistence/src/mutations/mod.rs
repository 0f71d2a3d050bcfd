// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `audit` - Audit event persistence
//! - `identity` - Account, profile and session mutations
//! - `menu` - Menu commands
//! - `pool` - Pool commands (bookings, settings, sequences)

pub mod audit;
pub mod identity;
pub mod menu;
pub mod pool;

pub use menu::MenuCommandOutcome;
pub use pool::PoolCommandOutcome;
