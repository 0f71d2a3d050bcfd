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
//! - `audit` - Audit event queries
//! - `identity` - Account, profile and session queries
//! - `menu` - Menu catalog queries
//! - `pool` - Token settings, bookings and pool state

pub mod audit;
pub mod identity;
pub mod menu;
pub mod pool;
