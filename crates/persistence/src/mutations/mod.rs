// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes. Each state change and its audit event commit in one
//! `IMMEDIATE` transaction, so the write lock is taken before the first read.

pub mod audit;
pub mod entitlements;
pub mod requests;
