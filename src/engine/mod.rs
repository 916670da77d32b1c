// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Gamification computation engine: pure functions over the transaction and
//! claim history. Nothing in here touches the database; callers persist the
//! returned values.

pub mod rewards;
pub mod rotation;
pub mod scoring;
pub mod streak;
pub mod xp;
