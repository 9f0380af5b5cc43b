// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod session;
pub mod clients;
pub mod income;
pub mod expenses;
pub mod summary;
pub mod transactions;
pub mod exporter;
pub mod doctor;
