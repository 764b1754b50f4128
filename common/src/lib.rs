// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common Modul for the proximity trigger
//!
//! Provides the common data types that are used across every modul.

pub mod config;
pub mod fixed;
pub mod location_error;
pub mod position;
pub mod proximity;
pub mod serde;
pub mod target;
pub mod test_helper;

#[cfg(test)]
mod tests;
