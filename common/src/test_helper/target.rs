// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{position::Position, target::Target};

pub fn get_config_as_json<'a>() -> &'a str {
    include_str!("../../../assets/config.json")
}

/// The target of the bundled configuration with a trigger radius of 50 m.
pub fn get_target() -> Target {
    Target::new(Position::new(6.8206, 80.0390), 50.0)
        .unwrap_or_else(|e| panic!("Failed to create test target. Reason: {e}"))
}
