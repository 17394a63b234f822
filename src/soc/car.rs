// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Clock and reset controller.

use crate::mmio::Mmio;

const CAR_BASE: usize = 0x6000_6000;

pub const LVL2_CLK_GATE_OVRD: usize = CAR_BASE + 0x3a4;

/// The override bit cleared on repeat lockdowns of older key generations.
const LEGACY_CLK_GATE_OVRD: u32 = 1 << 19;

/// Clears the clock gate override needed only while the older key generations' firmware ran.
pub fn clear_legacy_clock_gate_override(mmio: &mut impl Mmio) {
    mmio.modify32(LVL2_CLK_GATE_OVRD, |value| value & !LEGACY_CLK_GATE_OVRD);
}
