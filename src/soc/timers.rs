// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Timers block.

use crate::mmio::Mmio;

const TIMERS_BASE: usize = 0x6000_5000;

/// Undocumented register in the timers block.
pub const UNKNOWN_CONTROL: usize = TIMERS_BASE + 0x1a4;

const UNKNOWN_CONTROL_VALUE: u32 = 0xf1e0;

/// Writes the fixed value every boot stage of this firmware family writes to the timers block.
///
/// What the register controls is not known. The value is reproduced for compatibility with the
/// hardware and later firmware, and nothing else here relies on it.
pub fn write_unknown_control(mmio: &mut impl Mmio) {
    mmio.write32(UNKNOWN_CONTROL, UNKNOWN_CONTROL_VALUE);
}
