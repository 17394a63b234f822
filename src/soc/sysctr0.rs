// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! System counter control frame, set up by the boot ROM.

use crate::mmio::Mmio;

const SYSCTR0_BASE: usize = 0x700f_0000;

/// Frequency of the system counter, in Hz.
pub const CNTFID0: usize = SYSCTR0_BASE + 0x020;

/// Returns the system counter frequency, in Hz.
pub fn counter_frequency(mmio: &mut impl Mmio) -> u32 {
    mmio.read32(CNTFID0)
}
