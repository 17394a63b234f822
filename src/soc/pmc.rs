// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Power management controller.

use crate::mmio::Mmio;

const PMC_BASE: usize = 0x7000_e400;

pub const DPD_ENABLE: usize = PMC_BASE + 0x024;
pub const SEC_DISABLE3: usize = PMC_BASE + 0x2d8;
pub const SECURE_SCRATCH34: usize = PMC_BASE + 0x368;
pub const SECURE_SCRATCH35: usize = PMC_BASE + 0x36c;

/// Disables write access from the non-secure world to a DRAM bank's PMC controls.
const SEC_DISABLE3_VALUE: u32 = 0x0050_0000;

/// Disables deep power down.
pub fn disable_deep_power_down(mmio: &mut impl Mmio) {
    mmio.write32(DPD_ENABLE, 0);
}

/// Stores the warm boot reset vector in the secure scratch registers, where the resume path finds
/// it, and disables access to the DRAM bank controls.
pub fn store_warmboot_vector(mmio: &mut impl Mmio, reset_vector: u32) {
    mmio.write32(SECURE_SCRATCH34, reset_vector);
    mmio.write32(SECURE_SCRATCH35, 0);
    mmio.write32(SEC_DISABLE3, SEC_DISABLE3_VALUE);
}
