// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Secure boot block and exception vector block, which hold the address cores jump to when they
//! leave reset.

use crate::{error::BootError, mmio::Mmio};

const SB_BASE: usize = 0x6000_c200;
const EVP_BASE: usize = 0x6000_f000;

pub const SB_CSR: usize = SB_BASE + 0x000;
pub const SB_AA64_RESET_LOW: usize = SB_BASE + 0x030;
pub const SB_AA64_RESET_HIGH: usize = SB_BASE + 0x034;

pub const EVP_CPU_RESET_VECTOR: usize = EVP_BASE + 0x100;

/// Disables non-secure writes to the reset vector registers, until the next reset.
pub const SB_CSR_NS_RST_VEC_WR_DIS: u32 = 1 << 1;

/// Marks the AArch64 reset vector as valid.
const AA64_RESET_VALID: u32 = 1 << 0;

/// Points every core's AArch64 reset vector at `reset_vector` and locks it.
///
/// Each write is read back, so a vector that was already locked to a different value by an earlier
/// stage is reported rather than silently left in place.
pub fn install_reset_vector(mmio: &mut impl Mmio, reset_vector: u32) -> Result<(), BootError> {
    mmio.write32(EVP_CPU_RESET_VECTOR, 0);
    mmio.write32_verified(SB_AA64_RESET_LOW, reset_vector | AA64_RESET_VALID)?;
    mmio.write32_verified(SB_AA64_RESET_HIGH, 0)?;
    mmio.write32_verified_bits(SB_CSR, SB_CSR_NS_RST_VEC_WR_DIS)
}
