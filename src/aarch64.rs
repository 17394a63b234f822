// Copyright (c) 2025, Google LLC. All rights reserved.
//
// SPDX-License-Identifier: BSD-3-Clause

#[cfg(target_arch = "aarch64")]
use core::arch::asm;

/// Issues an instruction synchronization barrier (`isb`) instruction.
#[cfg_attr(test, allow(unused))]
pub fn isb() {
    // SAFETY: `isb` does not violate safe Rust guarantees.
    #[cfg(target_arch = "aarch64")]
    unsafe {
        asm!("isb", options(nostack));
    }
}

/// Waits for an event (`wfe`).
#[cfg_attr(test, allow(unused))]
pub fn wfe() {
    // SAFETY: `wfe` does not violate safe Rust guarantees.
    #[cfg(target_arch = "aarch64")]
    unsafe {
        asm!("wfe", options(nomem, nostack, preserves_flags));
    }
}
