// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Core indexing and the hand-off to the saved per-core context.

use crate::platform::{Platform, PlatformImpl};
use arm_sysregs::read_mpidr_el1;
use percore::Cores;

/// The driver which owns the saved execution context of each core.
pub trait ContextManager {
    /// Restores the current core's saved context and returns to it. The context storage, and the
    /// choice of which context to restore, belong to the implementation.
    fn restore_current_core_context(&mut self) -> !;
}

/// Implementation of the `Cores` trait to get the index of the current CPU core.
pub struct CoresImpl;

// SAFETY: This implementation never returns the same index for different cores because
// `core_position` is guaranteed not to.
unsafe impl Cores for CoresImpl {
    fn core_index() -> usize {
        PlatformImpl::core_position(read_mpidr_el1().bits())
    }
}
