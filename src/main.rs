// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Secure monitor for Tegra210 class SoCs: locks the SoC down before any non-secure code runs and
//! brings up each core as it leaves reset.

#![cfg_attr(not(test), no_main)]
#![cfg_attr(not(test), no_std)]

mod aarch64;
mod context;
mod core_state;
mod debug;
mod error;
mod fuse;
mod interrupt;
mod lockdown;
mod logger;
mod mmio;
mod platform;
mod security_engine;
mod soc;
mod stacks;
mod sysregs;

use crate::{
    context::CoresImpl,
    core_state::setup_current_core_state,
    lockdown::{BOOT_STATE, BootState, bootup_misc_mmio},
    platform::{HardwareImpl, Platform, PlatformImpl},
    soc::mc,
};
#[cfg(not(test))]
pub use asm::secmon_warm_entrypoint;
use log::info;
use percore::Cores;
use spin::mutex::SpinMutex;

#[cfg_attr(test, allow(unused))]
extern "C" fn secmon_main() -> ! {
    PlatformImpl::init_logger();
    info!("Secure monitor starting");

    // SAFETY: Only the primary core is running, and this is the only `Hardware` it creates.
    let mut hw = unsafe { PlatformImpl::hardware() };
    cold_boot(&mut hw, &BOOT_STATE)
}

#[cfg_attr(test, allow(unused))]
extern "C" fn secmon_warm_main() -> ! {
    // SAFETY: Cores enter the warm boot path one at a time, with the others either still held in
    // reset or already running outside the secure monitor.
    let mut hw = unsafe { PlatformImpl::hardware() };
    warm_boot(&mut hw, &BOOT_STATE)
}

/// Runs the full lockdown on the primary core, then brings the core up.
fn cold_boot(hw: &mut HardwareImpl, boot_state: &SpinMutex<BootState>) -> ! {
    {
        let mut state = boot_state.lock();
        if let Err(e) = bootup_misc_mmio(hw, &mut state) {
            panic!("Security lockdown failed: {e}");
        }
        state.set_core_active(CoresImpl::core_index(), true);
    }
    setup_current_core_state(hw)
}

/// Brings up a core which has left reset after the first boot.
///
/// If the memory controller has lost its security configuration then the whole SoC is resuming
/// from deep sleep, and the lockdown is run again before anything else.
fn warm_boot(hw: &mut HardwareImpl, boot_state: &SpinMutex<BootState>) -> ! {
    {
        let mut state = boot_state.lock();
        if mc::security_configuration_lost(&mut hw.mmio) {
            info!("Resuming from deep sleep");
            if let Err(e) = bootup_misc_mmio(hw, &mut state) {
                panic!("Security lockdown failed on resume: {e}");
            }
        }
        state.set_core_active(CoresImpl::core_index(), true);
    }
    setup_current_core_state(hw)
}

#[cfg(all(target_arch = "aarch64", not(test)))]
mod asm {
    use super::*;

    /// The cold boot entrypoint, executed only by the primary cpu.
    ///
    /// Zeroes `.bss`, sets up the stack and calls `secmon_main`.
    #[unsafe(naked)]
    #[unsafe(no_mangle)]
    #[unsafe(link_section = ".text.entrypoint")]
    unsafe extern "C" fn secmon_entrypoint() -> ! {
        naked_asm!(
            "adrp	x0, __BSS_START__",
            "add	x0, x0, :lo12:__BSS_START__",
            "adrp	x1, __BSS_END__",
            "add	x1, x1, :lo12:__BSS_END__",
            "0:",
            "cmp	x0, x1",
            "b.hs	1f",
            "stp	xzr, xzr, [x0], #16",
            "b	0b",
            "1:",
            "bl	secmon_set_my_stack",
            "bl	{secmon_main}",
            "b	.",
            secmon_main = sym secmon_main,
        );
    }

    /// The entrypoint of every core leaving reset after the first boot, whether it is being
    /// powered on or the SoC is resuming from deep sleep.
    ///
    /// # Safety
    ///
    /// This must be called with the MMU turned off.
    #[unsafe(naked)]
    pub unsafe extern "C" fn secmon_warm_entrypoint() -> ! {
        naked_asm!(
            "bl	secmon_set_my_stack",
            "bl	{secmon_warm_main}",
            "b	.",
            secmon_warm_main = sym secmon_warm_main,
        );
    }

    /// This macro wraps a naked_asm block with `bti`, or any other universal
    /// prologue we'd still like added.
    ///
    /// Use this over `core::arch::naked_asm` by default, otherwise you may
    /// need to ensure that e.g. `bti` landing pads are in place yourself.
    macro_rules! naked_asm {
        ($($inner:tt)*) => {
           ::core::arch::naked_asm!("bti c", $($inner)*)
        }
    }
    pub(crate) use naked_asm;
}

#[cfg(all(target_arch = "aarch64", not(test)))]
pub(crate) use asm::naked_asm;
