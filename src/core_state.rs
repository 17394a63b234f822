// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Per-core initialisation, run on each core every time it comes out of reset or sleep.

use crate::{
    context::{ContextManager, CoresImpl},
    interrupt::{CROSS_CORE_INTID, InterruptController, configure_private_secure},
    platform::HardwareImpl,
    soc::{flow::FlowController, sysctr0},
    sysregs::{SystemRegister, SystemRegisters},
};
use arm_sysregs::HcrEl2;
use log::debug;
use percore::Cores;

/// Auxiliary control value for EL3 and EL2: lets lower exception levels access CPUACTLR,
/// CPUECTLR, L2CTLR, L2ECTLR and L2ACTLR.
const ACTLR_LOWER_EL_ACCESS: u64 = 0x73;

/// All domains are managers, so no domain checks apply to AArch32 EL1.
const DACR32_ALL_MANAGERS: u64 = 0xffff_ffff;

/// EL1 starts with the MMU, caches and alignment checks off.
const SCTLR_EL1_RESET: u64 = 0x00c5_0838;
/// EL2 starts with the MMU, caches and alignment checks off.
const SCTLR_EL2_RESET: u64 = 0x30c5_0838;

/// CNTHCTL_EL2.EL1PCTEN: EL0 and EL1 may read the physical counter.
const CNTHCTL_EL1PCTEN: u64 = 1 << 0;
/// CNTHCTL_EL2.EL1PCEN: EL0 and EL1 may access the physical timer.
const CNTHCTL_EL1PCEN: u64 = 1 << 1;

/// Sets up the current core's system registers, timer and interrupts, then restores its saved
/// context.
pub fn setup_current_core_state(hw: &mut HardwareImpl) -> ! {
    let core_index = CoresImpl::core_index();
    debug!("Setting up core {core_index}");

    let sysregs = &mut hw.sysregs;
    sysregs.write(SystemRegister::ActlrEl3, ACTLR_LOWER_EL_ACCESS);
    sysregs.write(SystemRegister::ActlrEl2, ACTLR_LOWER_EL_ACCESS);
    sysregs.write(SystemRegister::HcrEl2, HcrEl2::RW.bits());
    sysregs.write(SystemRegister::Dacr32El2, DACR32_ALL_MANAGERS);
    sysregs.write(SystemRegister::SctlrEl1, SCTLR_EL1_RESET);
    sysregs.write(SystemRegister::SctlrEl2, SCTLR_EL2_RESET);
    sysregs.isb();

    let counter_frequency = sysctr0::counter_frequency(&mut hw.mmio);
    sysregs.write(SystemRegister::CntfrqEl0, counter_frequency.into());
    sysregs.write(SystemRegister::CnthctlEl2, CNTHCTL_EL1PCTEN | CNTHCTL_EL1PCEN);
    sysregs.isb();

    hw.flow.clear_events(core_index);
    hw.gic.init_current_core();
    configure_private_secure(&mut hw.gic, CROSS_CORE_INTID);

    debug!("Core {core_index} up, counter at {counter_frequency} Hz");
    hw.context.restore_current_core_context()
}
