// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Tegra210 SoC, with the drivers for the security engine, fuses, memory carveouts, GIC, flow
//! controller and context save provided by the linked driver library.

use super::{Hardware, Platform};
use crate::{
    context::ContextManager,
    fuse::Fuses,
    interrupt::{InterruptController, InterruptGroup, InterruptHandler},
    logger::{self, LockedWriter},
    mmio::PhysicalMmio,
    naked_asm,
    secmon_warm_entrypoint,
    security_engine::{KeySlot, SecurityEngine},
    soc::{
        flow::FlowController,
        mc::Carveouts,
        uart::{UART_A_BASE, Uart},
    },
    sysregs::Aarch64SystemRegisters,
};
use arm_gic::{IntId, Trigger};
use arm_sysregs::MpidrEl1;

unsafe extern "C" {
    safe fn fuse_init();
    safe fn fuse_get_hardware_type() -> u64;
    safe fn fuse_get_key_generation() -> u32;

    safe fn se_set_in_context_save_mode(enabled: bool);
    safe fn se_validate_stored_vector() -> bool;
    safe fn se_clear_aes_keyslot(slot: u32);
    safe fn se_clear_rsa_keyslot(slot: u32);
    safe fn se_initialize_rng(slot: u32);
    safe fn se_generate_random_key(destination: u32, rng_slot: u32);
    safe fn se_generate_srk(slot: u32);
    safe fn se_operation_completed();

    safe fn actmon_interrupt_handler();

    safe fn mc_configure_default_carveouts();

    safe fn gic_set_priority(int_id: u32, priority: u8);
    safe fn gic_set_group(int_id: u32, group: u32);
    safe fn gic_set_enable(int_id: u32, enabled: bool);
    safe fn gic_set_spi_target(int_id: u32, mask: u8);
    safe fn gic_set_edge_level(int_id: u32, edge: bool);
    safe fn gic_register_handler(int_id: u32, handler: InterruptHandler);
    safe fn gic_init_current_core();

    safe fn flow_clear_csr0_and_events(core_index: u32);

    safe fn restore_current_core_context() -> !;
}

/// Tegra210 running the secure monitor from TZRAM.
pub struct Tegra210;

// SAFETY: `core_position` is indeed a naked function, doesn't access the stack or any other memory,
// only clobbers x0, and returns a unique index for each of the four cores of the single cluster.
unsafe impl Platform for Tegra210 {
    const CORE_COUNT: usize = 4;

    const ACTIVITY_MONITOR_HANDLER: InterruptHandler = actmon_interrupt_handler;

    type LogSinkImpl = LockedWriter<Uart<PhysicalMmio>>;

    type MmioImpl = PhysicalMmio;
    type FusesImpl = DriverFuses;
    type SecurityEngineImpl = DriverSecurityEngine;
    type CarveoutsImpl = DriverCarveouts;
    type InterruptControllerImpl = DriverGic;
    type FlowControllerImpl = DriverFlow;
    type ContextManagerImpl = DriverContext;
    type SystemRegistersImpl = Aarch64SystemRegisters;

    fn init_logger() {
        // SAFETY: UART A is only ever accessed through the logger, which serialises access.
        let mmio = unsafe { PhysicalMmio::new() };
        logger::init(LockedWriter::new(Uart::new(mmio, UART_A_BASE)))
            .expect("Failed to initialise logger");
    }

    unsafe fn hardware() -> Hardware<Self> {
        Hardware {
            // SAFETY: The MMU is off, every address used by the boot sequence is a device register
            // or DRAM, and our caller promised not to create another `Hardware` while this one is
            // live.
            mmio: unsafe { PhysicalMmio::new() },
            fuses: DriverFuses,
            security_engine: DriverSecurityEngine,
            carveouts: DriverCarveouts,
            gic: DriverGic,
            flow: DriverFlow,
            context: DriverContext,
            // SAFETY: The boot sequence is bringing up the current core and nothing at a lower
            // exception level has run on it yet.
            sysregs: unsafe { Aarch64SystemRegisters::new() },
        }
    }

    fn warmboot_entry_address() -> usize {
        secmon_warm_entrypoint as usize
    }

    #[unsafe(naked)]
    extern "C" fn core_position(mpidr: u64) -> usize {
        naked_asm!(
            "and	x0, x0, #{MPIDR_CPU_MASK}",
            "ret",
            MPIDR_CPU_MASK = const MpidrEl1::AFF0_MASK << MpidrEl1::AFF0_SHIFT,
        );
    }
}

/// Fuse reader from the driver library.
pub struct DriverFuses;

impl Fuses for DriverFuses {
    fn init(&mut self) {
        fuse_init();
    }

    fn hardware_type_raw(&mut self) -> u64 {
        fuse_get_hardware_type()
    }

    fn key_generation_raw(&mut self) -> u32 {
        fuse_get_key_generation()
    }
}

/// Security engine driver from the driver library.
pub struct DriverSecurityEngine;

impl SecurityEngine for DriverSecurityEngine {
    const OPERATION_COMPLETED_HANDLER: InterruptHandler = se_operation_completed;

    fn set_in_context_save_mode(&mut self, enabled: bool) {
        se_set_in_context_save_mode(enabled);
    }

    fn stored_vector_is_valid(&mut self) -> bool {
        se_validate_stored_vector()
    }

    fn clear_aes_keyslot(&mut self, slot: KeySlot) {
        se_clear_aes_keyslot(slot.0);
    }

    fn clear_rsa_keyslot(&mut self, slot: KeySlot) {
        se_clear_rsa_keyslot(slot.0);
    }

    fn initialize_rng(&mut self, slot: KeySlot) {
        se_initialize_rng(slot.0);
    }

    fn generate_random_key(&mut self, destination: KeySlot, rng_slot: KeySlot) {
        se_generate_random_key(destination.0, rng_slot.0);
    }

    fn generate_srk(&mut self, slot: KeySlot) {
        se_generate_srk(slot.0);
    }
}

/// Memory carveout driver from the driver library.
pub struct DriverCarveouts;

impl Carveouts for DriverCarveouts {
    fn configure_default_carveouts(&mut self) {
        mc_configure_default_carveouts();
    }
}

/// GICv2 driver from the driver library.
pub struct DriverGic;

impl InterruptController for DriverGic {
    fn set_priority(&mut self, int_id: IntId, priority: u8) {
        gic_set_priority(int_id.into(), priority);
    }

    fn set_group(&mut self, int_id: IntId, group: InterruptGroup) {
        let group = match group {
            InterruptGroup::Group0 => 0,
            InterruptGroup::Group1 => 1,
        };
        gic_set_group(int_id.into(), group);
    }

    fn set_enabled(&mut self, int_id: IntId, enabled: bool) {
        gic_set_enable(int_id.into(), enabled);
    }

    fn set_cpu_mask(&mut self, int_id: IntId, mask: u8) {
        gic_set_spi_target(int_id.into(), mask);
    }

    fn set_trigger(&mut self, int_id: IntId, trigger: Trigger) {
        gic_set_edge_level(int_id.into(), trigger == Trigger::Edge);
    }

    fn register_handler(&mut self, int_id: IntId, handler: InterruptHandler) {
        gic_register_handler(int_id.into(), handler);
    }

    fn init_current_core(&mut self) {
        gic_init_current_core();
    }
}

/// Flow controller driver from the driver library.
pub struct DriverFlow;

impl FlowController for DriverFlow {
    fn clear_events(&mut self, core_index: usize) {
        // Core indices are always less than `CORE_COUNT`.
        flow_clear_csr0_and_events(core_index as u32);
    }
}

/// Context save and restore from the driver library.
pub struct DriverContext;

impl ContextManager for DriverContext {
    fn restore_current_core_context(&mut self) -> ! {
        restore_current_core_context()
    }
}
