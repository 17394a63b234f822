// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! The global security lockdown, which runs on the primary core before any non-secure code.
//!
//! The full lockdown runs once per power cycle. If the SoC resumes from deep sleep the lockdown is
//! run again on the same core, taking the reduced path, because the memory controller and the
//! peripheral security enables have been reset while TZRAM, which holds [`BOOT_STATE`], has not.

use crate::{
    error::BootError,
    fuse::{self, Fuses, KeyGeneration},
    interrupt::{
        ACTIVITY_MONITOR_INTID, InterruptConfig, InterruptController, SECURITY_ENGINE_INTID,
        configure_shared,
    },
    mmio::Mmio,
    platform::{HardwareImpl, Platform, PlatformImpl, SecurityEngineImpl},
    security_engine::{SecurityEngine, clear_stale_keyslots, derive_secure_root_key},
    soc::{apb_misc::PeripheralPolicy, car, flow, mc, pmc, secure_boot, timers},
};
use log::{debug, info};
use spin::mutex::SpinMutex;

/// The boot state shared by the lockdown and the core lifecycle code.
pub static BOOT_STATE: SpinMutex<BootState> = SpinMutex::new(BootState::new());

/// Where the older key generations' firmware expects to find [`LEGACY_DRAM_MARKER`].
const LEGACY_DRAM_MARKER_ADDRESS: usize = 0x8005_fffc;
const LEGACY_DRAM_MARKER: u32 = 0xc0ed_bbcc;

/// State which survives from the first lockdown to every later one.
///
/// Written only by the primary core during lockdown, or by a core marking itself active as it
/// comes up, and never while another core could be reading it.
#[derive(Debug)]
pub struct BootState {
    has_booted: bool,
    core_active: [bool; PlatformImpl::CORE_COUNT],
}

impl BootState {
    /// Returns the state at power on: not yet booted and no cores active.
    pub const fn new() -> Self {
        Self {
            has_booted: false,
            core_active: [false; PlatformImpl::CORE_COUNT],
        }
    }

    /// Returns whether the first full lockdown has completed.
    #[cfg_attr(not(test), allow(unused))]
    pub fn has_booted(&self) -> bool {
        self.has_booted
    }

    /// Marks the given core as active or inactive.
    pub fn set_core_active(&mut self, core_index: usize, active: bool) {
        self.core_active[core_index] = active;
    }

    /// Returns whether the given core is active.
    #[cfg_attr(not(test), allow(unused))]
    pub fn is_core_active(&self, core_index: usize) -> bool {
        self.core_active[core_index]
    }
}

/// Brings the SoC into its secure state.
///
/// On the first call this also registers the secure interrupt handlers, marks every secondary core
/// inactive and sets the boot guard. On later calls it instead restores the settings older key
/// generations need after a resume.
///
/// Any error leaves the SoC partially locked down, so the caller must not hand over to the
/// non-secure world after one.
pub fn bootup_misc_mmio(hw: &mut HardwareImpl, state: &mut BootState) -> Result<(), BootError> {
    let warmboot_entry = PlatformImpl::warmboot_entry_address();
    let reset_vector = u32::try_from(warmboot_entry)
        .map_err(|_| BootError::ResetVectorOutOfRange(warmboot_entry))?;

    hw.fuses.init();
    let hardware_type = fuse::hardware_type(&mut hw.fuses);
    let key_generation = fuse::key_generation(&mut hw.fuses)?;
    debug!(
        "Lockdown for {hardware_type:?} at key generation {key_generation:?}, first boot: {}",
        !state.has_booted
    );

    hw.security_engine.set_in_context_save_mode(false);
    if !hw.security_engine.stored_vector_is_valid() {
        return Err(BootError::CorruptStoredVector);
    }
    clear_stale_keyslots(&mut hw.security_engine);
    derive_secure_root_key(&mut hw.security_engine);
    debug!("Secure root key derived");

    if cfg!(feature = "legacy_dram_marker")
        && !state.has_booted
        && key_generation.has_extended_policy()
    {
        write_legacy_dram_marker(&mut hw.mmio);
    }
    timers::write_unknown_control(&mut hw.mmio);

    flow::lock_active_cluster(&mut hw.mmio);
    pmc::disable_deep_power_down(&mut hw.mmio);

    mc::configure_security(&mut hw.mmio, &mut hw.carveouts)?;
    debug!("Memory controller secured");

    let policy = PeripheralPolicy::for_device(hardware_type, key_generation);
    info!(
        "Locking peripherals {:#010x} {:#010x} {:#010x}",
        policy.reg0.bits(),
        policy.reg1.bits(),
        policy.reg2.bits()
    );
    policy.apply(&mut hw.mmio)?;

    mc::write_defaults(&mut hw.mmio);

    secure_boot::install_reset_vector(&mut hw.mmio, reset_vector)?;
    pmc::store_warmboot_vector(&mut hw.mmio, reset_vector);
    debug!("Reset vector locked to {reset_vector:#010x}");

    configure_shared(
        &mut hw.gic,
        SECURITY_ENGINE_INTID,
        InterruptConfig::SECURE_ON_CORE3,
    );
    configure_shared(
        &mut hw.gic,
        ACTIVITY_MONITOR_INTID,
        InterruptConfig::SECURE_ON_CORE3,
    );

    if !state.has_booted {
        hw.gic.register_handler(
            SECURITY_ENGINE_INTID,
            <SecurityEngineImpl as SecurityEngine>::OPERATION_COMPLETED_HANDLER,
        );
        hw.gic.register_handler(
            ACTIVITY_MONITOR_INTID,
            PlatformImpl::ACTIVITY_MONITOR_HANDLER,
        );
        for core_index in 1..PlatformImpl::CORE_COUNT {
            state.set_core_active(core_index, false);
        }
        state.has_booted = true;
    } else if key_generation < KeyGeneration::EXTENDED_POLICY {
        restore_legacy_settings(&mut hw.mmio);
    }

    info!("Security lockdown complete");
    Ok(())
}

/// Writes the marker the older key generations' firmware looks for in DRAM.
///
/// What reads the marker is not known. It is written for compatibility, and nothing here depends
/// on it for security.
fn write_legacy_dram_marker(mmio: &mut impl Mmio) {
    mmio.write32(LEGACY_DRAM_MARKER_ADDRESS, LEGACY_DRAM_MARKER);
}

/// Restores the memory controller and clock settings which older key generations expect to find
/// set again after a resume.
fn restore_legacy_settings(mmio: &mut impl Mmio) {
    mc::restore_legacy_settings(mmio);
    car::clear_legacy_clock_gate_override(mmio);
    debug!("Legacy memory controller settings restored");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        platform::test::{Event, FakeSecurityEngine, KeySlotState, TestPlatform, Trace},
        security_engine::{AES_KEYSLOT_COUNT, KeySlot, SESSION_KEYSLOT},
        soc::{
            apb_misc::{
                SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG0,
                SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG1,
                SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG2,
            },
            car::LVL2_CLK_GATE_OVRD,
            mc::{MC_SECURITY_CFG0, MC_SECURITY_CFG3},
            secure_boot::{SB_AA64_RESET_LOW, SB_CSR},
            timers::UNKNOWN_CONTROL,
        },
    };
    use arm_gic::Trigger;

    const ICOSA: u64 = 0;
    const COPPER: u64 = 1;
    const IOWA: u64 = 3;

    const V3_0_1: u32 = 2;
    const V4_0_0: u32 = 3;
    const V6_2_0: u32 = 6;

    const MC_LEGACY_65C: usize = 0x7001_965c;
    const MC_LEGACY_660: usize = 0x7001_9660;
    const MC_LEGACY_964: usize = 0x7001_9964;

    fn first_boot(
        trace: &Trace,
        hardware_type: u64,
        key_generation: u32,
    ) -> (HardwareImpl, BootState) {
        let mut hw = TestPlatform::fake_hardware(trace, hardware_type, key_generation);
        let mut state = BootState::new();
        bootup_misc_mmio(&mut hw, &mut state).unwrap();
        (hw, state)
    }

    fn peripheral_registers(hw: &mut HardwareImpl) -> [u32; 3] {
        [
            hw.mmio.read32(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG0),
            hw.mmio.read32(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG1),
            hw.mmio.read32(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG2),
        ]
    }

    #[test]
    fn first_boot_sets_guard_and_registers_handlers() {
        let trace = Trace::default();
        let mut hw = TestPlatform::fake_hardware(&trace, IOWA, V6_2_0);
        let mut state = BootState::new();
        for core_index in 0..TestPlatform::CORE_COUNT {
            state.set_core_active(core_index, true);
        }

        bootup_misc_mmio(&mut hw, &mut state).unwrap();

        assert!(state.has_booted());
        assert!(state.is_core_active(0));
        for core_index in 1..TestPlatform::CORE_COUNT {
            assert!(!state.is_core_active(core_index));
        }
        assert_eq!(
            hw.gic.handler_address(SECURITY_ENGINE_INTID),
            Some(FakeSecurityEngine::OPERATION_COMPLETED_HANDLER as usize)
        );
        assert_eq!(
            hw.gic.handler_address(ACTIVITY_MONITOR_INTID),
            Some(TestPlatform::ACTIVITY_MONITOR_HANDLER as usize)
        );
    }

    #[test]
    fn both_interrupts_secure_on_core3() {
        let trace = Trace::default();
        first_boot(&trace, ICOSA, V3_0_1);

        for int_id in [SECURITY_ENGINE_INTID, ACTIVITY_MONITOR_INTID] {
            let start = trace.position(&Event::SetPriority(int_id, 0)).unwrap();
            assert_eq!(
                trace.events()[start..start + 5],
                [
                    Event::SetPriority(int_id, 0),
                    Event::SetGroup(int_id, crate::interrupt::InterruptGroup::Group0),
                    Event::SetEnabled(int_id, true),
                    Event::SetCpuMask(int_id, 0x8),
                    Event::SetTrigger(int_id, Trigger::Level),
                ]
            );
        }
    }

    #[test]
    fn repeat_on_legacy_key_generation_restores_settings() {
        let trace = Trace::default();
        let (mut hw, mut state) = first_boot(&trace, ICOSA, V3_0_1);
        hw.mmio.write32(LVL2_CLK_GATE_OVRD, 0xffff_ffff);
        hw.mmio.write32(MC_LEGACY_964, 0x10);
        trace.clear();

        bootup_misc_mmio(&mut hw, &mut state).unwrap();

        assert_eq!(trace.writes_to(MC_LEGACY_65C), [0xffff_f000]);
        assert_eq!(trace.writes_to(MC_LEGACY_660), [0]);
        assert_eq!(hw.mmio.read32(MC_LEGACY_964), 0x11);
        assert_eq!(hw.mmio.read32(LVL2_CLK_GATE_OVRD), 0xfff7_ffff);
    }

    #[test]
    fn repeat_on_current_key_generation_skips_legacy_settings() {
        let trace = Trace::default();
        let (mut hw, mut state) = first_boot(&trace, IOWA, V4_0_0);
        hw.mmio.write32(LVL2_CLK_GATE_OVRD, 0xffff_ffff);
        trace.clear();

        bootup_misc_mmio(&mut hw, &mut state).unwrap();

        assert!(trace.writes_to(MC_LEGACY_65C).is_empty());
        assert!(trace.writes_to(MC_LEGACY_660).is_empty());
        assert!(trace.writes_to(MC_LEGACY_964).is_empty());
        assert_eq!(hw.mmio.read32(LVL2_CLK_GATE_OVRD), 0xffff_ffff);
    }

    #[test]
    fn first_boot_skips_legacy_settings() {
        let trace = Trace::default();
        first_boot(&trace, ICOSA, V3_0_1);

        assert!(trace.writes_to(MC_LEGACY_65C).is_empty());
        assert!(trace.writes_to(LVL2_CLK_GATE_OVRD).is_empty());
    }

    #[test]
    fn peripheral_policy_by_unit_and_key_generation() {
        let cases = [
            (COPPER, V3_0_1, [0x0050_4244, 0x8370_0000, 0x304]),
            (IOWA, V3_0_1, [0x0050_4244, 0xa370_0000, 0x304]),
            (COPPER, V4_0_0, [0x0050_4244, 0x93f0_6000, 0x305]),
            (IOWA, V4_0_0, [0x0050_4244, 0xb3f0_6000, 0x305]),
            (ICOSA, V6_2_0, [0x0050_4244, 0xa370_0000, 0x304]),
        ];
        for (hardware_type, key_generation, expected) in cases {
            let trace = Trace::default();
            let (mut hw, _) = first_boot(&trace, hardware_type, key_generation);
            assert_eq!(
                peripheral_registers(&mut hw),
                expected,
                "hardware type {hardware_type}, key generation {key_generation}"
            );
        }
    }

    #[test]
    fn key_slots_sanitised_and_root_key_derived() {
        let trace = Trace::default();
        let (hw, _) = first_boot(&trace, ICOSA, V3_0_1);

        let se = &hw.security_engine;
        assert!(!se.context_save_mode);
        for slot in 0..SESSION_KEYSLOT.0 {
            let expected = if KeySlot(slot) == crate::security_engine::SRK_GENERATION_KEYSLOT {
                KeySlotState::Loaded
            } else {
                KeySlotState::Cleared
            };
            assert_eq!(se.aes_slots[slot as usize], expected, "slot {slot}");
        }
        assert_eq!(
            se.aes_slots[SESSION_KEYSLOT.0 as usize],
            KeySlotState::Stale
        );
        assert_eq!(
            se.aes_slots[crate::security_engine::RNG_KEYSLOT.0 as usize],
            KeySlotState::Loaded
        );
        for slot in 12..AES_KEYSLOT_COUNT {
            assert_eq!(
                se.aes_slots[slot as usize],
                KeySlotState::Stale,
                "slot {slot}"
            );
        }
        assert_eq!(se.rsa_slots, [KeySlotState::Cleared; 2]);
    }

    #[test]
    fn repeat_lockdown_clears_slots_again() {
        let trace = Trace::default();
        let (mut hw, mut state) = first_boot(&trace, ICOSA, V3_0_1);
        let aes_slots = hw.security_engine.aes_slots;
        let rsa_slots = hw.security_engine.rsa_slots;

        bootup_misc_mmio(&mut hw, &mut state).unwrap();

        assert_eq!(hw.security_engine.aes_slots, aes_slots);
        assert_eq!(hw.security_engine.rsa_slots, rsa_slots);
    }

    #[test]
    fn reset_vector_locked() {
        let trace = Trace::default();
        let (mut hw, _) = first_boot(&trace, IOWA, V4_0_0);

        assert_eq!(hw.mmio.read32(SB_CSR), 2);
        assert_eq!(hw.mmio.read32(SB_AA64_RESET_LOW), 0x7c01_0801);
        assert_eq!(hw.mmio.read32(pmc::SECURE_SCRATCH34), 0x7c01_0800);

        hw.mmio.write32(SB_AA64_RESET_LOW, 0x4000_0001);
        assert_eq!(hw.mmio.read32(SB_AA64_RESET_LOW), 0x7c01_0801);
    }

    #[test]
    fn lockdown_with_latched_csr_bits() {
        let trace = Trace::default();
        let mut hw = TestPlatform::fake_hardware(&trace, IOWA, V4_0_0);
        hw.mmio.make_sticky(SB_CSR, 1 << 4);
        let mut state = BootState::new();

        assert_eq!(bootup_misc_mmio(&mut hw, &mut state), Ok(()));
        assert!(state.has_booted());
        assert_eq!(hw.mmio.read32(SB_CSR), 0x12);
    }

    #[test]
    fn reset_vector_locked_by_earlier_stage() {
        let trace = Trace::default();
        let mut hw = TestPlatform::fake_hardware(&trace, IOWA, V4_0_0);
        hw.mmio.write32(SB_AA64_RESET_LOW, 0x4000_0001);
        hw.mmio.write32(SB_CSR, 2);
        let mut state = BootState::new();

        assert_eq!(
            bootup_misc_mmio(&mut hw, &mut state),
            Err(BootError::WriteNotConfirmed {
                address: SB_AA64_RESET_LOW,
                expected: 0x7c01_0801,
                actual: 0x4000_0001,
            })
        );
        assert!(!state.has_booted());
        assert!(hw.gic.handlers.is_empty());
    }

    #[test]
    fn corrupt_stored_vector_stops_before_key_slots() {
        let trace = Trace::default();
        let mut hw = TestPlatform::fake_hardware(&trace, IOWA, V4_0_0);
        hw.security_engine.stored_vector_valid = false;
        let mut state = BootState::new();

        assert_eq!(
            bootup_misc_mmio(&mut hw, &mut state),
            Err(BootError::CorruptStoredVector)
        );
        assert_eq!(
            trace.events(),
            [
                Event::FuseInit,
                Event::SetInContextSaveMode(false),
                Event::ValidateStoredVector,
            ]
        );
        assert_eq!(hw.security_engine.aes_slots, [KeySlotState::Stale; 16]);
        assert!(!state.has_booted());
    }

    #[test]
    fn unknown_key_generation_touches_nothing() {
        let trace = Trace::default();
        let mut hw = TestPlatform::fake_hardware(&trace, IOWA, 42);
        let mut state = BootState::new();

        assert_eq!(
            bootup_misc_mmio(&mut hw, &mut state),
            Err(BootError::UnsupportedKeyGeneration(42))
        );
        assert_eq!(trace.events(), [Event::FuseInit]);
    }

    #[test]
    fn memory_controller_lock_not_confirmed() {
        let trace = Trace::default();
        let mut hw = TestPlatform::fake_hardware(&trace, IOWA, V4_0_0);
        hw.mmio.make_read_only(MC_SECURITY_CFG3, 0);
        let mut state = BootState::new();

        assert_eq!(
            bootup_misc_mmio(&mut hw, &mut state),
            Err(BootError::WriteNotConfirmed {
                address: MC_SECURITY_CFG3,
                expected: 3,
                actual: 0,
            })
        );
        assert!(trace.position(&Event::ConfigureDefaultCarveouts).is_none());
        assert!(
            trace
                .writes_to(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG0)
                .is_empty()
        );
    }

    #[cfg(feature = "legacy_dram_marker")]
    #[test]
    fn lockdown_phase_order() {
        let trace = Trace::default();
        first_boot(&trace, IOWA, V4_0_0);

        let write_position = |address| {
            trace
                .position(&Event::Write32(address, trace.writes_to(address)[0]))
                .unwrap()
        };
        let phases = [
            trace.position(&Event::FuseInit).unwrap(),
            trace.position(&Event::GenerateSrk(KeySlot(8))).unwrap(),
            write_position(LEGACY_DRAM_MARKER_ADDRESS),
            write_position(UNKNOWN_CONTROL),
            write_position(flow::BPMP_CLUSTER_CONTROL),
            write_position(MC_SECURITY_CFG0),
            trace.position(&Event::ConfigureDefaultCarveouts).unwrap(),
            write_position(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG0),
            write_position(0x7001_9228),
            write_position(SB_AA64_RESET_LOW),
            write_position(SB_CSR),
            write_position(pmc::SECURE_SCRATCH34),
            trace
                .position(&Event::SetPriority(SECURITY_ENGINE_INTID, 0))
                .unwrap(),
            trace
                .position(&Event::RegisterHandler(SECURITY_ENGINE_INTID))
                .unwrap(),
        ];
        assert!(phases.is_sorted(), "{phases:?}");
    }

    #[test]
    fn timer_control_written_every_time() {
        let trace = Trace::default();
        let (mut hw, mut state) = first_boot(&trace, COPPER, V3_0_1);
        bootup_misc_mmio(&mut hw, &mut state).unwrap();

        assert_eq!(trace.writes_to(UNKNOWN_CONTROL), [0xf1e0, 0xf1e0]);
    }

    #[test]
    fn development_unit_legacy_first_boot() {
        let trace = Trace::default();
        let mut hw = TestPlatform::fake_hardware(&trace, COPPER, V3_0_1);
        let mut state = BootState::new();
        assert!(!state.has_booted());

        bootup_misc_mmio(&mut hw, &mut state).unwrap();

        assert_eq!(
            peripheral_registers(&mut hw),
            [0x0050_4244, 0x8370_0000, 0x304]
        );
        assert!(trace.writes_to(LEGACY_DRAM_MARKER_ADDRESS).is_empty());
        assert!(state.has_booted());
    }

    #[cfg(feature = "legacy_dram_marker")]
    #[test]
    fn retail_unit_current_first_boot() {
        let trace = Trace::default();
        let mut hw = TestPlatform::fake_hardware(&trace, IOWA, V4_0_0);
        let mut state = BootState::new();
        assert!(!state.has_booted());

        bootup_misc_mmio(&mut hw, &mut state).unwrap();

        assert_eq!(
            peripheral_registers(&mut hw),
            [0x0050_4244, 0xb3f0_6000, 0x305]
        );
        assert_eq!(trace.writes_to(LEGACY_DRAM_MARKER_ADDRESS), [0xc0ed_bbcc]);
        assert!(state.has_booted());
    }

    #[test]
    fn legacy_second_invocation() {
        let trace = Trace::default();
        let (mut hw, mut state) = first_boot(&trace, ICOSA, V3_0_1);
        state.set_core_active(0, true);
        state.set_core_active(2, true);
        let handlers = hw.gic.handlers.len();
        trace.clear();

        bootup_misc_mmio(&mut hw, &mut state).unwrap();

        assert_eq!(trace.writes_to(MC_LEGACY_65C), [0xffff_f000]);
        assert_eq!(trace.writes_to(MC_LEGACY_660), [0]);
        assert!(
            trace
                .position(&Event::RegisterHandler(SECURITY_ENGINE_INTID))
                .is_none()
        );
        assert!(
            trace
                .position(&Event::RegisterHandler(ACTIVITY_MONITOR_INTID))
                .is_none()
        );
        assert_eq!(hw.gic.handlers.len(), handlers);
        assert!(state.is_core_active(0));
        assert!(!state.is_core_active(1));
        assert!(state.is_core_active(2));
        assert!(!state.is_core_active(3));
        assert!(trace.writes_to(LEGACY_DRAM_MARKER_ADDRESS).is_empty());
    }
}
