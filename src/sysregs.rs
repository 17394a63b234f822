// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! The architectural system registers programmed when a core comes up.

/// A system register which the per-core initialisation writes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SystemRegister {
    ActlrEl3,
    ActlrEl2,
    HcrEl2,
    Dacr32El2,
    SctlrEl1,
    SctlrEl2,
    CntfrqEl0,
    CnthctlEl2,
}

/// Write access to the current core's system registers, plus the barrier that makes the writes
/// take effect.
pub trait SystemRegisters {
    /// Writes `value` to the given system register of the current core.
    fn write(&mut self, register: SystemRegister, value: u64);

    /// Issues an instruction synchronization barrier, so that all system register writes before it
    /// are visible to instructions after it.
    fn isb(&mut self);
}

#[cfg(all(target_arch = "aarch64", not(test)))]
mod aarch64 {
    use super::{SystemRegister, SystemRegisters};
    use arm_sysregs::{
        CnthctlEl2, HcrEl2, SctlrEl1, SctlrEl2, write_actlr_el2, write_cnthctl_el2, write_hcr_el2,
        write_sctlr_el1, write_sctlr_el2, write_sysreg,
    };

    write_sysreg! {
        /// # Safety
        ///
        /// The value written mustn't give a lower exception level access to anything it shouldn't
        /// control.
        actlr_el3: s3_6_c1_c0_1, u64
    }
    write_sysreg! {
        /// # Safety
        ///
        /// Must only be written before AArch32 EL1 code runs on this core.
        dacr32_el2: s3_4_c3_c0_0, u64
    }
    write_sysreg! {
        /// # Safety
        ///
        /// Must hold the actual frequency of the system counter.
        cntfrq_el0: s3_3_c14_c0_0, u64
    }

    /// The system registers of the core that is executing.
    pub struct Aarch64SystemRegisters {
        _private: (),
    }

    impl Aarch64SystemRegisters {
        /// Returns a handle to the current core's system registers.
        ///
        /// # Safety
        ///
        /// Must only be used while bringing up the current core, before anything running at a
        /// lower exception level depends on the registers written.
        pub const unsafe fn new() -> Self {
            Self { _private: () }
        }
    }

    impl SystemRegisters for Aarch64SystemRegisters {
        fn write(&mut self, register: SystemRegister, value: u64) {
            match register {
                // SAFETY: The caller of `Aarch64SystemRegisters::new` promised that nothing yet
                // depends on these registers, and the per-core setup only grants lower exception
                // levels access to the implementation defined control registers.
                SystemRegister::ActlrEl3 => unsafe { write_actlr_el3(value) },
                // SAFETY: As above, nothing yet depends on these registers.
                SystemRegister::ActlrEl2 => unsafe { write_actlr_el2(value) },
                // SAFETY: As above, nothing yet depends on these registers.
                SystemRegister::HcrEl2 => unsafe { write_hcr_el2(HcrEl2::from_bits_retain(value)) },
                // SAFETY: Nothing has run at AArch32 EL1 on this core yet.
                SystemRegister::Dacr32El2 => unsafe { write_dacr32_el2(value) },
                // SAFETY: As above, nothing yet depends on these registers.
                SystemRegister::SctlrEl1 => unsafe {
                    write_sctlr_el1(SctlrEl1::from_bits_retain(value))
                },
                // SAFETY: As above, nothing yet depends on these registers.
                SystemRegister::SctlrEl2 => unsafe {
                    write_sctlr_el2(SctlrEl2::from_bits_retain(value))
                },
                // SAFETY: The per-core setup writes the frequency read from the system counter.
                SystemRegister::CntfrqEl0 => unsafe { write_cntfrq_el0(value) },
                SystemRegister::CnthctlEl2 => {
                    write_cnthctl_el2(CnthctlEl2::from_bits_retain(value))
                }
            }
        }

        fn isb(&mut self) {
            crate::aarch64::isb();
        }
    }
}

#[cfg(all(target_arch = "aarch64", not(test)))]
pub use aarch64::Aarch64SystemRegisters;
