// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! APB slave security enables, which make individual peripherals accessible only from the secure
//! world.

use crate::{
    error::BootError,
    fuse::{HardwareType, KeyGeneration},
    mmio::Mmio,
};
use bitflags::bitflags;

const APB_MISC_BASE: usize = 0x7000_0000;

pub const SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG0: usize = APB_MISC_BASE + 0xc00;
pub const SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG1: usize = APB_MISC_BASE + 0xc04;
pub const SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG2: usize = APB_MISC_BASE + 0xc08;

bitflags! {
    /// APB slave security enable register 0.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct SecurityEnable0: u32 {
        const SATA_AUX = 1 << 2;
        const DTV = 1 << 6;
        const QSPI = 1 << 9;
        const SE = 1 << 14;
        const SATA = 1 << 20;
        const LA = 1 << 22;
    }
}

bitflags! {
    /// APB slave security enable register 1.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct SecurityEnable1: u32 {
        const UARTB = 1 << 13;
        const UARTC = 1 << 14;
        const SPI1 = 1 << 20;
        const SPI2 = 1 << 21;
        const SPI3 = 1 << 22;
        const SPI4 = 1 << 23;
        const SPI5 = 1 << 24;
        const SPI6 = 1 << 25;
        const I2C3 = 1 << 28;
        const I2C5 = 1 << 29;
        const I2C6 = 1 << 31;
    }
}

bitflags! {
    /// APB slave security enable register 2.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct SecurityEnable2: u32 {
        const SDMMC1 = 1 << 0;
        const SDMMC3 = 1 << 2;
        const DDS = 1 << 8;
        const DP2 = 1 << 9;
    }
}

impl SecurityEnable0 {
    /// Peripherals locked on every unit.
    pub const BASE: Self = Self::SATA_AUX
        .union(Self::DTV)
        .union(Self::QSPI)
        .union(Self::SE)
        .union(Self::SATA)
        .union(Self::LA);
}

impl SecurityEnable1 {
    /// Peripherals locked on every unit.
    pub const BASE: Self = Self::SPI1
        .union(Self::SPI2)
        .union(Self::SPI3)
        .union(Self::SPI5)
        .union(Self::SPI6)
        .union(Self::I2C6);
    /// Additionally locked on newer boards with the extended policy.
    pub const EXTENDED: Self = Self::UARTB
        .union(Self::UARTC)
        .union(Self::SPI4)
        .union(Self::I2C3);
}

impl SecurityEnable2 {
    /// Peripherals locked on every unit.
    pub const BASE: Self = Self::SDMMC3.union(Self::DDS).union(Self::DP2);
    /// Additionally locked on newer boards with the extended policy.
    pub const EXTENDED: Self = Self::SDMMC1;
}

/// The values of all three security enable registers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PeripheralPolicy {
    pub reg0: SecurityEnable0,
    pub reg1: SecurityEnable1,
    pub reg2: SecurityEnable2,
}

impl PeripheralPolicy {
    /// Returns the set of peripherals to lock for the given unit.
    ///
    /// The I2C bus behind I2C5 stays open on development units. The buses added by the extended
    /// set are only locked from 4.0.0 on, and never on first generation retail units.
    pub fn for_device(hardware_type: HardwareType, key_generation: KeyGeneration) -> Self {
        let mut policy = Self {
            reg0: SecurityEnable0::BASE,
            reg1: SecurityEnable1::BASE,
            reg2: SecurityEnable2::BASE,
        };
        if !hardware_type.is_development_unit() {
            policy.reg1 |= SecurityEnable1::I2C5;
        }
        if hardware_type != HardwareType::Icosa && key_generation.has_extended_policy() {
            policy.reg1 |= SecurityEnable1::EXTENDED;
            policy.reg2 |= SecurityEnable2::EXTENDED;
        }
        policy
    }

    /// Writes the policy to the security enable registers, reading each one back.
    pub fn apply(&self, mmio: &mut impl Mmio) -> Result<(), BootError> {
        mmio.write32_verified(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG0, self.reg0.bits())?;
        mmio.write32_verified(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG1, self.reg1.bits())?;
        mmio.write32_verified(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG2, self.reg2.bits())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::test::FakeMmio;

    #[test]
    fn register_values() {
        assert_eq!(SecurityEnable0::BASE.bits(), 0x0050_4244);
        assert_eq!(SecurityEnable1::BASE.bits(), 0x8370_0000);
        assert_eq!(SecurityEnable1::I2C5.bits(), 0x2000_0000);
        assert_eq!(SecurityEnable1::EXTENDED.bits(), 0x1080_6000);
        assert_eq!(SecurityEnable2::BASE.bits(), 0x0000_0304);
        assert_eq!(SecurityEnable2::EXTENDED.bits(), 0x1);
    }

    #[test]
    fn policy_table() {
        let cases = [
            (HardwareType::Copper, KeyGeneration::V3_0_1, 0x8370_0000, 0x304),
            (HardwareType::Icosa, KeyGeneration::V3_0_1, 0xa370_0000, 0x304),
            (HardwareType::Iowa, KeyGeneration::V3_0_1, 0xa370_0000, 0x304),
            (HardwareType::Copper, KeyGeneration::V4_0_0, 0x93f0_6000, 0x305),
            (HardwareType::Icosa, KeyGeneration::V5_0_0, 0xa370_0000, 0x304),
            (HardwareType::Hoag, KeyGeneration::V6_2_0, 0xb3f0_6000, 0x305),
            (HardwareType::Unknown(7), KeyGeneration::V4_0_0, 0xb3f0_6000, 0x305),
        ];
        for (hardware_type, key_generation, reg1, reg2) in cases {
            let policy = PeripheralPolicy::for_device(hardware_type, key_generation);
            assert_eq!(policy.reg0.bits(), 0x0050_4244, "{hardware_type:?} {key_generation:?}");
            assert_eq!(policy.reg1.bits(), reg1, "{hardware_type:?} {key_generation:?}");
            assert_eq!(policy.reg2.bits(), reg2, "{hardware_type:?} {key_generation:?}");
        }
    }

    #[test]
    fn apply_reports_rejected_write() {
        let mut mmio = FakeMmio::default();
        mmio.make_read_only(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG1, 0);
        let policy = PeripheralPolicy::for_device(HardwareType::Icosa, KeyGeneration::V1_0_0);
        assert_eq!(
            policy.apply(&mut mmio),
            Err(BootError::WriteNotConfirmed {
                address: SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG1,
                expected: 0xa370_0000,
                actual: 0,
            })
        );
        assert_eq!(
            mmio.read32(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG0),
            0x0050_4244
        );
        assert_eq!(mmio.read32(SECURE_REGS_APB_SLAVE_SECURITY_ENABLE_REG2), 0);
    }
}
