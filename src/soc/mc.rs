// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Memory controller security configuration.

use crate::{error::BootError, mmio::Mmio};

const MC_BASE: usize = 0x7001_9000;

pub const MC_SECURITY_CFG0: usize = MC_BASE + 0x070;
pub const MC_SECURITY_CFG1: usize = MC_BASE + 0x074;
pub const MC_SECURITY_CFG3: usize = MC_BASE + 0x9bc;

/// Value of `MC_SECURITY_CFG3` once the memory controller is locked down. The register resets to 0,
/// so reading 0 after boot means the memory controller has been power cycled.
const SECURITY_CFG3_LOCKED: u32 = 3;

/// Security registers alongside the carveouts, cleared before the default carveouts are built.
const SECURITY_BLOCK: [(usize, u32); 11] = [
    (0x984, 1),
    (0x648, 0),
    (0x64c, 0),
    (0x650, 1),
    (0x670, 0),
    (0x674, 0),
    (0x678, 1),
    (0x9a0, 0),
    (0x9a4, 0),
    (0x9a8, 0),
    (0x9ac, 1),
];

/// The fixed defaults written after the peripheral lockdown, in order.
const DEFAULT_BLOCK: [(usize, u32); 19] = [
    (0x228, 0xffff_ffff),
    (0x22c, 0xffff_ffff),
    (0x230, 0xffff_ffff),
    (0x234, 0xffff_ffff),
    (0xb98, 0xffff_ffff),
    (0x038, 0),
    (0x03c, 0),
    (0x0e0, 0),
    (0x0e4, 0),
    (0x0e8, 0),
    (0x0ec, 0),
    (0x0f0, 0),
    (0x0f4, 0),
    (0x020, 0),
    (0x014, 0x3000_0030),
    (0x018, 0x2800_003f),
    (0x034, 0),
    (0x030, 0),
    (0x010, 0),
];

/// Builds the memory carveouts protecting secure memory.
pub trait Carveouts {
    /// Programs the default set of carveouts.
    fn configure_default_carveouts(&mut self);
}

fn write_block(mmio: &mut impl Mmio, block: &[(usize, u32)]) {
    for &(offset, value) in block {
        mmio.write32(MC_BASE + offset, value);
    }
}

/// Clears the security registers next to the carveouts, resets the security configuration and then
/// has the carveout driver build the default carveouts.
pub fn configure_security(
    mmio: &mut impl Mmio,
    carveouts: &mut impl Carveouts,
) -> Result<(), BootError> {
    write_block(mmio, &SECURITY_BLOCK);
    mmio.write32(MC_SECURITY_CFG0, 0);
    mmio.write32(MC_SECURITY_CFG1, 0);
    mmio.write32_verified_bits(MC_SECURITY_CFG3, SECURITY_CFG3_LOCKED)?;
    carveouts.configure_default_carveouts();
    Ok(())
}

/// Writes the fixed default block.
pub fn write_defaults(mmio: &mut impl Mmio) {
    write_block(mmio, &DEFAULT_BLOCK);
}

/// Rewrites the registers that older key generations expect to be set again after a resume.
pub fn restore_legacy_settings(mmio: &mut impl Mmio) {
    mmio.write32(MC_BASE + 0x65c, 0xffff_f000);
    mmio.write32(MC_BASE + 0x660, 0);
    mmio.modify32(MC_BASE + 0x964, |value| value | 1);
}

/// Returns whether the memory controller has lost its security configuration, which happens when
/// the SoC resumes from deep sleep.
pub fn security_configuration_lost(mmio: &mut impl Mmio) -> bool {
    mmio.read32(MC_SECURITY_CFG3) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::test::{Event, FakeCarveouts, FakeMmio, Trace};

    #[test]
    fn security_block_then_carveouts() {
        let trace = Trace::default();
        let mut mmio = FakeMmio::new(trace.clone());
        let mut carveouts = FakeCarveouts::new(trace.clone());
        mmio.write32(MC_SECURITY_CFG0, 0x55);
        trace.clear();

        configure_security(&mut mmio, &mut carveouts).unwrap();

        let mut expected: Vec<Event> = SECURITY_BLOCK
            .iter()
            .map(|&(offset, value)| Event::Write32(MC_BASE + offset, value))
            .collect();
        expected.extend([
            Event::Write32(MC_SECURITY_CFG0, 0),
            Event::Write32(MC_SECURITY_CFG1, 0),
            Event::Write32(MC_SECURITY_CFG3, 3),
            Event::ConfigureDefaultCarveouts,
        ]);
        assert_eq!(trace.writes_and_calls(), expected);
    }

    #[test]
    fn lock_confirmed_with_latched_upper_bits() {
        let mut mmio = FakeMmio::default();
        let mut carveouts = FakeCarveouts::new(Trace::default());
        mmio.make_sticky(MC_SECURITY_CFG3, 0x100);

        assert_eq!(configure_security(&mut mmio, &mut carveouts), Ok(()));
        assert_eq!(mmio.read32(MC_SECURITY_CFG3), 0x103);
        assert!(!security_configuration_lost(&mut mmio));
    }

    #[test]
    fn default_block_values() {
        let trace = Trace::default();
        let mut mmio = FakeMmio::new(trace.clone());
        write_defaults(&mut mmio);

        let writes = trace.writes_and_calls();
        assert_eq!(writes.len(), 19);
        assert_eq!(writes[0], Event::Write32(0x7001_9228, 0xffff_ffff));
        assert_eq!(writes[4], Event::Write32(0x7001_9b98, 0xffff_ffff));
        assert_eq!(writes[14], Event::Write32(0x7001_9014, 0x3000_0030));
        assert_eq!(writes[15], Event::Write32(0x7001_9018, 0x2800_003f));
        assert_eq!(writes[18], Event::Write32(0x7001_9010, 0));
    }

    #[test]
    fn resume_detection() {
        let mut mmio = FakeMmio::default();
        assert!(security_configuration_lost(&mut mmio));
        mmio.write32(MC_SECURITY_CFG3, SECURITY_CFG3_LOCKED);
        assert!(!security_configuration_lost(&mut mmio));
    }

    #[test]
    fn legacy_settings_keep_other_bits() {
        let mut mmio = FakeMmio::default();
        mmio.write32(MC_BASE + 0x964, 0x80);
        restore_legacy_settings(&mut mmio);
        assert_eq!(mmio.read32(MC_BASE + 0x65c), 0xffff_f000);
        assert_eq!(mmio.read32(MC_BASE + 0x660), 0);
        assert_eq!(mmio.read32(MC_BASE + 0x964), 0x81);
    }
}
