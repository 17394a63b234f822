// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

use super::{BuildResult, Builder};
use std::env;

pub struct Tegra210Builder;

impl Tegra210Builder {
    pub const PLAT_NAME: &str = "tegra210";

    /// The secure monitor runs from TZRAM, after the first 64 KiB which hold the boot stage's
    /// scratch data.
    const SECMON_BASE: u64 = 0x7c01_0000;
    const SECMON_SIZE: u64 = 0x0001_0000;

    /// Name of the static library providing the security engine, fuse, memory controller, GIC and
    /// context save drivers.
    const DRIVERS_LIB: &str = "secmon_drivers";
}

impl Builder for Tegra210Builder {
    fn secmon_base(&self) -> u64 {
        Self::SECMON_BASE
    }

    fn secmon_size(&self) -> u64 {
        Self::SECMON_SIZE
    }

    fn configure_build(&self) -> BuildResult {
        println!("cargo:rerun-if-env-changed=SECMON_DRIVERS_DIR");
        let drivers_dir = env::var("SECMON_DRIVERS_DIR")
            .map_err(|_| "SECMON_DRIVERS_DIR must point at the directory holding libsecmon_drivers.a")?;
        println!("cargo:rustc-link-search=native={drivers_dir}");
        println!("cargo:rustc-link-lib=static={}", Self::DRIVERS_LIB);
        Ok(())
    }
}
