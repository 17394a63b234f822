// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

mod tegra210;

use std::{error::Error, path::Path};
use tegra210::Tegra210Builder;

pub const PLATFORMS: [&str; 1] = [Tegra210Builder::PLAT_NAME];

type BuildResult = Result<(), Box<dyn Error>>;

pub trait Builder {
    /// Base address of the secure monitor image.
    ///
    /// This is passed to the linker script through the `SECMON_BASE` symbol.
    fn secmon_base(&self) -> u64;

    /// Size of the memory region the secure monitor image may occupy.
    ///
    /// This is passed to the linker script through the `SECMON_SIZE` symbol.
    fn secmon_size(&self) -> u64;

    /// Sets up platform-specific configuration, such as the libraries to link against.
    fn configure_build(&self) -> BuildResult {
        Ok(())
    }
}

pub fn get_builder(platform: &str) -> Result<Box<dyn Builder>, Box<dyn Error>> {
    match platform {
        Tegra210Builder::PLAT_NAME => Ok(Box::new(Tegra210Builder)),
        _ => Err(format!(
            "Unexpected platform name {platform:?}. Supported platforms: {PLATFORMS:?}"
        )
        .into()),
    }
}

pub fn add_linker_script(path: &Path) {
    println!("cargo:rustc-link-arg=-T{}", path.display());
    println!("cargo:rerun-if-changed={}", path.display());
}

pub fn define_linker_symbol(name: &str, value: u64) {
    println!("cargo:rustc-link-arg=--defsym={name}={value}");
}
