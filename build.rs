// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Build script for the secure monitor.

mod platforms;

use platforms::{Builder, PLATFORMS, add_linker_script, define_linker_symbol, get_builder};
use std::{env, path::Path};

fn setup_linker(builder: &dyn Builder) {
    define_linker_symbol("SECMON_BASE", builder.secmon_base());
    define_linker_symbol("SECMON_SIZE", builder.secmon_size());
    add_linker_script(Path::new("secmon.ld"));
}

fn main() {
    println!(
        "cargo::rustc-check-cfg=cfg(platform, values(\"{}\"))",
        PLATFORMS.join("\", \""),
    );
    println!("cargo:rerun-if-env-changed=LOG_LEVEL");

    if env::var("CARGO_CFG_TARGET_OS").unwrap() == "none" {
        let platform = env::var("CARGO_CFG_PLATFORM").expect("Missing platform name");

        let platform_builder = get_builder(&platform).unwrap();

        platform_builder.configure_build().unwrap();

        setup_linker(&*platform_builder);
    }
}
