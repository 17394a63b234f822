// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Register maps and named operations for the SoC blocks which the boot sequence programs
//! directly.

pub mod apb_misc;
pub mod car;
pub mod flow;
pub mod mc;
pub mod pmc;
pub mod secure_boot;
pub mod sysctr0;
pub mod timers;
pub mod uart;
