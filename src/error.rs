// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Errors which abort the boot.
//!
//! None of these are recoverable: the lockdown either completes in full or the core halts without
//! ever handing over to the non-secure world.

use thiserror::Error;

/// A failure to bring the SoC into its secure state.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum BootError {
    /// The security engine's stored vector failed validation, so the key material it was derived
    /// from cannot be trusted.
    #[error("Security engine stored vector is corrupt")]
    CorruptStoredVector,
    /// A security-critical register did not hold the value written to it.
    #[error("Write of {expected:#010x} to {address:#x} not confirmed, read back {actual:#010x}")]
    WriteNotConfirmed {
        /// Physical address of the register.
        address: usize,
        /// The value written.
        expected: u32,
        /// The value read back.
        actual: u32,
    },
    /// The fuses report a key generation which this firmware doesn't know the policy for.
    #[error("Unsupported key generation {0}")]
    UnsupportedKeyGeneration(u32),
    /// The warm boot entry point can't be expressed in the 32-bit reset vector registers.
    #[error("Warm boot entry point {0:#x} is out of range of the reset vector")]
    ResetVectorOutOfRange(usize),
}
