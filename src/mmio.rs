// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Access to memory-mapped SoC registers.
//!
//! Everything the boot sequence does to the SoC goes through the [`Mmio`] trait, so that it can be
//! run against a simulated register file in unit tests.

use crate::error::BootError;
use core::ptr::NonNull;
use safe_mmio::{UniqueMmioPointer, fields::ReadWrite};

/// Read and write access to 32-bit memory-mapped registers by physical address.
pub trait Mmio {
    /// Reads the 32-bit register at `address`.
    fn read32(&mut self, address: usize) -> u32;

    /// Writes `value` to the 32-bit register at `address`.
    fn write32(&mut self, address: usize, value: u32);

    /// Writes `value` to the register at `address` and reads it back, returning an error if the
    /// register doesn't hold the value afterwards.
    ///
    /// This must be used for every write which locks something down, so that a rejected or lost
    /// write stops the boot rather than leaving the SoC partially locked.
    fn write32_verified(&mut self, address: usize, value: u32) -> Result<(), BootError> {
        self.write32(address, value);
        let actual = self.read32(address);
        if actual == value {
            Ok(())
        } else {
            Err(BootError::WriteNotConfirmed {
                address,
                expected: value,
                actual,
            })
        }
    }

    /// Writes `value` to the register at `address` and reads it back, returning an error unless
    /// every bit set in `value` is still set.
    ///
    /// This is for lock registers which also hold sticky bits latched by earlier boot stages, so
    /// the read back may have more bits set than were written.
    fn write32_verified_bits(&mut self, address: usize, value: u32) -> Result<(), BootError> {
        self.write32(address, value);
        let actual = self.read32(address);
        if actual & value == value {
            Ok(())
        } else {
            Err(BootError::WriteNotConfirmed {
                address,
                expected: value,
                actual,
            })
        }
    }

    /// Reads the register at `address`, passes the value through `f` and writes back the result.
    fn modify32(&mut self, address: usize, f: impl FnOnce(u32) -> u32) {
        let value = self.read32(address);
        self.write32(address, f(value));
    }
}

/// Direct access to physical addresses, for use with the MMU off or an identity mapping.
pub struct PhysicalMmio {
    _private: (),
}

impl PhysicalMmio {
    /// Creates a new handle for accessing physical memory.
    ///
    /// # Safety
    ///
    /// Every address later passed to `read32` or `write32` must be a non-zero, 4-byte aligned
    /// device register or memory location which is accessible to the current exception level, and
    /// which isn't otherwise aliased by Rust references.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }

    fn register(&mut self, address: usize) -> UniqueMmioPointer<'_, ReadWrite<u32>> {
        // SAFETY: The caller of `PhysicalMmio::new` promised that all addresses used are non-zero,
        // aligned and valid device registers or unaliased memory. The returned pointer borrows
        // `self` mutably, so no other pointer to the register is created while it exists.
        unsafe { UniqueMmioPointer::new(NonNull::new_unchecked(address as *mut ReadWrite<u32>)) }
    }
}

impl Mmio for PhysicalMmio {
    fn read32(&mut self, address: usize) -> u32 {
        self.register(address).read()
    }

    fn write32(&mut self, address: usize, value: u32) {
        self.register(address).write(value);
    }
}
