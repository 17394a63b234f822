// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Device identity read from fuses and config items, which selects the lockdown policy.

use crate::error::BootError;
use num_enum::{FromPrimitive, TryFromPrimitive};

/// The fuse and config item reader.
pub trait Fuses {
    /// Initialises the fuse block. This must be called before anything else is read.
    fn init(&mut self);

    /// Returns the raw hardware type config item.
    fn hardware_type_raw(&mut self) -> u64;

    /// Returns the raw master key revision burnt into the fuses.
    fn key_generation_raw(&mut self) -> u32;
}

/// The board a SoC was fitted to.
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
#[repr(u64)]
pub enum HardwareType {
    /// First generation retail unit.
    Icosa = 0,
    /// Development and reference unit.
    Copper = 1,
    /// Handheld-only retail unit.
    Hoag = 2,
    /// Second generation retail unit.
    Iowa = 3,
    /// Any board this firmware doesn't know by name.
    #[num_enum(catch_all)]
    Unknown(u64),
}

impl HardwareType {
    /// Returns whether this is a development unit, rather than one sold at retail.
    pub fn is_development_unit(self) -> bool {
        self == Self::Copper
    }
}

/// The master key revision, which only ever increases over the life of a device.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, TryFromPrimitive)]
#[repr(u32)]
pub enum KeyGeneration {
    V1_0_0 = 0,
    V3_0_0 = 1,
    V3_0_1 = 2,
    V4_0_0 = 3,
    V5_0_0 = 4,
    V6_0_0 = 5,
    V6_2_0 = 6,
}

impl KeyGeneration {
    /// The first key generation with the extended lockdown policy.
    pub const EXTENDED_POLICY: Self = Self::V4_0_0;

    /// Returns whether the extended lockdown policy applies to this key generation.
    pub fn has_extended_policy(self) -> bool {
        self >= Self::EXTENDED_POLICY
    }
}

/// Reads the hardware type.
pub fn hardware_type(fuses: &mut impl Fuses) -> HardwareType {
    HardwareType::from_primitive(fuses.hardware_type_raw())
}

/// Reads the key generation, failing if it isn't one this firmware knows about.
pub fn key_generation(fuses: &mut impl Fuses) -> Result<KeyGeneration, BootError> {
    let raw = fuses.key_generation_raw();
    KeyGeneration::try_from(raw).map_err(|_| BootError::UnsupportedKeyGeneration(raw))
}
