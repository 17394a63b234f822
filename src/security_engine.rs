// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Key slot sanitisation and root key derivation on the security engine.

use crate::interrupt::InterruptHandler;
use log::debug;

/// An index into one of the security engine's key slot banks.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct KeySlot(pub u32);

/// The number of AES key slots.
pub const AES_KEYSLOT_COUNT: u32 = 16;
/// The number of RSA key slots.
pub const RSA_KEYSLOT_COUNT: u32 = 2;

/// Holds the intermediate key from which the secure root key is generated.
pub const SRK_GENERATION_KEYSLOT: KeySlot = KeySlot(8);
/// The first AES key slot owned by later boot stages. Every slot below it is general purpose.
pub const SESSION_KEYSLOT: KeySlot = KeySlot(10);
/// Seeds the random number generator.
pub const RNG_KEYSLOT: KeySlot = KeySlot(11);

/// The security engine driver.
pub trait SecurityEngine {
    /// The handler to run when the security engine raises its operation completed interrupt.
    const OPERATION_COMPLETED_HANDLER: InterruptHandler;

    /// Enables or disables context save mode.
    fn set_in_context_save_mode(&mut self, enabled: bool);

    /// Checks the vector stored by the previous boot stage, returning false if it has been
    /// tampered with.
    fn stored_vector_is_valid(&mut self) -> bool;

    /// Clears the given AES key slot. Clearing an already clear slot has no effect.
    fn clear_aes_keyslot(&mut self, slot: KeySlot);

    /// Clears the given RSA key slot. Clearing an already clear slot has no effect.
    fn clear_rsa_keyslot(&mut self, slot: KeySlot);

    /// Seeds the hardware random number generator from the key in `slot`.
    fn initialize_rng(&mut self, slot: KeySlot);

    /// Generates a random key into `destination` with the generator seeded from `rng_slot`.
    fn generate_random_key(&mut self, destination: KeySlot, rng_slot: KeySlot);

    /// Generates the secure root key from the key in `slot`.
    fn generate_srk(&mut self, slot: KeySlot);
}

/// Clears every general purpose AES key slot and every RSA key slot, so that no key material from
/// an earlier boot stage survives.
pub fn clear_stale_keyslots(se: &mut impl SecurityEngine) {
    for slot in (0..SESSION_KEYSLOT.0).map(KeySlot) {
        se.clear_aes_keyslot(slot);
    }
    for slot in (0..RSA_KEYSLOT_COUNT).map(KeySlot) {
        se.clear_rsa_keyslot(slot);
    }
    debug!(
        "Cleared AES key slots 0..{} and RSA key slots 0..{}",
        SESSION_KEYSLOT.0, RSA_KEYSLOT_COUNT
    );
}

/// Seeds the RNG, generates a fresh intermediate key from it and derives the secure root key from
/// that. Each step consumes the slot written by the one before.
pub fn derive_secure_root_key(se: &mut impl SecurityEngine) {
    se.initialize_rng(RNG_KEYSLOT);
    se.generate_random_key(SRK_GENERATION_KEYSLOT, RNG_KEYSLOT);
    se.generate_srk(SRK_GENERATION_KEYSLOT);
}
