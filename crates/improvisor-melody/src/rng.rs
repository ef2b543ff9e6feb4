//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! All randomness in melody generation flows through this module, so a spec
//! seed always produces the same solo.

use improvisor_spec::hash::derive_melody_seed;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Creates the RNG that drives the sequencer for a spec seed.
pub fn melody_rng(spec_seed: u32) -> Pcg32 {
    create_rng(derive_melody_seed(spec_seed))
}
