//! Entropy sources for panel selection.
//!
//! The selector itself is a pure function; all randomness enters
//! through an [`EntropySource`] owned by the engine. Production uses
//! [`SystemEntropy`]; tests and replay use [`FixedEntropy`].

use chrono::Utc;
use opencourt_types::AccountId;
use sha2::{Digest, Sha256};

/// Domain separator for seed derivation.
const SEED_DOMAIN: &[u8] = b"opencourt:panel_seed:v1:";

/// Supplies the seed for one panel selection.
pub trait EntropySource {
    /// Draw a fresh seed. `caller` is the account that opened the
    /// dispute, mixed in so concurrent callers see different seeds.
    fn draw_seed(&mut self, caller: AccountId) -> u64;
}

/// Production entropy: SHA-256 over the wall clock, OS randomness, and
/// the caller identity.
///
/// **Not manipulation-resistant.** An adversary who controls the host
/// clock and RNG can bias selection; deployments that need adversarial
/// guarantees swap in a VRF or commit-reveal source behind the same
/// trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEntropy;

impl EntropySource for SystemEntropy {
    fn draw_seed(&mut self, caller: AccountId) -> u64 {
        let now_nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(SEED_DOMAIN);
        hasher.update(now_nanos.to_le_bytes());
        hasher.update(rand::random::<u64>().to_le_bytes());
        hasher.update(caller.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

/// Deterministic entropy: always returns the configured seed.
///
/// Used by tests and replay tooling to make panel selection
/// reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy(pub u64);

impl EntropySource for FixedEntropy {
    fn draw_seed(&mut self, _caller: AccountId) -> u64 {
        self.0
    }
}
