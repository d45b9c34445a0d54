//! Seeded random streams for card draws.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;

/// Domain tag for the deck roll stream.
pub const DECK_STREAM: &[u8] = b"deck";

/// RNG wrapper that counts how many draws were taken from the stream.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    /// Stream derived from a user-visible seed and a domain tag.
    #[must_use]
    pub fn from_user_seed(seed: u64, domain_tag: &[u8]) -> Self {
        Self::wrap(SmallRng::seed_from_u64(derive_stream_seed(seed, domain_tag)))
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    pub const fn wrap(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// HMAC-SHA256 the seed with a domain tag so every stream is independent.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
