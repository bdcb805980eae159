//! Seed-string hashing and the random stream every generation run draws from.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use xxhash_rust::xxh3::xxh3_64;

/// Collapse a caller-facing seed string into the numeric seed the engine
/// uses. Any UTF-8 string is a valid seed, including the empty string.
pub fn area_seed(seed: &str) -> u64 {
    xxh3_64(seed.as_bytes())
}

/// The single random stream for one generation run. Phases draw from it in
/// a fixed pipeline order and nothing reseeds mid-run, so equal seed strings
/// reproduce equal areas.
pub fn area_rng(seed: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(area_seed(seed))
}
