//! # Deterministic Cell Hash
//!
//! Every generation decision in the maze is a "dice roll" derived from
//! `(seed, x, z, channel)`. The channel discriminates independent rolls
//! taken at the same cell (light presence, table presence, door offset...).
//!
//! ## Determinism Guarantee
//!
//! Given the same `SessionSeed`, `hash_unit` returns **exactly** the same
//! value for the same inputs on any platform, any time. There is no hidden
//! state: the seed is folded into a 32-bit FNV-1a fingerprint once and then
//! mixed with the coordinates using multiply-xor-shift avalanche rounds.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::EntropyError;

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET: u32 = 2_166_136_261;
/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 16_777_619;
/// 2^32, maps a `u32` into `[0, 1)`.
const UNIT_SCALE: f64 = 4_294_967_296.0;

/// Number of random bytes in a freshly created session seed.
pub const SESSION_SEED_BYTES: usize = 12;

/// Hash channels used by the generator.
///
/// Every decision owns a distinct channel so rolls never correlate.
pub mod channel {
    /// First door of a major wall line running along Z.
    pub const MAJOR_X_DOOR_A: u32 = 101;
    /// Whether a major wall line along Z gets a second door.
    pub const MAJOR_X_EXTRA_DOOR: u32 = 102;
    /// Second door of a major wall line along Z.
    pub const MAJOR_X_DOOR_B: u32 = 103;
    /// First door of a major wall line running along X.
    pub const MAJOR_Z_DOOR_A: u32 = 111;
    /// Whether a major wall line along X gets a second door.
    pub const MAJOR_Z_EXTRA_DOOR: u32 = 112;
    /// Second door of a major wall line along X.
    pub const MAJOR_Z_DOOR_B: u32 = 113;

    /// Room rolls for an interior vertical wall.
    pub const INTERIOR_X_PRESENT: u32 = 200;
    /// Style roll for the vertical interior wall.
    pub const INTERIOR_X_STYLE: u32 = 201;
    /// Offset of the vertical interior wall inside the room.
    pub const INTERIOR_X_OFFSET: u32 = 202;
    /// First door of the vertical interior wall.
    pub const INTERIOR_X_DOOR_A: u32 = 203;
    /// Second door of the vertical interior wall.
    pub const INTERIOR_X_DOOR_B: u32 = 204;
    /// Room rolls for an interior horizontal wall.
    pub const INTERIOR_Z_PRESENT: u32 = 210;
    /// Style roll for the horizontal interior wall.
    pub const INTERIOR_Z_STYLE: u32 = 211;
    /// Offset of the horizontal interior wall inside the room.
    pub const INTERIOR_Z_OFFSET: u32 = 212;
    /// First door of the horizontal interior wall.
    pub const INTERIOR_Z_DOOR_A: u32 = 213;
    /// Second door of the horizontal interior wall.
    pub const INTERIOR_Z_DOOR_B: u32 = 214;

    /// Ceiling light on a patch-grid cell.
    pub const LIGHT_PATCH: u32 = 31;
    /// Sparse ceiling light off the patch grid.
    pub const LIGHT_SPARSE: u32 = 37;
    /// Ceiling light intensity.
    pub const LIGHT_INTENSITY: u32 = 43;
    /// Ceiling light flicker phase.
    pub const LIGHT_PHASE: u32 = 47;

    /// Table presence.
    pub const TABLE: u32 = 300;
    /// Table jitter along X.
    pub const TABLE_JITTER_X: u32 = 301;
    /// Table jitter along Z.
    pub const TABLE_JITTER_Z: u32 = 302;
    /// Table yaw.
    pub const TABLE_YAW: u32 = 303;
    /// Table scale.
    pub const TABLE_SCALE: u32 = 304;
    /// Chair presence, one channel per side (`+0..+3`).
    pub const CHAIR_PRESENT: u32 = 310;
    /// Chair yaw wobble, one channel per side (`+0..+3`).
    pub const CHAIR_YAW: u32 = 320;
    /// Chair scale, one channel per side (`+0..+3`).
    pub const CHAIR_SCALE: u32 = 330;

    /// Office lamp presence.
    pub const LAMP: u32 = 340;
    /// Office lamp jitter along X.
    pub const LAMP_JITTER_X: u32 = 341;
    /// Office lamp jitter along Z.
    pub const LAMP_JITTER_Z: u32 = 342;
    /// Office lamp scale.
    pub const LAMP_SCALE: u32 = 343;
    /// Office lamp intensity.
    pub const LAMP_INTENSITY: u32 = 344;
    /// Office lamp flicker phase.
    pub const LAMP_PHASE: u32 = 345;
    /// Whether the office lamp flickers periodically.
    pub const LAMP_FLICKER: u32 = 346;
}

/// Session seed for deterministic generation.
///
/// An opaque string fixed for the lifetime of a play session. All maze
/// content derives from this value and integer cell coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionSeed(String);

impl SessionSeed {
    /// Wraps an existing seed string.
    #[must_use]
    pub fn new(seed: impl Into<String>) -> Self {
        Self(seed.into())
    }

    /// Creates a fresh seed from the operating system RNG.
    ///
    /// The seed is `SESSION_SEED_BYTES` random bytes rendered as lowercase hex.
    ///
    /// # Errors
    ///
    /// Returns `EntropyError` if the platform has no entropy source.
    pub fn random() -> Result<Self, EntropyError> {
        let mut bytes = [0u8; SESSION_SEED_BYTES];
        getrandom::fill(&mut bytes).map_err(|e| EntropyError(e.to_string()))?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Creates a seed from the given RNG (reproducible with a seeded RNG).
    #[must_use]
    pub fn from_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SESSION_SEED_BYTES];
        rng.fill_bytes(&mut bytes);
        Self::from_bytes(&bytes)
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        use fmt::Write as _;

        let mut hex = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    /// Returns the seed string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns at most the first `len` characters of the seed.
    #[must_use]
    pub fn prefix(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }

    /// 32-bit FNV-1a fingerprint of the seed's UTF-16 code units.
    #[must_use]
    pub fn fingerprint(&self) -> u32 {
        self.0.encode_utf16().fold(FNV_OFFSET, |hash, unit| {
            (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
        })
    }

    /// Returns a hasher with the fingerprint pre-computed.
    #[inline]
    #[must_use]
    pub fn hasher(&self) -> CellHasher {
        CellHasher::from_fingerprint(self.fingerprint())
    }
}

impl fmt::Display for SessionSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionSeed {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SessionSeed {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Cell hasher bound to one seed.
///
/// Hashing the seed string on every roll would dominate generation time,
/// so the fingerprint is computed once and the hasher is copied around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellHasher {
    fingerprint: u32,
}

impl CellHasher {
    /// Creates a hasher from a pre-computed seed fingerprint.
    #[inline]
    #[must_use]
    pub const fn from_fingerprint(fingerprint: u32) -> Self {
        Self { fingerprint }
    }

    /// Returns the seed fingerprint.
    #[inline]
    #[must_use]
    pub const fn fingerprint(self) -> u32 {
        self.fingerprint
    }

    /// Uniform value in `[0, 1)` for `(x, z, channel)`.
    #[inline]
    #[must_use]
    pub fn unit(self, x: i32, z: i32, channel: u32) -> f64 {
        let mixed = mix_bits(self.fingerprint, fold(x), fold(z), channel);
        f64::from(mixed) / UNIT_SCALE
    }

    /// Uniform value in `[0, 1)` as `f32`, for geometry attributes.
    #[inline]
    #[must_use]
    pub fn unit_f32(self, x: i32, z: i32, channel: u32) -> f32 {
        self.unit(x, z, channel) as f32
    }
}

/// Hashes `(seed, x, z, channel)` to a uniform value in `[0, 1)`.
///
/// Convenience wrapper; hot loops should hold a `CellHasher` instead.
#[must_use]
pub fn hash_unit(seed: &SessionSeed, x: i32, z: i32, channel: u32) -> f64 {
    seed.hasher().unit(x, z, channel)
}

/// Folds the high half of a coordinate into the low half.
///
/// Negative coordinates are reinterpreted as unsigned first.
#[inline]
const fn fold(value: i32) -> u32 {
    let bits = value as u32;
    bits ^ (bits >> 16)
}

/// Multiply-xor-shift avalanche over four 32-bit lanes.
#[inline]
const fn mix_bits(a: u32, b: u32, c: u32, d: u32) -> u32 {
    let mut x = (a ^ 0x9e37_79b9).wrapping_mul(0x85eb_ca6b);
    x ^= (b ^ 0xc2b2_ae35).wrapping_mul(0x27d4_eb2d);
    x ^= (c ^ 0x1656_67b1).wrapping_mul(0x85eb_ca77);
    x ^= (d ^ 0xd3a2_646c).wrapping_mul(0xc2b2_ae3d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x85eb_ca6b);
    x ^= x >> 13;
    x = x.wrapping_mul(0xc2b2_ae35);
    x ^= x >> 16;
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_determinism() {
        let seed = SessionSeed::new("deadbeef00face55");
        let hasher1 = seed.hasher();
        let hasher2 = SessionSeed::new("deadbeef00face55").hasher();

        for i in -200..200 {
            let x = i * 7;
            let z = i * -13;
            assert_eq!(
                hasher1.unit(x, z, 31),
                hasher2.unit(x, z, 31),
                "Hash should be deterministic"
            );
        }
        assert_eq!(hash_unit(&seed, 3, 4, 300), hasher1.unit(3, 4, 300));
    }

    #[test]
    fn test_range() {
        let hasher = SessionSeed::new("range").hasher();

        let extremes = [i32::MIN, i32::MIN + 1, -1, 0, 1, i32::MAX - 1, i32::MAX];
        for &x in &extremes {
            for &z in &extremes {
                for channel in [0, 31, 300, u32::MAX] {
                    let value = hasher.unit(x, z, channel);
                    assert!((0.0..1.0).contains(&value), "{value} out of range");
                }
            }
        }

        for i in 0..10_000 {
            let value = hasher.unit(i - 5_000, i * 3, 101);
            assert!((0.0..1.0).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let a = SessionSeed::new("a").hasher();
        let b = SessionSeed::new("b").hasher();

        let differing = (0..64).filter(|&i| a.unit(i, i, 31) != b.unit(i, i, 31)).count();
        assert!(differing > 60, "Different seeds should produce different results");
    }

    #[test]
    fn test_channels_are_independent() {
        let hasher = SessionSeed::new("channels").hasher();

        let mut matching = 0;
        for i in 0..1_000 {
            let x = i % 37;
            let z = i / 37;
            let light = hasher.unit(x, z, channel::LIGHT_PATCH) < 0.5;
            let table = hasher.unit(x, z, channel::TABLE) < 0.5;
            if light == table {
                matching += 1;
            }
        }

        // Independent coin flips agree about half the time
        assert!((400..600).contains(&matching), "Channels correlate: {matching}/1000");
    }

    #[test]
    fn test_distribution_is_uniform() {
        let hasher = SessionSeed::new("uniform").hasher();
        let mut bins = [0u32; 10];
        let samples = 100_000;

        for i in 0..samples {
            let value = hasher.unit(i % 317 - 150, i / 317 - 150, 7);
            bins[(value * 10.0) as usize] += 1;
        }

        for (bin, count) in bins.iter().enumerate() {
            let share = f64::from(*count) / f64::from(samples);
            assert!(
                (0.09..0.11).contains(&share),
                "Bin {bin} holds {share:.3} of samples"
            );
        }
    }

    #[test]
    fn test_neighbours_are_uncorrelated() {
        let hasher = SessionSeed::new("neighbours").hasher();
        let mut total_diff = 0.0;
        let samples = 10_000;

        for i in 0..samples {
            let a = hasher.unit(i, 0, 31);
            let b = hasher.unit(i + 1, 0, 31);
            total_diff += (a - b).abs();
        }

        // Mean |a - b| for independent uniforms is 1/3
        let mean = total_diff / f64::from(samples);
        assert!((0.30..0.37).contains(&mean), "Mean neighbour diff {mean:.3}");
    }

    #[test]
    fn test_channel_table_has_no_duplicates() {
        use channel::*;

        let mut all = vec![
            MAJOR_X_DOOR_A,
            MAJOR_X_EXTRA_DOOR,
            MAJOR_X_DOOR_B,
            MAJOR_Z_DOOR_A,
            MAJOR_Z_EXTRA_DOOR,
            MAJOR_Z_DOOR_B,
            INTERIOR_X_PRESENT,
            INTERIOR_X_STYLE,
            INTERIOR_X_OFFSET,
            INTERIOR_X_DOOR_A,
            INTERIOR_X_DOOR_B,
            INTERIOR_Z_PRESENT,
            INTERIOR_Z_STYLE,
            INTERIOR_Z_OFFSET,
            INTERIOR_Z_DOOR_A,
            INTERIOR_Z_DOOR_B,
            LIGHT_PATCH,
            LIGHT_SPARSE,
            LIGHT_INTENSITY,
            LIGHT_PHASE,
            TABLE,
            TABLE_JITTER_X,
            TABLE_JITTER_Z,
            TABLE_YAW,
            TABLE_SCALE,
            LAMP,
            LAMP_JITTER_X,
            LAMP_JITTER_Z,
            LAMP_SCALE,
            LAMP_INTENSITY,
            LAMP_PHASE,
            LAMP_FLICKER,
        ];
        for side in 0..4 {
            all.extend([CHAIR_PRESENT + side, CHAIR_YAW + side, CHAIR_SCALE + side]);
        }

        let count = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), count, "Two decisions share a hash channel");
    }

    #[test]
    fn test_seed_from_rng_is_reproducible() {
        let first = SessionSeed::from_rng(&mut ChaCha8Rng::seed_from_u64(7));
        let second = SessionSeed::from_rng(&mut ChaCha8Rng::seed_from_u64(7));
        let other = SessionSeed::from_rng(&mut ChaCha8Rng::seed_from_u64(8));

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(first.as_str().len(), SESSION_SEED_BYTES * 2);
        assert!(first.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_random_seed_shape() {
        let seed = SessionSeed::random().unwrap();
        assert_eq!(seed.as_str().len(), 24);
        assert_ne!(seed, SessionSeed::random().unwrap(), "Two random sessions should differ");
    }

    #[test]
    fn test_prefix() {
        let seed = SessionSeed::new("deadbeef00face55");
        assert_eq!(seed.prefix(6), "deadbe");
        assert_eq!(SessionSeed::new("abc").prefix(6), "abc");
        assert_eq!(SessionSeed::new("").prefix(6), "");
    }

    #[test]
    fn test_fingerprint_matches_fnv1a() {
        // FNV-1a of the empty string is the offset basis
        assert_eq!(SessionSeed::new("").fingerprint(), FNV_OFFSET);
        // FNV-1a("a") reference value
        assert_eq!(SessionSeed::new("a").fingerprint(), 0xe40c_292c);
    }
}
