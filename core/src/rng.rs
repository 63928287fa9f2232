//! Deterministic random number generation for simulated play calling.
//!
//! RULE: Nothing in the simulator may call any platform RNG.
//! All randomness flows through PlayRng instances derived from the
//! single seed stored on the game record.
//!
//! Each concern gets its own stream, seeded from (seed XOR slot index),
//! so adding a stream never shifts the numbers an existing one draws.
//! The clock core itself never draws random numbers.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct PlayRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl PlayRng {
    /// The slot index must never change once assigned.
    pub fn new(seed: u64, slot_index: u64) -> Self {
        let derived_seed = seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n). Returns 0 when n is 0.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform integer in [lo, hi]. Swapped bounds are reordered.
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let span = (hi as i64 - lo as i64 + 1) as u64;
        (lo as i64 + self.next_u64_below(span) as i64) as i32
    }
}

/// Every stream for one game, handed out by stable slot.
pub struct RngBank {
    seed: u64,
}

impl RngBank {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn for_slot(&self, slot: RngSlot) -> PlayRng {
        PlayRng::new(self.seed, slot as u64).with_name(slot.name())
    }
}

/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngSlot {
    PlayCalling = 0,
    Yardage = 1,
    Timing = 2,
}

impl RngSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayCalling => "play_calling",
            Self::Yardage => "yardage",
            Self::Timing => "timing",
        }
    }
}
