//! RNG module - deterministic randomness for procedural generation
//!
//! A simple LCG (Linear Congruential Generator) using constants from
//! Numerical Recipes. Every random decision in the engine (target picking,
//! row padding, key-sequence placement, challenge selection) flows through
//! one of these, so a seed reproduces a full game.

use token_trap_types::{Attributes, TokenColor, TokenIcon};

/// Simple LCG (Linear Congruential Generator) RNG
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fair coin flip
    pub fn coin_flip(&mut self) -> bool {
        self.next_range(2) == 1
    }

    /// Pick a random element from a non-empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_range(items.len() as u32) as usize]
    }

    /// Random attribute combination (uniform over all 9)
    pub fn attributes(&mut self) -> Attributes {
        let color = *self.pick(&TokenColor::ALL);
        let icon = *self.pick(&TokenIcon::ALL);
        Attributes::new(color, icon)
    }

    /// Get the current RNG state (for restarting with the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
