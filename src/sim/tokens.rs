//! Pairing tokens for ray outcomes
//!
//! Every absorption or border exit consumes one token from a shuffled pool
//! so the player can match entries to their exits. Reflections reuse one
//! constant paint and never draw from the pool.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::TOKEN_POOL_SIZE;
use crate::error::{GameError, Result};

/// A visual pairing token, packed 0xRRGGBB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token(pub u32);

impl Token {
    pub fn rgb(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

/// Paint reserved for rays that reflect back out of their entry slot.
pub const REFLECT_TOKEN: Token = Token(0xFF_FF_FF);

/// Distinct web colors, none of them the reflect white or the board blues.
const PALETTE: [u32; TOKEN_POOL_SIZE] = [
    0xFFA500, 0xFFD700, 0xDAA520, 0x3CB371, 0x40E0D0, 0x6495ED,
    0x00BFFF, 0x8A2BE2, 0xDA70D6, 0xD2691E, 0xFFEBCD, 0xEE82EE,
    0xDC143C, 0x00FF7F, 0x4682B4, 0x9ACD32, 0xFF6347, 0x7FFFD4,
    0xB22222, 0x5F9EA0, 0xFF69B4, 0x8B4513, 0x00CED1, 0x9932CC,
    0xADFF2F, 0xCD5C5C, 0x20B2AA, 0x87CEEB, 0x778899, 0xFFDAB9,
    0x6B8E23, 0xE9967A, 0x483D8B, 0xF0E68C,
];

/// Shuffled stack of unused tokens.
///
/// Popped from the back, move-only, never refilled during a round; a reset
/// replaces the pool wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPool {
    tokens: Vec<Token>,
}

impl TokenPool {
    /// Fresh full pool in shuffled order.
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut tokens: Vec<Token> = PALETTE.iter().copied().map(Token).collect();
        tokens.shuffle(rng);
        Self { tokens }
    }

    /// Take the most recently available token.
    pub fn pop(&mut self) -> Result<Token> {
        self.tokens.pop().ok_or(GameError::PoolExhausted)
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    #[test]
    fn test_palette_is_distinct_and_reserves_white() {
        let unique: HashSet<u32> = PALETTE.iter().copied().collect();
        assert_eq!(unique.len(), TOKEN_POOL_SIZE);
        assert!(!unique.contains(&REFLECT_TOKEN.0));
    }

    #[test]
    fn test_pool_pops_every_token_then_exhausts() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = TokenPool::shuffled(&mut rng);

        let mut seen = HashSet::new();
        for _ in 0..TOKEN_POOL_SIZE {
            seen.insert(pool.pop().expect("pool should not be empty yet"));
        }
        assert_eq!(seen.len(), TOKEN_POOL_SIZE);
        assert_eq!(pool.remaining(), 0);
        assert_eq!(pool.pop(), Err(GameError::PoolExhausted));
    }

    #[test]
    fn test_shuffle_is_seed_deterministic() {
        let mut a = Pcg32::seed_from_u64(11);
        let mut b = Pcg32::seed_from_u64(11);
        assert_eq!(TokenPool::shuffled(&mut a), TokenPool::shuffled(&mut b));

        let mut c = Pcg32::seed_from_u64(12);
        assert_ne!(TokenPool::shuffled(&mut b), TokenPool::shuffled(&mut c));
    }
}
