use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Color, ColorPolicy, Piece, PieceKind};

/// Draws new pieces uniformly from the catalog.
///
/// Kind and color are sampled independently unless the [`ColorPolicy`] ties
/// the color to the kind. The generator is part of the game state, so cloning
/// a state also forks its random stream.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ColorPolicy, GameSeed, PieceGenerator};
///
/// let seed: GameSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut a = PieceGenerator::with_seed(seed, ColorPolicy::Independent);
/// let mut b = PieceGenerator::with_seed(seed, ColorPolicy::Independent);
/// assert_eq!(a.next_piece(10), b.next_piece(10));
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
    color_policy: ColorPolicy,
}

impl PieceGenerator {
    /// Creates a generator whose output is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: GameSeed, color_policy: ColorPolicy) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            color_policy,
        }
    }

    /// Draws a piece placed at the spawn position of a `board_width` wide board.
    pub fn next_piece(&mut self, board_width: usize) -> Piece {
        let kind: PieceKind = self.rng.random();
        let color = match self.color_policy {
            ColorPolicy::Independent => self.rng.random::<Color>(),
            ColorPolicy::ByKind => kind.canonical_color(),
        };
        Piece::new(kind, color).spawned(board_width)
    }

    /// Derives a seed for a follow-up session from this generator's stream.
    pub fn next_seed(&mut self) -> GameSeed {
        self.rng.random()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed written as 32 hex digits. The same seed and the same action
/// sequence replay the same game.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameSeed;
/// use rand::Rng as _;
///
/// let seed: GameSeed = rand::rng().random();
/// let parsed: GameSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSeed([u8; 16]);

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for GameSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(invalid());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| invalid())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `GameSeed` values with `rng.random()`.
impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}
