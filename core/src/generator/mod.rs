use alloc::vec::Vec;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::*;
pub use shuffle::*;

mod shuffle;

/// Symbols used when no custom catalog is configured, in deal order.
pub const DEFAULT_SYMBOLS: [&str; 16] = [
    "🎮", "🎯", "🎨", "🎭", "🎪", "🎸", "🎲", "🎰", "🎺", "🎻", "🎹", "🎳", "🎬", "🎤", "🎧", "🎷",
];

/// Ordered list of distinct card faces, large enough for every difficulty.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    symbols: &'static [&'static str],
}

impl Catalog {
    pub fn new(symbols: &'static [&'static str]) -> Result<Self> {
        let required = Difficulty::max_pair_count() as usize;
        if symbols.len() < required {
            return Err(GameError::CatalogTooSmall {
                available: symbols.len(),
                required,
            });
        }

        for (index, symbol) in symbols.iter().enumerate() {
            if symbols[..index].contains(symbol) {
                return Err(GameError::DuplicateToken { index });
            }
        }

        Ok(Self { symbols })
    }

    /// The symbols dealt for `difficulty`, always a prefix of the catalog.
    pub fn symbols_for(&self, difficulty: Difficulty) -> &'static [&'static str] {
        &self.symbols[..difficulty.pair_count() as usize]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            symbols: &DEFAULT_SYMBOLS,
        }
    }
}

/// Builds the paired deck for `difficulty`: ids `2k` and `2k + 1` share the
/// k-th symbol, then the whole deck is shuffled.
pub fn build_deck<R: Rng>(
    catalog: &Catalog,
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<Card> {
    let mut ordered = Vec::with_capacity(difficulty.card_count() as usize);
    for (index, &symbol) in catalog.symbols_for(difficulty).iter().enumerate() {
        let first = (index * 2) as CardId;
        ordered.push(Card::new(first, symbol));
        ordered.push(Card::new(first + 1, symbol));
    }

    shuffle(&ordered, rng)
}

pub trait DeckGenerator {
    fn generate(&mut self, catalog: &Catalog, difficulty: Difficulty) -> Vec<Card>;
}

/// Seeded generator, every deck it deals continues the same random stream.
#[derive(Clone, Debug)]
pub struct RandomDeckGenerator {
    rng: SmallRng,
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate(&mut self, catalog: &Catalog, difficulty: Difficulty) -> Vec<Card> {
        let deck = build_deck(catalog, difficulty, &mut self.rng);
        log::debug!("dealt {} cards for {}", deck.len(), difficulty);
        deck
    }
}
