//! Motivational quotes shown after each recorded event.
//!
//! The choice is cosmetic, so it sits behind [`QuoteSource`] and callers
//! pass whichever source they like into [`crate::Ledger::record_event`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Built-in quote pool
pub const DEFAULT_QUOTES: [&str; 5] = [
    "Success is not final, failure is not fatal: It is the courage to continue that counts.",
    "The secret of getting ahead is getting started.",
    "Don't watch the clock; do what it does. Keep going.",
    "Believe you can and you're halfway there.",
    "You don't have to be great to start, but you have to start to be great.",
];

/// Source of the quote attached to an event report
pub trait QuoteSource {
    fn pick(&mut self) -> String;
}

/// Uniform random choice from a pool
pub struct RandomQuotes {
    pool: Vec<String>,
    rng: StdRng,
}

impl RandomQuotes {
    /// Random source seeded from the OS
    pub fn new(pool: Vec<String>) -> Self {
        Self {
            pool,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for reproducible runs
    pub fn seeded(pool: Vec<String>, seed: u64) -> Self {
        Self {
            pool,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_default_pool() -> Self {
        Self::new(DEFAULT_QUOTES.iter().map(|q| q.to_string()).collect())
    }
}

impl QuoteSource for RandomQuotes {
    fn pick(&mut self) -> String {
        self.pool.choose(&mut self.rng).cloned().unwrap_or_default()
    }
}

/// Always returns the same quote
#[derive(Clone, Debug)]
pub struct FixedQuote(pub String);

impl FixedQuote {
    pub fn new(quote: impl Into<String>) -> Self {
        Self(quote.into())
    }
}

impl QuoteSource for FixedQuote {
    fn pick(&mut self) -> String {
        self.0.clone()
    }
}
