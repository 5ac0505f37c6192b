//! Weighted rest lengths for the random melody.
//!
//! After each note the player waits a whole number of beats drawn from a
//! small discrete distribution. The standard one mostly rests two beats,
//! sometimes one, and occasionally holds back for four or eight.

use rand::{
    distr::{weighted::WeightedIndex, Distribution},
    Rng,
};
use std::{fmt, time::Duration};

/// Length of one beat.
pub const BEAT: Duration = Duration::from_millis(250);

/// `(beats, probability)` pairs of the standard distribution.
pub const STANDARD_RESTS: [(u32, f64); 4] = [(1, 0.15), (2, 0.70), (4, 0.10), (8, 0.05)];

/// Discrete distribution over rest lengths in beats.
#[derive(Debug, Clone)]
pub struct RestDistribution {
    choices: Vec<(u32, f64)>,
    index: WeightedIndex<f64>,
}

impl RestDistribution {
    /// Build a distribution from `(beats, weight)` pairs.
    ///
    /// Weights need not sum to one, but must be non-negative with a
    /// positive total.
    pub fn new(choices: &[(u32, f64)]) -> Result<Self, RestError> {
        let index = WeightedIndex::new(choices.iter().map(|&(_, weight)| weight))
            .map_err(|err| RestError(err.to_string()))?;
        Ok(Self {
            choices: choices.to_vec(),
            index,
        })
    }

    /// 1, 2, 4 or 8 beats with probabilities 0.15, 0.70, 0.10, 0.05.
    pub fn standard() -> Self {
        // The standard table is non-empty with positive weights.
        Self::new(&STANDARD_RESTS).expect("standard rest weights are valid")
    }

    /// Draw a rest length in beats.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        self.choices[self.index.sample(rng)].0
    }

    pub fn choices(&self) -> &[(u32, f64)] {
        &self.choices
    }
}

impl Default for RestDistribution {
    fn default() -> Self {
        Self::standard()
    }
}

/// Rejected rest weights
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestError(String);

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid rest weights: {}", self.0)
    }
}

impl std::error::Error for RestError {}
