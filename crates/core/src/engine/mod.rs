//! Personalized menu recommendation pipeline
//!
//! Profile analysis, factor scoring, weighted ranking, and reasoning are
//! separate pure stages connected by explicit data structures, so each stage
//! is testable in isolation.

mod profile;
mod ranking;
mod reasoning;
mod scoring;

pub use profile::{CustomerProfile, Preferences, ProfileAnalyzer};
pub use ranking::{RankedCandidate, ScoringWeights, WeightedRanker};
pub use reasoning::{ReasoningGenerator, DEFAULT_SEPARATOR};
pub use scoring::FactorScorer;

use chrono::{DateTime, Utc};

use crate::config::RecommendationConfig;
use crate::domain::customer::Customer;
use crate::domain::menu::MenuItem;
use crate::domain::recommendation::FactorVector;
use crate::domain::visit::VisitWithItem;
use crate::errors::DomainError;

/// Stand-in average spend (minor units) for customers with no history.
pub const DEFAULT_AVERAGE_PRICE: i64 = 5000;

/// Freshness window for a stored recommendation set.
pub const RECOMMENDATION_TTL_DAYS: i64 = 30;

/// Rows kept per customer when a computation run is persisted.
pub const DEFAULT_TOP_K: usize = 5;

/// Fixed factor weights. Summing to exactly 1.0 is an invariant the ranker
/// enforces.
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    personal_history: 0.30,
    seasonality: 0.15,
    popularity: 0.20,
    price_match: 0.15,
    age_match: 0.10,
    gender_match: 0.10,
};

/// One ranked, explained candidate produced by a computation run.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredRecommendation {
    pub item: MenuItem,
    pub factors: FactorVector,
    pub score: f64,
    pub reasoning: String,
}

/// Composes the four pipeline stages over a candidate catalog for one
/// customer. Stateless and deterministic given identical inputs and `now`.
#[derive(Clone, Debug)]
pub struct RecommendationEngine {
    analyzer: ProfileAnalyzer,
    scorer: FactorScorer,
    ranker: WeightedRanker,
    reasoner: ReasoningGenerator,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {
            analyzer: ProfileAnalyzer::new(DEFAULT_AVERAGE_PRICE as f64),
            scorer: FactorScorer::new(),
            ranker: WeightedRanker::new(),
            reasoner: ReasoningGenerator::new(),
        }
    }

    pub fn from_config(config: &RecommendationConfig) -> Result<Self, DomainError> {
        Ok(Self {
            analyzer: ProfileAnalyzer::new(config.default_average_price as f64),
            scorer: FactorScorer::new(),
            ranker: WeightedRanker::with_weights(config.weights)?,
            reasoner: ReasoningGenerator::with_separator(config.reasoning_separator.clone()),
        })
    }

    /// Scores every candidate and returns the full ranked set, not yet
    /// truncated to K.
    pub fn recommend(
        &self,
        customer: &Customer,
        visits: Vec<VisitWithItem>,
        catalog: &[MenuItem],
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredRecommendation>, DomainError> {
        let profile = self.analyzer.analyze(customer, visits, now);

        let candidates = catalog
            .iter()
            .map(|item| (item.clone(), self.scorer.score(item, &profile, now)))
            .collect::<Vec<_>>();

        let ranked = self.ranker.rank(candidates)?;

        Ok(ranked
            .into_iter()
            .map(|candidate| {
                let reasoning =
                    self.reasoner.generate(&candidate.item, &candidate.factors, &profile);
                ScoredRecommendation {
                    item: candidate.item,
                    factors: candidate.factors,
                    score: candidate.score,
                    reasoning,
                }
            })
            .collect())
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}
