pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, RecommendationConfig};
pub use domain::customer::{Customer, CustomerId, Gender};
pub use domain::menu::{AgeGroup, CategoryId, GenderTarget, MenuItem, MenuItemId, Season, Seasonality};
pub use domain::recommendation::{ConfidenceBand, FactorVector, Recommendation};
pub use domain::visit::{CustomerHistory, VisitRecord, VisitWithItem};
pub use domain::TenantId;
pub use engine::{
    CustomerProfile, FactorScorer, Preferences, ProfileAnalyzer, ReasoningGenerator,
    RecommendationEngine, ScoredRecommendation, ScoringWeights, WeightedRanker,
};
pub use errors::{ApplicationError, DomainError};
