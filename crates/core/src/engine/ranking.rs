//! Combines factor vectors into one ranked score per candidate.

use serde::{Deserialize, Serialize};

use crate::domain::menu::MenuItem;
use crate::domain::recommendation::FactorVector;
use crate::errors::DomainError;

/// Weight sums within this distance of 1.0 count as exact; anything further
/// is a programming defect.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub personal_history: f64,
    pub seasonality: f64,
    pub popularity: f64,
    pub price_match: f64,
    pub age_match: f64,
    pub gender_match: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.personal_history
            + self.seasonality
            + self.popularity
            + self.price_match
            + self.age_match
            + self.gender_match
    }

    /// The weights must sum to exactly 1.0 so the combined score inherits the
    /// [0,1] range from clamped factors.
    pub fn validate(&self) -> Result<(), DomainError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(DomainError::InvalidWeights { sum });
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// One candidate after ranking, before reasoning is attached.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedCandidate {
    pub item: MenuItem,
    pub factors: FactorVector,
    pub score: f64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedRanker {
    weights: ScoringWeights,
}

impl WeightedRanker {
    pub fn new() -> Self {
        Self { weights: ScoringWeights::default() }
    }

    pub fn with_weights(weights: ScoringWeights) -> Result<Self, DomainError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn combined_score(&self, factors: &FactorVector) -> Result<f64, DomainError> {
        factors.validate()?;
        Ok(factors.personal_history * self.weights.personal_history
            + factors.seasonality * self.weights.seasonality
            + factors.popularity * self.weights.popularity
            + factors.price_match * self.weights.price_match
            + factors.age_match * self.weights.age_match
            + factors.gender_match * self.weights.gender_match)
    }

    /// Full candidate set sorted descending by combined score. The sort is
    /// stable: equal scores keep input order.
    pub fn rank(
        &self,
        candidates: Vec<(MenuItem, FactorVector)>,
    ) -> Result<Vec<RankedCandidate>, DomainError> {
        self.weights.validate()?;

        let mut ranked = candidates
            .into_iter()
            .map(|(item, factors)| {
                let score = self.combined_score(&factors)?;
                Ok(RankedCandidate { item, factors, score })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::{AgeGroup, CategoryId, GenderTarget, MenuItemId, Seasonality};
    use crate::domain::TenantId;

    fn item(id: &str) -> MenuItem {
        MenuItem {
            id: MenuItemId(id.into()),
            tenant_id: TenantId("tenant-1".into()),
            category_id: CategoryId("cat-cut".into()),
            name: id.into(),
            price: 4000,
            duration_minutes: 60,
            seasonality: Seasonality::All,
            age_group: AgeGroup::All,
            gender_target: GenderTarget::All,
            popularity: 0,
            active: true,
        }
    }

    fn uniform(value: f64) -> FactorVector {
        FactorVector {
            personal_history: value,
            seasonality: value,
            popularity: value,
            price_match: value,
            age_match: value,
            gender_match: value,
        }
    }

    #[test]
    fn default_weights_sum_to_one() {
        assert!(ScoringWeights::default().validate().is_ok());
        assert!((ScoringWeights::default().sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_weights_are_rejected_loudly() {
        let weights = ScoringWeights { personal_history: 0.5, ..ScoringWeights::default() };
        let err = WeightedRanker::with_weights(weights).unwrap_err();
        assert!(matches!(err, DomainError::InvalidWeights { .. }));
    }

    #[test]
    fn combined_score_applies_documented_weights() {
        let ranker = WeightedRanker::new();
        let factors = FactorVector {
            personal_history: 1.0,
            seasonality: 0.0,
            popularity: 0.5,
            price_match: 0.0,
            age_match: 0.0,
            gender_match: 0.0,
        };

        // 1.0*0.30 + 0.5*0.20 = 0.40
        let score = ranker.combined_score(&factors).unwrap();
        assert!((score - 0.40).abs() < 1e-9);
    }

    #[test]
    fn combined_score_stays_in_unit_range_for_unit_factors() {
        let ranker = WeightedRanker::new();
        assert!((ranker.combined_score(&uniform(1.0)).unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(ranker.combined_score(&uniform(0.0)).unwrap(), 0.0);
    }

    #[test]
    fn out_of_range_factors_refuse_to_rank() {
        let ranker = WeightedRanker::new();
        let bad = FactorVector { popularity: 1.7, ..uniform(0.5) };
        assert!(matches!(
            ranker.combined_score(&bad),
            Err(DomainError::FactorOutOfRange { factor: "popularity", .. })
        ));
    }

    #[test]
    fn ranking_sorts_descending_and_keeps_input_order_on_ties() {
        let ranker = WeightedRanker::new();
        let candidates = vec![
            (item("low"), uniform(0.2)),
            (item("tie-first"), uniform(0.5)),
            (item("high"), uniform(0.9)),
            (item("tie-second"), uniform(0.5)),
        ];

        let ranked = ranker.rank(candidates).unwrap();
        let order: Vec<&str> = ranked.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(order, vec!["high", "tie-first", "tie-second", "low"]);
        assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }
}
