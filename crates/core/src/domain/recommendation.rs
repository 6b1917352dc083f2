use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::customer::CustomerId;
use super::menu::MenuItemId;
use super::TenantId;
use crate::errors::DomainError;

/// Six independent affinity scores, each in [0,1]. Persisted alongside the
/// recommendation as JSON so the ranking stays explainable after the fact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorVector {
    pub personal_history: f64,
    pub seasonality: f64,
    pub popularity: f64,
    pub price_match: f64,
    pub age_match: f64,
    pub gender_match: f64,
}

impl FactorVector {
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("personal_history", self.personal_history),
            ("seasonality", self.seasonality),
            ("popularity", self.popularity),
            ("price_match", self.price_match),
            ("age_match", self.age_match),
            ("gender_match", self.gender_match),
        ]
    }

    /// A factor outside [0,1] after clamping is a programming defect, not a
    /// data problem, and must surface instead of silently corrupting rank
    /// order.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (factor, value) in self.entries() {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(DomainError::FactorOutOfRange { factor, value });
            }
        }
        Ok(())
    }
}

/// Coarse display bucket derived from the combined score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Self::High
        } else if score > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One row of a customer's current recommendation set. All rows of a set
/// share `batch_id` and `expires_at`; the set is replaced atomically on each
/// recomputation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    pub menu_item_id: MenuItemId,
    pub batch_id: Uuid,
    pub position: u32,
    pub score: f64,
    pub reasoning: String,
    pub factors: FactorVector,
    pub expires_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn confidence(&self) -> ConfidenceBand {
        ConfidenceBand::from_score(self.score)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_band_thresholds() {
        assert_eq!(ConfidenceBand::from_score(0.71), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(0.7), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(0.41), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(0.4), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_score(0.0), ConfidenceBand::Low);
    }

    #[test]
    fn factor_vector_rejects_out_of_range_values() {
        let ok = FactorVector { personal_history: 0.9, ..FactorVector::default() };
        assert!(ok.validate().is_ok());

        let bad = FactorVector { popularity: 2.5, ..FactorVector::default() };
        let err = bad.validate().unwrap_err();
        assert_eq!(
            err,
            crate::errors::DomainError::FactorOutOfRange { factor: "popularity", value: 2.5 }
        );
    }

    #[test]
    fn factor_vector_serializes_with_named_fields() {
        let factors = FactorVector { price_match: 1.0, ..FactorVector::default() };
        let json = serde_json::to_value(&factors).unwrap();
        assert_eq!(json["price_match"], 1.0);
        assert_eq!(json["gender_match"], 0.0);
    }
}
