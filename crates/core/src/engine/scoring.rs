//! Per-factor scoring rules for a single candidate item against a profile.

use chrono::{DateTime, Datelike, Utc};

use super::profile::CustomerProfile;
use crate::domain::menu::{AgeGroup, GenderTarget, MenuItem, Season};
use crate::domain::recommendation::FactorVector;

/// Score for a preferred-category item the customer has not tried yet.
const UNSEEN_PREFERRED_CATEGORY: f64 = 0.8;
/// Score for an unseen item outside the preferred categories.
const UNSEEN_OTHER_CATEGORY: f64 = 0.3;
/// Rating assumed when a visit carries no satisfaction.
const DEFAULT_SATISFACTION: f64 = 3.0;
/// Seasonality score for an off-season item.
const OFF_SEASON: f64 = 0.3;
/// Popularity counters are maintained externally and unbounded; this is the
/// normalization denominator.
const POPULARITY_SCALE: f64 = 100.0;
/// Neutral score when a demographic signal is unknown or the item does not
/// target one.
const NEUTRAL_DEMOGRAPHIC: f64 = 0.7;
/// Score for a demographic mismatch on a targeted item.
const AGE_MISMATCH: f64 = 0.3;
const GENDER_MISMATCH: f64 = 0.2;
/// Price-match score when the customer has no usable price signal.
const NO_PRICE_SIGNAL: f64 = 0.5;

/// Computes the six factor scores. Pure; `now` only selects the current
/// season.
#[derive(Clone, Copy, Debug, Default)]
pub struct FactorScorer;

impl FactorScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(
        &self,
        item: &MenuItem,
        profile: &CustomerProfile,
        now: DateTime<Utc>,
    ) -> FactorVector {
        FactorVector {
            personal_history: self.personal_history(item, profile),
            seasonality: self.seasonality(item, now),
            popularity: self.popularity(item),
            price_match: self.price_match(item, profile),
            age_match: self.age_match(item, profile),
            gender_match: self.gender_match(item, profile),
        }
    }

    /// Repeat visits score by mean satisfaction; unseen items by category
    /// affinity.
    fn personal_history(&self, item: &MenuItem, profile: &CustomerProfile) -> f64 {
        let ratings: Vec<f64> = profile
            .visits
            .iter()
            .filter(|v| v.visit.menu_item_id == item.id)
            .map(|v| v.visit.satisfaction.map(f64::from).unwrap_or(DEFAULT_SATISFACTION))
            .collect();

        if !ratings.is_empty() {
            let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
            (mean / 5.0).clamp(0.0, 1.0)
        } else if profile.prefers_category(&item.category_id) {
            UNSEEN_PREFERRED_CATEGORY
        } else {
            UNSEEN_OTHER_CATEGORY
        }
    }

    fn seasonality(&self, item: &MenuItem, now: DateTime<Utc>) -> f64 {
        if item.seasonality.matches(Season::from_month(now.month())) {
            1.0
        } else {
            OFF_SEASON
        }
    }

    /// Normalized visit counter. Clamped at 1.0: the raw counter is unbounded
    /// and a >100 value must not let one factor dominate beyond its weight.
    fn popularity(&self, item: &MenuItem) -> f64 {
        (item.popularity.max(0) as f64 / POPULARITY_SCALE).clamp(0.0, 1.0)
    }

    /// Linear falloff reaching zero at a 50% deviation from the customer's
    /// average spend.
    fn price_match(&self, item: &MenuItem, profile: &CustomerProfile) -> f64 {
        let average = profile.preferences.average_price;
        if average <= 0.0 {
            return NO_PRICE_SIGNAL;
        }

        let deviation = (item.price as f64 - average).abs() / (average * 0.5);
        (1.0 - deviation).clamp(0.0, 1.0)
    }

    fn age_match(&self, item: &MenuItem, profile: &CustomerProfile) -> f64 {
        match profile.age {
            Some(age) if item.age_group != AgeGroup::All => {
                if item.age_group.contains(age) {
                    1.0
                } else {
                    AGE_MISMATCH
                }
            }
            _ => NEUTRAL_DEMOGRAPHIC,
        }
    }

    fn gender_match(&self, item: &MenuItem, profile: &CustomerProfile) -> f64 {
        match profile.gender {
            Some(gender) if item.gender_target != GenderTarget::All => {
                if item.gender_target.matches(gender) {
                    1.0
                } else {
                    GENDER_MISMATCH
                }
            }
            _ => NEUTRAL_DEMOGRAPHIC,
        }
    }
}
