//! Turns the dominant factors of a scored item into a short justification.

use crate::domain::menu::MenuItem;
use crate::domain::recommendation::FactorVector;

use super::profile::CustomerProfile;

const HIGH_SATISFACTION: &str = "a favorite from your past visits";
const PREFERRED_CATEGORY: &str = "in one of your most-booked categories";
const IN_SEASON: &str = "in season right now";
const POPULAR: &str = "popular with other guests";
const PRICE_FIT: &str = "fits your usual price range";
const FALLBACK: &str = "recommended as a new experience";

const PERSONAL_HISTORY_THRESHOLD: f64 = 0.7;
const SEASONALITY_THRESHOLD: f64 = 0.8;
const POPULARITY_THRESHOLD: f64 = 0.7;
const PRICE_MATCH_THRESHOLD: f64 = 0.8;

pub const DEFAULT_SEPARATOR: &str = "; ";

/// Template evaluation order is fixed, so the same factors always produce the
/// same string.
#[derive(Clone, Debug)]
pub struct ReasoningGenerator {
    separator: String,
}

impl ReasoningGenerator {
    pub fn new() -> Self {
        Self { separator: DEFAULT_SEPARATOR.to_owned() }
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self { separator: separator.into() }
    }

    pub fn generate(
        &self,
        item: &MenuItem,
        factors: &FactorVector,
        profile: &CustomerProfile,
    ) -> String {
        let mut parts: Vec<&str> = Vec::new();

        if factors.personal_history > PERSONAL_HISTORY_THRESHOLD {
            parts.push(HIGH_SATISFACTION);
        } else if profile.prefers_category(&item.category_id) {
            parts.push(PREFERRED_CATEGORY);
        }

        if factors.seasonality > SEASONALITY_THRESHOLD {
            parts.push(IN_SEASON);
        }
        if factors.popularity > POPULARITY_THRESHOLD {
            parts.push(POPULAR);
        }
        if factors.price_match > PRICE_MATCH_THRESHOLD {
            parts.push(PRICE_FIT);
        }

        if parts.is_empty() {
            return FALLBACK.to_owned();
        }

        parts.join(&self.separator)
    }
}

impl Default for ReasoningGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::customer::{Customer, CustomerId};
    use crate::domain::menu::{
        AgeGroup, CategoryId, GenderTarget, MenuItemId, Seasonality,
    };
    use crate::domain::TenantId;
    use crate::engine::ProfileAnalyzer;

    fn item(category: &str) -> MenuItem {
        MenuItem {
            id: MenuItemId("cut".into()),
            tenant_id: TenantId("tenant-1".into()),
            category_id: CategoryId(category.into()),
            name: "Cut".into(),
            price: 4000,
            duration_minutes: 60,
            seasonality: Seasonality::All,
            age_group: AgeGroup::All,
            gender_target: GenderTarget::All,
            popularity: 0,
            active: true,
        }
    }

    fn empty_profile() -> CustomerProfile {
        let customer = Customer {
            id: CustomerId("cust-1".into()),
            tenant_id: TenantId("tenant-1".into()),
            name: "Haru".into(),
            birth_date: None,
            gender: None,
        };
        ProfileAnalyzer::new(5000.0).analyze(&customer, Vec::new(), Utc::now())
    }

    #[test]
    fn nothing_triggered_yields_the_fallback_line() {
        let generator = ReasoningGenerator::new();
        let reasoning = generator.generate(&item("cat-cut"), &FactorVector::default(), &empty_profile());
        assert_eq!(reasoning, "recommended as a new experience");
    }

    #[test]
    fn high_personal_history_wins_over_category_line() {
        let generator = ReasoningGenerator::new();
        let mut profile = empty_profile();
        profile.preferences.preferred_categories.push(CategoryId("cat-cut".into()));

        let factors = FactorVector { personal_history: 0.9, ..FactorVector::default() };
        let reasoning = generator.generate(&item("cat-cut"), &factors, &profile);
        assert_eq!(reasoning, "a favorite from your past visits");
    }

    #[test]
    fn preferred_category_line_applies_below_history_threshold() {
        let generator = ReasoningGenerator::new();
        let mut profile = empty_profile();
        profile.preferences.preferred_categories.push(CategoryId("cat-cut".into()));

        let factors = FactorVector { personal_history: 0.3, ..FactorVector::default() };
        let reasoning = generator.generate(&item("cat-cut"), &factors, &profile);
        assert_eq!(reasoning, "in one of your most-booked categories");
    }

    #[test]
    fn triggered_templates_join_in_fixed_order() {
        let generator = ReasoningGenerator::new();
        let factors = FactorVector {
            personal_history: 0.9,
            seasonality: 1.0,
            popularity: 0.8,
            price_match: 0.95,
            ..FactorVector::default()
        };

        let reasoning = generator.generate(&item("cat-cut"), &factors, &empty_profile());
        assert_eq!(
            reasoning,
            "a favorite from your past visits; in season right now; \
             popular with other guests; fits your usual price range"
        );
    }

    #[test]
    fn separator_is_configurable() {
        let generator = ReasoningGenerator::with_separator(" / ");
        let factors = FactorVector {
            seasonality: 1.0,
            popularity: 0.9,
            ..FactorVector::default()
        };

        let reasoning = generator.generate(&item("cat-cut"), &factors, &empty_profile());
        assert_eq!(reasoning, "in season right now / popular with other guests");
    }

    #[test]
    fn threshold_boundaries_are_exclusive() {
        let generator = ReasoningGenerator::new();
        let factors = FactorVector {
            personal_history: 0.7,
            seasonality: 0.8,
            popularity: 0.7,
            price_match: 0.8,
            ..FactorVector::default()
        };

        let reasoning = generator.generate(&item("cat-cut"), &factors, &empty_profile());
        assert_eq!(reasoning, "recommended as a new experience");
    }
}
