//! Derives a compact behavioral profile from a customer's visit history.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};

use crate::domain::customer::{Customer, Gender};
use crate::domain::menu::{CategoryId, Season};
use crate::domain::visit::VisitWithItem;

/// How many preferred categories the profile keeps.
const PREFERRED_CATEGORY_COUNT: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct Preferences {
    /// Mean price of historical visits, in minor units; the configured
    /// default when the customer has no history.
    pub average_price: f64,
    /// Top categories by visit count, ties kept in first-visited order.
    pub preferred_categories: Vec<CategoryId>,
    /// Visit count per calendar season.
    pub seasonal_trends: HashMap<Season, u32>,
}

/// Derived scoring input; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerProfile {
    /// None when the birth date is unknown. Downstream treats this as
    /// "unknown", never as zero.
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub visits: Vec<VisitWithItem>,
    pub preferences: Preferences,
}

impl CustomerProfile {
    pub fn prefers_category(&self, category: &CategoryId) -> bool {
        self.preferences.preferred_categories.contains(category)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ProfileAnalyzer {
    default_average_price: f64,
}

impl ProfileAnalyzer {
    pub fn new(default_average_price: f64) -> Self {
        Self { default_average_price }
    }

    /// Pure function of its inputs; `now` only feeds the age computation.
    pub fn analyze(
        &self,
        customer: &Customer,
        visits: Vec<VisitWithItem>,
        now: DateTime<Utc>,
    ) -> CustomerProfile {
        let age = customer
            .birth_date
            .map(|birth| (now.year() - birth.year()).max(0) as u32);

        let average_price = if visits.is_empty() {
            self.default_average_price
        } else {
            visits.iter().map(|v| v.item.price as f64).sum::<f64>() / visits.len() as f64
        };

        let preferred_categories = preferred_categories(&visits);

        let mut seasonal_trends: HashMap<Season, u32> = HashMap::new();
        for visit in &visits {
            let season = Season::from_month(visit.visit.visit_date.month());
            *seasonal_trends.entry(season).or_insert(0) += 1;
        }

        CustomerProfile {
            age,
            gender: customer.gender,
            visits,
            preferences: Preferences { average_price, preferred_categories, seasonal_trends },
        }
    }
}

fn preferred_categories(visits: &[VisitWithItem]) -> Vec<CategoryId> {
    // First-encountered order is the tiebreak, so counts accumulate in a Vec
    // rather than a map.
    let mut counts: Vec<(CategoryId, u32)> = Vec::new();
    for visit in visits {
        let category = &visit.item.category_id;
        match counts.iter_mut().find(|(existing, _)| existing == category) {
            Some((_, count)) => *count += 1,
            None => counts.push((category.clone(), 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(PREFERRED_CATEGORY_COUNT).map(|(category, _)| category).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::domain::customer::CustomerId;
    use crate::domain::menu::{AgeGroup, GenderTarget, MenuItem, MenuItemId, Seasonality};
    use crate::domain::visit::VisitRecord;
    use crate::domain::TenantId;

    fn customer(birth_date: Option<NaiveDate>) -> Customer {
        Customer {
            id: CustomerId("cust-1".into()),
            tenant_id: TenantId("tenant-1".into()),
            name: "Haru".into(),
            birth_date,
            gender: Some(Gender::Female),
        }
    }

    fn item(id: &str, category: &str, price: i64) -> MenuItem {
        MenuItem {
            id: MenuItemId(id.into()),
            tenant_id: TenantId("tenant-1".into()),
            category_id: CategoryId(category.into()),
            name: id.into(),
            price,
            duration_minutes: 60,
            seasonality: Seasonality::All,
            age_group: AgeGroup::All,
            gender_target: GenderTarget::All,
            popularity: 0,
            active: true,
        }
    }

    fn visit(item: MenuItem, month: u32) -> VisitWithItem {
        let visit_date = Utc.with_ymd_and_hms(2026, month, 10, 12, 0, 0).unwrap();
        VisitWithItem {
            visit: VisitRecord {
                id: format!("visit-{}-{month}", item.id.as_str()),
                tenant_id: item.tenant_id.clone(),
                customer_id: CustomerId("cust-1".into()),
                menu_item_id: item.id.clone(),
                visit_date,
                satisfaction: None,
                notes: None,
            },
            item,
        }
    }

    #[test]
    fn no_history_falls_back_to_default_average_price() {
        let analyzer = ProfileAnalyzer::new(5000.0);
        let profile = analyzer.analyze(&customer(None), Vec::new(), Utc::now());

        assert_eq!(profile.preferences.average_price, 5000.0);
        assert!(profile.preferences.preferred_categories.is_empty());
        assert!(profile.preferences.seasonal_trends.is_empty());
    }

    #[test]
    fn average_price_is_the_mean_of_visited_items() {
        let analyzer = ProfileAnalyzer::new(5000.0);
        let visits = vec![visit(item("cut", "cat-cut", 4000), 4), visit(item("color", "cat-color", 8000), 7)];
        let profile = analyzer.analyze(&customer(None), visits, Utc::now());

        assert_eq!(profile.preferences.average_price, 6000.0);
    }

    #[test]
    fn age_derives_from_birth_year_and_stays_unknown_otherwise() {
        let analyzer = ProfileAnalyzer::new(5000.0);
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();

        let birth = NaiveDate::from_ymd_opt(2001, 12, 3).unwrap();
        let profile = analyzer.analyze(&customer(Some(birth)), Vec::new(), now);
        assert_eq!(profile.age, Some(25));

        let profile = analyzer.analyze(&customer(None), Vec::new(), now);
        assert_eq!(profile.age, None);
    }

    #[test]
    fn preferred_categories_keep_top_three_with_stable_ties() {
        let analyzer = ProfileAnalyzer::new(5000.0);
        // care: 2 visits; cut, color, nail, spa: 1 each in that first-seen order.
        let visits = vec![
            visit(item("cut", "cat-cut", 4000), 1),
            visit(item("treatment", "cat-care", 6000), 2),
            visit(item("color", "cat-color", 8000), 3),
            visit(item("nail", "cat-nail", 5000), 4),
            visit(item("treatment", "cat-care", 6000), 5),
            visit(item("spa", "cat-spa", 7000), 6),
        ];
        let profile = analyzer.analyze(&customer(None), visits, Utc::now());

        assert_eq!(
            profile.preferences.preferred_categories,
            vec![CategoryId("cat-care".into()), CategoryId("cat-cut".into()), CategoryId("cat-color".into())]
        );
    }

    #[test]
    fn seasonal_trends_count_visits_per_bucket() {
        let analyzer = ProfileAnalyzer::new(5000.0);
        let visits = vec![
            visit(item("cut", "cat-cut", 4000), 3),
            visit(item("cut", "cat-cut", 4000), 5),
            visit(item("color", "cat-color", 8000), 8),
            visit(item("spa", "cat-spa", 7000), 12),
        ];
        let profile = analyzer.analyze(&customer(None), visits, Utc::now());

        let trends = &profile.preferences.seasonal_trends;
        assert_eq!(trends.get(&Season::Spring), Some(&2));
        assert_eq!(trends.get(&Season::Summer), Some(&1));
        assert_eq!(trends.get(&Season::Winter), Some(&1));
        assert_eq!(trends.get(&Season::Autumn), None);
    }
}
