use serde::{Deserialize, Serialize};

use super::customer::Gender;
use super::TenantId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuItemId(pub String);

impl MenuItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Calendar season, bucketed by month: Mar-May, Jun-Aug, Sep-Nov, Dec-Feb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seasonality {
    Spring,
    Summer,
    Autumn,
    Winter,
    All,
}

impl Seasonality {
    pub fn matches(&self, season: Season) -> bool {
        match self {
            Self::All => true,
            Self::Spring => season == Season::Spring,
            Self::Summer => season == Season::Summer,
            Self::Autumn => season == Season::Autumn,
            Self::Winter => season == Season::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
            Self::All => "all",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "autumn" => Some(Self::Autumn),
            "winter" => Some(Self::Winter),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Teens,
    Twenties,
    Thirties,
    FortiesPlus,
    All,
}

impl AgeGroup {
    pub fn contains(&self, age: u32) -> bool {
        match self {
            Self::Teens => (13..=19).contains(&age),
            Self::Twenties => (20..=29).contains(&age),
            Self::Thirties => (30..=39).contains(&age),
            Self::FortiesPlus => age >= 40,
            Self::All => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teens => "teens",
            Self::Twenties => "twenties",
            Self::Thirties => "thirties",
            Self::FortiesPlus => "forties_plus",
            Self::All => "all",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "teens" => Some(Self::Teens),
            "twenties" => Some(Self::Twenties),
            "thirties" => Some(Self::Thirties),
            "forties_plus" => Some(Self::FortiesPlus),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderTarget {
    Male,
    Female,
    All,
}

impl GenderTarget {
    pub fn matches(&self, gender: Gender) -> bool {
        match self {
            Self::All => true,
            Self::Male => gender == Gender::Male,
            Self::Female => gender == Gender::Female,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::All => "all",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// A bookable service. Read-only input to the scoring pipeline; `popularity`
/// is a counter bumped by visit recording and may race with a concurrent
/// scoring pass, which only ever reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub tenant_id: TenantId,
    pub category_id: CategoryId,
    pub name: String,
    /// Currency minor units.
    pub price: i64,
    pub duration_minutes: u32,
    pub seasonality: Seasonality,
    pub age_group: AgeGroup,
    pub gender_target: GenderTarget,
    pub popularity: i64,
    pub active: bool,
}
