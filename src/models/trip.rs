use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::models::itinerary::Itinerary;
use crate::models::place::HotelOption;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum BudgetTier {
    Cheap,
    Moderate,
    Luxury,
}

impl BudgetTier {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetTier::Cheap => "Cheap",
            BudgetTier::Moderate => "Moderate",
            BudgetTier::Luxury => "Luxury",
        }
    }
}

impl FromStr for BudgetTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cheap" | "budget" | "low" => Ok(BudgetTier::Cheap),
            "moderate" | "medium" | "mid" => Ok(BudgetTier::Moderate),
            "luxury" | "high" | "premium" => Ok(BudgetTier::Luxury),
            other => Err(format!("unknown budget tier: {}", other)),
        }
    }
}

impl TryFrom<String> for BudgetTier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BudgetTier> for String {
    fn from(tier: BudgetTier) -> Self {
        tier.label().to_string()
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum Companion {
    Solo,
    Couple,
    Family,
    Friends,
}

impl Companion {
    pub fn label(&self) -> &'static str {
        match self {
            Companion::Solo => "Solo",
            Companion::Couple => "Couple",
            Companion::Family => "Family",
            Companion::Friends => "Friends",
        }
    }

    /// Wording used when describing the travellers to the model.
    pub fn description(&self) -> &'static str {
        match self {
            Companion::Solo => "a solo traveler",
            Companion::Couple => "a couple",
            Companion::Family => "a family",
            Companion::Friends => "a group of friends",
        }
    }
}

impl FromStr for Companion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "solo" | "just me" | "me" => Ok(Companion::Solo),
            "couple" | "a couple" => Ok(Companion::Couple),
            "family" => Ok(Companion::Family),
            "friends" => Ok(Companion::Friends),
            other => Err(format!("unknown travel companion: {}", other)),
        }
    }
}

impl TryFrom<String> for Companion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Companion> for String {
    fn from(companion: Companion) -> Self {
        companion.label().to_string()
    }
}

impl fmt::Display for Companion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Travel preferences submitted from the trip form.
///
/// Every field may be absent on the wire; `validate` decides whether the
/// request is complete enough to send to the model.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TripRequest {
    #[serde(default, alias = "location")]
    pub destination: String,
    #[serde(
        default,
        alias = "days",
        alias = "duration",
        deserialize_with = "deserialize_day_count"
    )]
    pub day_count: u32,
    #[serde(default)]
    pub budget: Option<BudgetTier>,
    #[serde(default, alias = "travelCompanion")]
    pub companion: Option<Companion>,
}

/// Accepts `3` as well as the form's `"3"`; blank or null means no days were chosen.
fn deserialize_day_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DayCount {
        Number(u32),
        Text(String),
    }

    match Option::<DayCount>::deserialize(deserializer)? {
        None => Ok(0),
        Some(DayCount::Number(days)) => Ok(days),
        Some(DayCount::Text(text)) if text.trim().is_empty() => Ok(0),
        Some(DayCount::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid day count: {}", text))),
    }
}

impl TripRequest {
    pub fn new(
        destination: impl Into<String>,
        day_count: u32,
        budget: BudgetTier,
        companion: Companion,
    ) -> Self {
        Self {
            destination: destination.into(),
            day_count,
            budget: Some(budget),
            companion: Some(companion),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.destination.trim().is_empty() {
            return Err("destination is required".to_string());
        }
        if self.day_count == 0 {
            return Err("day_count must be a positive number of days".to_string());
        }
        if self.budget.is_none() {
            return Err("budget is required".to_string());
        }
        if self.companion.is_none() {
            return Err("companion is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Trip {
    pub request: TripRequest,
    pub hotels: Vec<HotelOption>,
    pub itinerary: Itinerary,
}

/// A trip as stored for one user.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SavedTrip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub trip: Trip,
    pub created_at: DateTime<Utc>,
}

impl SavedTrip {
    pub fn new(user_id: &str, trip: Trip) -> Self {
        Self {
            id: Some(ObjectId::new()),
            user_id: user_id.to_string(),
            trip,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TripResponse {
    pub id: String,
    pub trip: Trip,
    pub created_at: DateTime<Utc>,
}

impl From<SavedTrip> for TripResponse {
    fn from(saved: SavedTrip) -> Self {
        Self {
            id: saved.id.map(|id| id.to_hex()).unwrap_or_default(),
            trip: saved.trip,
            created_at: saved.created_at,
        }
    }
}
