use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::place::Activity;

/// Activities for one day, in the order they were generated.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct DayPlan {
    pub activities: Vec<Activity>,
}

impl DayPlan {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Day label to plan, kept in generation order ("day1", "day2", ..., "day10").
///
/// Serialized as a JSON object whose key order is the generation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Itinerary {
    days: Vec<(String, DayPlan)>,
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a day, or replaces the plan in place when the label already exists.
    pub fn push_day(&mut self, label: impl Into<String>, plan: DayPlan) {
        let label = label.into();
        match self.days.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, existing_plan)) => *existing_plan = plan,
            None => self.days.push((label, plan)),
        }
    }

    pub fn days(&self) -> impl Iterator<Item = (&str, &DayPlan)> {
        self.days.iter().map(|(label, plan)| (label.as_str(), plan))
    }

    pub fn get(&self, label: &str) -> Option<&DayPlan> {
        self.days
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, plan)| plan)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Serialize for Itinerary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (label, plan) in &self.days {
            map.serialize_entry(label, plan)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Itinerary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ItineraryVisitor;

        impl<'de> Visitor<'de> for ItineraryVisitor {
            type Value = Itinerary;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of day labels to activity lists")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Itinerary, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut itinerary = Itinerary::new();
                while let Some((label, plan)) = access.next_entry::<String, DayPlan>()? {
                    itinerary.push_day(label, plan);
                }
                Ok(itinerary)
            }
        }

        deserializer.deserialize_map(ItineraryVisitor)
    }
}
