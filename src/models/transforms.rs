use serde_json::{Map, Value};

use super::{
    generation::GenerationError,
    itinerary::{DayPlan, Itinerary},
    place::{Activity, HotelOption},
    trip::{Trip, TripRequest},
};

// Keys the model sometimes nests the whole plan under
const WRAPPER_KEYS: [&str; 3] = ["travelPlan", "tripPlan", "trip"];
const HOTEL_KEYS: [&str; 2] = ["hotelOptions", "hotels"];
const DAY_ACTIVITY_KEYS: [&str; 3] = ["plan", "activities", "places"];

impl Trip {
    /// Builds a trip from the raw text the model returned.
    ///
    /// Every failure is `UpstreamMalformed`: the model output is
    /// non-deterministic and a fresh attempt may produce a valid plan.
    pub fn from_payload(request: TripRequest, text: &str) -> Result<Trip, GenerationError> {
        let cleaned = strip_code_fences(text);
        let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
            GenerationError::UpstreamMalformed(format!("payload is not valid JSON: {}", e))
        })?;

        let Value::Object(mut payload) = unwrap_payload(value) else {
            return Err(malformed("payload is not a JSON object"));
        };

        let hotels = take_first(&mut payload, &HOTEL_KEYS)
            .ok_or_else(|| malformed("missing hotelOptions"))?;
        let itinerary = take_first(&mut payload, &["itinerary"])
            .ok_or_else(|| malformed("missing itinerary"))?;

        Ok(Trip {
            request,
            hotels: parse_hotels(hotels)?,
            itinerary: parse_itinerary(itinerary)?,
        })
    }
}

pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Lifts the plan out of a single wrapper object such as `{"travelPlan": {...}}`.
///
/// A payload that already carries hotels or an itinerary at the top level is
/// left alone, even if it also has a `trip` style key.
pub fn unwrap_payload(value: Value) -> Value {
    if let Value::Object(map) = &value {
        if has_plan_sections(map) {
            return value;
        }
        for key in WRAPPER_KEYS {
            if let Some(inner) = map.get(key).filter(|inner| inner.is_object()) {
                return inner.clone();
            }
        }
    }
    value
}

fn has_plan_sections(map: &Map<String, Value>) -> bool {
    map.contains_key("itinerary") || HOTEL_KEYS.iter().any(|key| map.contains_key(*key))
}

fn malformed(msg: &str) -> GenerationError {
    GenerationError::UpstreamMalformed(msg.to_string())
}

fn take_first(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .find_map(|key| map.remove(*key))
        .filter(|value| !value.is_null())
}

fn parse_hotels(value: Value) -> Result<Vec<HotelOption>, GenerationError> {
    let Value::Array(items) = value else {
        return Err(malformed("hotelOptions must be a list"));
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<HotelOption>(item).map_err(|e| {
                GenerationError::UpstreamMalformed(format!("invalid hotel entry: {}", e))
            })
        })
        .collect()
}

fn parse_itinerary(value: Value) -> Result<Itinerary, GenerationError> {
    let mut itinerary = Itinerary::new();

    match value {
        Value::Object(days) => {
            for (label, day) in days {
                itinerary.push_day(label, parse_day(day)?);
            }
        }
        // [{"day": 1, "plan": [...]}, ...]
        Value::Array(entries) => {
            for (index, entry) in entries.into_iter().enumerate() {
                let label = unique_label(&itinerary, day_label(&entry, index), index);
                itinerary.push_day(label, parse_day(entry)?);
            }
        }
        _ => return Err(malformed("itinerary must be an object or a list of days")),
    }

    Ok(itinerary)
}

fn day_label(entry: &Value, index: usize) -> String {
    match entry.get("day") {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(day) => format!("day{}", day),
            None => format!("day{}", n),
        },
        Some(Value::String(s)) => match s.trim().parse::<u64>() {
            Ok(day) => format!("day{}", day),
            Err(_) => s.trim().to_string(),
        },
        _ => format!("day{}", index + 1),
    }
}

// Listed days never overwrite each other; a taken label moves to the next free "day<n>".
fn unique_label(itinerary: &Itinerary, label: String, index: usize) -> String {
    if itinerary.get(&label).is_none() {
        return label;
    }
    (index + 1..)
        .map(|n| format!("day{}", n))
        .find(|candidate| itinerary.get(candidate).is_none())
        .unwrap_or(label)
}

fn parse_day(value: Value) -> Result<DayPlan, GenerationError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut day) => {
            let nested = DAY_ACTIVITY_KEYS
                .iter()
                .find(|key| day.get(**key).is_some_and(Value::is_array))
                .and_then(|key| day.remove(*key));

            match nested {
                Some(Value::Array(items)) => items,
                // {"activity1": {...}, "activity2": {...}}; take the values in order
                _ => day.into_iter().map(|(_, v)| v).filter(Value::is_object).collect(),
            }
        }
        _ => return Err(malformed("day plan must be a list of activities")),
    };

    let activities = items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<Activity>(item).map_err(|e| {
                GenerationError::UpstreamMalformed(format!("invalid activity entry: {}", e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DayPlan::new(activities))
}
