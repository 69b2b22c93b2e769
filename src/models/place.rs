use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Reads coordinates from the shapes the model tends to produce:
    /// `{latitude, longitude}`, `{lat, lng}`, `[lat, lon]` or `"lat, lon"`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                let latitude = map
                    .get("latitude")
                    .or_else(|| map.get("lat"))
                    .and_then(number_from_value)?;
                let longitude = map
                    .get("longitude")
                    .or_else(|| map.get("lng"))
                    .or_else(|| map.get("lon"))
                    .and_then(number_from_value)?;
                Some(Self {
                    latitude,
                    longitude,
                })
            }
            Value::Array(items) if items.len() == 2 => Some(Self {
                latitude: number_from_value(&items[0])?,
                longitude: number_from_value(&items[1])?,
            }),
            Value::String(text) => {
                let (lat, lon) = text.split_once(',')?;
                Some(Self {
                    latitude: lat.trim().parse().ok()?,
                    longitude: lon.trim().parse().ok()?,
                })
            }
            _ => None,
        }
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// Model output mixes strings and numbers for display fields ("$120", 120, 4.5, "4.5 stars")
fn deserialize_display_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        _ => Ok(None),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_display_string(deserializer)?.unwrap_or_default())
}

fn deserialize_coordinates<'de, D>(deserializer: D) -> Result<Option<Coordinates>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Coordinates::from_value))
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HotelOption {
    #[serde(rename = "hotelName", alias = "name", default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(rename = "hotelAddress", alias = "address", default, deserialize_with = "deserialize_text")]
    pub address: String,
    #[serde(
        default,
        deserialize_with = "deserialize_display_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<String>,
    #[serde(
        rename = "hotelImageURL",
        alias = "hotelImageUrl",
        default,
        deserialize_with = "deserialize_display_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(
        rename = "geoCoordinates",
        alias = "coordinates",
        default,
        deserialize_with = "deserialize_coordinates",
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinates: Option<Coordinates>,
    #[serde(
        default,
        deserialize_with = "deserialize_display_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
}

impl HotelOption {
    /// Hotel names are not unique in generated output, so the position is part of the key.
    pub fn display_key(&self, index: usize) -> String {
        format!("{}{}", self.name, index)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Activity {
    #[serde(rename = "placeName", alias = "name", default, deserialize_with = "deserialize_text")]
    pub place_name: String,
    #[serde(rename = "placeDetails", alias = "details", default, deserialize_with = "deserialize_text")]
    pub place_details: String,
    #[serde(
        rename = "placeImageURL",
        alias = "placeImageUrl",
        default,
        deserialize_with = "deserialize_display_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub place_image_url: Option<String>,
    #[serde(
        rename = "geoCoordinates",
        alias = "coordinates",
        default,
        deserialize_with = "deserialize_coordinates",
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinates: Option<Coordinates>,
    #[serde(
        rename = "ticketPricing",
        default,
        deserialize_with = "deserialize_display_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub ticket_pricing: Option<String>,
    // Free text such as "2 hours"; interpreted only when a schedule is rendered
    #[serde(
        rename = "timeToTravel",
        alias = "travelDuration",
        default,
        deserialize_with = "deserialize_display_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub travel_duration: Option<String>,
    #[serde(
        rename = "bestTimeToVisit",
        default,
        deserialize_with = "deserialize_display_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_time_to_visit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coordinates_accept_common_shapes() {
        let expected = Some(Coordinates {
            latitude: 48.8584,
            longitude: 2.2945,
        });

        assert_eq!(
            Coordinates::from_value(&json!({"latitude": 48.8584, "longitude": 2.2945})),
            expected
        );
        assert_eq!(
            Coordinates::from_value(&json!({"lat": "48.8584", "lng": 2.2945})),
            expected
        );
        assert_eq!(Coordinates::from_value(&json!([48.8584, 2.2945])), expected);
        assert_eq!(Coordinates::from_value(&json!("48.8584, 2.2945")), expected);
        assert_eq!(Coordinates::from_value(&json!("near the river")), None);
    }

    #[test]
    fn hotel_fields_are_lenient() {
        let hotel: HotelOption = serde_json::from_value(json!({
            "hotelName": "Hotel Lumiere",
            "hotelAddress": "12 Rue de Rivoli",
            "price": 120,
            "rating": 4.5,
            "geoCoordinates": {"latitude": 48.85, "longitude": 2.35},
            "description": "Boutique hotel"
        }))
        .unwrap();

        assert_eq!(hotel.name, "Hotel Lumiere");
        assert_eq!(hotel.price.as_deref(), Some("120"));
        assert_eq!(hotel.rating.as_deref(), Some("4.5"));
        assert_eq!(hotel.image_url, None);
        assert!(hotel.coordinates.is_some());
        assert_eq!(hotel.display_key(2), "Hotel Lumiere2");
    }

    #[test]
    fn activity_accepts_travel_duration_alias() {
        let activity: Activity = serde_json::from_value(json!({
            "placeName": "Louvre",
            "travelDuration": "3 hours",
            "ticketPricing": null
        }))
        .unwrap();

        assert_eq!(activity.travel_duration.as_deref(), Some("3 hours"));
        assert_eq!(activity.ticket_pricing, None);
        assert_eq!(activity.place_details, "");

        let serialized = serde_json::to_value(&activity).unwrap();
        assert_eq!(serialized["timeToTravel"], "3 hours");
    }
}
