//! Location records built from a successful `SearchLocationsReply`.

use serde::Serialize;
use serde_json::Value;

/// Distance from the searched address as reported by FedEx.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distance {
    pub value: f64,
    pub units: String,
}

/// One drop-off/service location from a successful search.
///
/// Immutable once built; fields are exposed through accessors only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    address: String,
    operational_hours: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<Distance>,
}

impl Location {
    /// Builds a location from a reply's `location_contact_and_address` map.
    ///
    /// The address is `"{street_lines}, {city}, {state_or_province_code}, {postal_code}"`.
    /// Missing fields render as empty segments; `street` stands in for
    /// `street_lines`, and repeated street lines are joined with a space.
    #[must_use]
    pub fn from_contact_and_address(contact_and_address: &Value, operational_hours: Value) -> Self {
        let address = contact_and_address.get("address").unwrap_or(&Value::Null);
        let street = address
            .get("street_lines")
            .or_else(|| address.get("street"));

        let formatted = format!(
            "{}, {}, {}, {}",
            text(street),
            text(address.get("city")),
            text(address.get("state_or_province_code")),
            text(address.get("postal_code")),
        );

        Self {
            address: formatted,
            operational_hours,
            location_id: None,
            distance: None,
        }
    }

    #[must_use]
    pub(crate) fn with_location_id(mut self, location_id: Option<String>) -> Self {
        self.location_id = location_id;
        self
    }

    #[must_use]
    pub(crate) fn with_distance(mut self, distance: Option<Distance>) -> Self {
        self.distance = distance;
        self
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Verbatim `normal_hours` payload from the reply; `Null` when absent.
    #[must_use]
    pub fn operational_hours(&self) -> &Value {
        &self.operational_hours
    }

    #[must_use]
    pub fn location_id(&self) -> Option<&str> {
        self.location_id.as_deref()
    }

    #[must_use]
    pub fn distance(&self) -> Option<&Distance> {
        self.distance.as_ref()
    }
}

/// Render a leaf (or a list of leaves) as display text.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| text(Some(v)))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}
