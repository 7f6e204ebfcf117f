//! Success/failure classification and result mapping for
//! `SearchLocationsReply`.
//!
//! Works on the raw tree from [`xml_tree::parse`]. The success path reads a
//! `snake_case` copy; the SOAP-fault path reads the raw tag names.

use serde_json::Value;

use crate::error::LocatorError;
use crate::location::{Distance, Location};
use crate::xml_tree::{self, as_sequence, find_key};

const SUCCESS_SEVERITIES: [&str; 3] = ["SUCCESS", "WARNING", "NOTE"];

/// Message used when neither notifications nor a SOAP fault can be read.
pub const GENERIC_ERROR_MESSAGE: &str = "unrecognized error response from FedEx";

/// Map a parsed reply to locations, or to [`LocatorError::Rate`].
///
/// # Errors
///
/// Returns [`LocatorError::Rate`] unless the reply has a
/// `SearchLocationsReply` whose `HighestSeverity` is `SUCCESS`, `WARNING`
/// or `NOTE`.
pub fn interpret_reply(raw: &Value) -> Result<Vec<Location>, LocatorError> {
    let normalized = xml_tree::snake_case_keys(raw);
    let reply = find_key(&normalized, "search_locations_reply");

    match reply {
        Some(reply) if is_successful(reply) => Ok(locations_from_reply(reply)),
        _ => {
            let message =
                error_message(reply, raw).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
            Err(LocatorError::Rate(message))
        }
    }
}

/// The reply's `highest_severity`, if present.
#[must_use]
pub fn highest_severity(reply: &Value) -> Option<&str> {
    reply.get("highest_severity").and_then(Value::as_str)
}

fn is_successful(reply: &Value) -> bool {
    highest_severity(reply).is_some_and(|s| SUCCESS_SEVERITIES.contains(&s))
}

/// Locations in reply order, across every address-to-location relationship.
fn locations_from_reply(reply: &Value) -> Vec<Location> {
    as_sequence(reply.get("address_to_location_relationships"))
        .into_iter()
        .flat_map(|relationship| as_sequence(relationship.get("distance_and_location_details")))
        .map(location_from_details)
        .collect()
}

fn location_from_details(details: &Value) -> Location {
    let location_detail = details.get("location_detail").unwrap_or(&Value::Null);
    let contact_and_address = location_detail
        .get("location_contact_and_address")
        .unwrap_or(&Value::Null);
    let hours = location_detail
        .get("normal_hours")
        .cloned()
        .unwrap_or(Value::Null);

    let location_id = location_detail
        .get("location_id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    Location::from_contact_and_address(contact_and_address, hours)
        .with_location_id(location_id)
        .with_distance(distance(details.get("distance")))
}

fn distance(value: Option<&Value>) -> Option<Distance> {
    let value = value?;
    let amount = value.get("value")?.as_str()?.trim().parse::<f64>().ok()?;
    let units = value
        .get("units")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(Distance {
        value: amount,
        units,
    })
}

/// Best-effort failure text. `None` means the fallback message applies.
fn error_message(reply: Option<&Value>, raw: &Value) -> Option<String> {
    match reply {
        Some(reply) => notification_message(reply),
        None => fault_message(raw),
    }
}

fn notification_message(reply: &Value) -> Option<String> {
    as_sequence(reply.get("notifications"))
        .first()?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}

/// `"{cause}\n--{desc 1}\n--{desc 2}..."` from a SOAP fault's `detail`.
fn fault_message(raw: &Value) -> Option<String> {
    let detail = find_key(raw, "Fault")?.get("detail")?;
    let cause = detail.get("cause")?.as_str()?;
    let descriptions = as_sequence(Some(detail.get("desc")?))
        .into_iter()
        .map(Value::as_str)
        .collect::<Option<Vec<_>>>()?;
    Some(format!("{cause}\n--{}", descriptions.join("\n--")))
}
