//! `SearchLocationsRequest` document builder.
//!
//! The Locations service validates element order against its schema, so the
//! blocks below are written in exactly the order FedEx publishes.

use std::io::Cursor;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use fedex_core::Credentials;

use crate::error::LocatorError;
use crate::query::LocationQuery;

pub const LOCS_NAMESPACE: &str = "http://fedex.com/ws/locs/v3";

const SERVICE_ID: &str = "locs";
const SERVICE_MAJOR_VERSION: u32 = 3;
const CLIENT_REGION: &str = "US";
const SEARCH_CRITERION: &str = "ADDRESS";
const RADIUS_KM: u32 = 100;
const REQUIRED_LOCATION_ATTRIBUTES: &str = "DANGEROUS_GOODS_SERVICES";
const RESULTS_REQUESTED: u32 = 10;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Two days after `now`, as a calendar date in `zone`.
#[must_use]
pub fn default_ship_date(now: DateTime<Utc>, zone: FixedOffset) -> NaiveDate {
    (now + Duration::days(2)).with_timezone(&zone).date_naive()
}

/// Serialize `query` into a `SearchLocationsRequest` XML document.
///
/// `now` and `zone` drive `EffectiveDate` and the default `ShipDate`. A
/// caller-supplied ship date replaces the default `ShipDate` only.
///
/// # Errors
///
/// Returns [`LocatorError::Io`] (or [`LocatorError::Xml`]) if the writer
/// fails, which only happens on allocation failure.
pub fn build_search_locations_xml(
    query: &LocationQuery,
    credentials: &Credentials,
    now: DateTime<Utc>,
    zone: FixedOffset,
) -> Result<String, LocatorError> {
    let mut doc = RequestWriter::new();

    doc.writer.write_event(Event::Start(
        BytesStart::new("SearchLocationsRequest").with_attributes([("xmlns", LOCS_NAMESPACE)]),
    ))?;

    add_web_authentication_detail(&mut doc, credentials)?;
    add_client_detail(&mut doc, credentials)?;
    add_version(&mut doc)?;

    let effective_date = default_ship_date(now, zone);
    doc.leaf("EffectiveDate", &effective_date.format(DATE_FORMAT).to_string())?;
    doc.leaf("LocationsSearchCriterion", SEARCH_CRITERION)?;

    let ship_date = query
        .ship_date()
        .unwrap_or_else(|| default_ship_date(now, zone));
    add_unique_tracking_number(&mut doc, ship_date)?;

    add_origin_address(&mut doc, query)?;
    doc.leaf("PhoneNumber", query.phone_number().unwrap_or_default())?;
    add_search_constraints(&mut doc, query)?;

    doc.close("SearchLocationsRequest")?;
    Ok(doc.finish())
}

fn add_web_authentication_detail(
    doc: &mut RequestWriter,
    credentials: &Credentials,
) -> Result<(), LocatorError> {
    doc.open("WebAuthenticationDetail")?;
    doc.open("UserCredential")?;
    doc.leaf("Key", &credentials.key)?;
    doc.leaf("Password", &credentials.password)?;
    doc.close("UserCredential")?;
    doc.close("WebAuthenticationDetail")
}

fn add_client_detail(doc: &mut RequestWriter, credentials: &Credentials) -> Result<(), LocatorError> {
    doc.open("ClientDetail")?;
    doc.leaf("AccountNumber", &credentials.account_number)?;
    doc.leaf("MeterNumber", &credentials.meter)?;
    doc.leaf("Region", CLIENT_REGION)?;
    doc.close("ClientDetail")
}

fn add_version(doc: &mut RequestWriter) -> Result<(), LocatorError> {
    doc.open("Version")?;
    doc.leaf("ServiceId", SERVICE_ID)?;
    doc.leaf("Major", &SERVICE_MAJOR_VERSION.to_string())?;
    doc.leaf("Intermediate", "0")?;
    doc.leaf("Minor", "0")?;
    doc.close("Version")
}

fn add_unique_tracking_number(doc: &mut RequestWriter, ship_date: NaiveDate) -> Result<(), LocatorError> {
    doc.open("UniqueTrackingNumber")?;
    doc.leaf("TrackingNumber", "")?;
    doc.leaf("TrackingNumberUniqueIdentifier", "")?;
    doc.leaf("ShipDate", &ship_date.format(DATE_FORMAT).to_string())?;
    doc.close("UniqueTrackingNumber")
}

/// The origin address always carries an empty `StateOrProvinceCode`, even
/// when the query has one; FedEx resolves the region from the postal code.
fn add_origin_address(doc: &mut RequestWriter, query: &LocationQuery) -> Result<(), LocatorError> {
    let address = query.address();
    doc.open("Address")?;
    doc.leaf("StreetLines", query.street_line().unwrap_or_default())?;
    doc.leaf("City", address.city.as_deref().unwrap_or_default())?;
    doc.leaf("StateOrProvinceCode", "")?;
    doc.leaf("PostalCode", address.postal_code.as_deref().unwrap_or_default())?;
    doc.leaf("UrbanizationCode", "")?;
    doc.leaf("CountryCode", address.country.as_deref().unwrap_or_default())?;
    doc.leaf("Residential", "0")?;
    doc.close("Address")
}

fn add_search_constraints(doc: &mut RequestWriter, query: &LocationQuery) -> Result<(), LocatorError> {
    doc.leaf("GeographicCoordinates", query.coordinates().unwrap_or_default())?;
    doc.leaf("MultipleMatchesAction", "RETURN_ALL")?;

    doc.open("SortDetail")?;
    doc.leaf("Criterion", "DISTANCE")?;
    doc.leaf("Order", "LOWEST_TO_HIGHEST")?;
    doc.close("SortDetail")?;

    doc.open("Constraints")?;
    doc.open("RadiusDistance")?;
    doc.leaf("Value", &RADIUS_KM.to_string())?;
    doc.leaf("Units", "KM")?;
    doc.close("RadiusDistance")?;
    doc.leaf("RequiredLocationAttributes", REQUIRED_LOCATION_ATTRIBUTES)?;
    doc.leaf("ResultsRequested", &RESULTS_REQUESTED.to_string())?;
    doc.close("Constraints")
}

struct RequestWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl RequestWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    fn open(&mut self, name: &str) -> Result<(), LocatorError> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), LocatorError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Writes `<name>text</name>`, or `<name/>` when `text` is empty.
    fn leaf(&mut self, name: &str, text: &str) -> Result<(), LocatorError> {
        if text.is_empty() {
            self.writer.write_event(Event::Empty(BytesStart::new(name)))?;
            return Ok(());
        }
        self.open(name)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn finish(self) -> String {
        String::from_utf8_lossy(&self.writer.into_inner().into_inner()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::query::{AddressInput, LocationQueryOptions};
    use crate::xml_tree;

    fn credentials() -> Credentials {
        Credentials::new("test-key", "test-password", "510087000", "118000000")
    }

    fn query(ship_date: Option<NaiveDate>) -> LocationQuery {
        LocationQuery::new(LocationQueryOptions {
            address: Some(AddressInput {
                address: Some("123 Main St".to_string()),
                city: Some("Springfield".to_string()),
                state_or_province_code: Some("IL".to_string()),
                postal_code: Some("62701".to_string()),
                country: Some("US".to_string()),
                ..AddressInput::default()
            }),
            phone_number: Some("2175550100".to_string()),
            coordinates: None,
            ship_date,
        })
        .unwrap()
    }

    fn central() -> FixedOffset {
        FixedOffset::west_opt(6 * 3600).unwrap()
    }

    fn build(now: DateTime<Utc>, zone: FixedOffset, ship_date: Option<NaiveDate>) -> String {
        build_search_locations_xml(&query(ship_date), &credentials(), now, zone).unwrap()
    }

    /// Top-level child element names in document order.
    fn top_level_order(xml: &str) -> Vec<String> {
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut depth = 0usize;
        let mut names = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => {
                    if depth == 1 {
                        names.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    }
                    depth += 1;
                }
                Event::Empty(e) => {
                    if depth == 1 {
                        names.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    }
                }
                Event::End(_) => depth -= 1,
                Event::Eof => break,
                _ => {}
            }
        }
        names
    }

    #[test]
    fn root_carries_locs_namespace() {
        let xml = build(Utc::now(), central(), None);
        assert!(
            xml.starts_with(r#"<SearchLocationsRequest xmlns="http://fedex.com/ws/locs/v3">"#),
            "unexpected root: {xml}"
        );
    }

    #[test]
    fn blocks_follow_schema_order() {
        let xml = build(Utc::now(), central(), None);
        assert_eq!(
            top_level_order(&xml),
            vec![
                "WebAuthenticationDetail",
                "ClientDetail",
                "Version",
                "EffectiveDate",
                "LocationsSearchCriterion",
                "UniqueTrackingNumber",
                "Address",
                "PhoneNumber",
                "GeographicCoordinates",
                "MultipleMatchesAction",
                "SortDetail",
                "Constraints",
            ]
        );
    }

    #[test]
    fn fixed_fields_are_populated() {
        let xml = build(Utc::now(), central(), None);
        let tree = xml_tree::parse(&xml).unwrap();
        let req = &tree["SearchLocationsRequest"];

        assert_eq!(req["WebAuthenticationDetail"]["UserCredential"]["Key"], "test-key");
        assert_eq!(req["ClientDetail"]["AccountNumber"], "510087000");
        assert_eq!(req["ClientDetail"]["MeterNumber"], "118000000");
        assert_eq!(req["ClientDetail"]["Region"], "US");
        assert_eq!(req["Version"]["ServiceId"], "locs");
        assert_eq!(req["Version"]["Major"], "3");
        assert_eq!(req["Version"]["Intermediate"], "0");
        assert_eq!(req["Version"]["Minor"], "0");
        assert_eq!(req["LocationsSearchCriterion"], "ADDRESS");
        assert_eq!(req["PhoneNumber"], "2175550100");
        assert_eq!(req["GeographicCoordinates"], "");
        assert_eq!(req["MultipleMatchesAction"], "RETURN_ALL");
        assert_eq!(req["SortDetail"]["Criterion"], "DISTANCE");
        assert_eq!(req["SortDetail"]["Order"], "LOWEST_TO_HIGHEST");
        assert_eq!(req["Constraints"]["RadiusDistance"]["Value"], "100");
        assert_eq!(req["Constraints"]["RadiusDistance"]["Units"], "KM");
        assert_eq!(
            req["Constraints"]["RequiredLocationAttributes"],
            "DANGEROUS_GOODS_SERVICES"
        );
        assert_eq!(req["Constraints"]["ResultsRequested"], "10");
    }

    #[test]
    fn origin_address_leaves_state_empty() {
        let xml = build(Utc::now(), central(), None);
        let tree = xml_tree::parse(&xml).unwrap();
        let address = &tree["SearchLocationsRequest"]["Address"];

        assert_eq!(address["StreetLines"], "123 Main St");
        assert_eq!(address["City"], "Springfield");
        assert_eq!(address["StateOrProvinceCode"], "");
        assert_eq!(address["PostalCode"], "62701");
        assert_eq!(address["UrbanizationCode"], "");
        assert_eq!(address["CountryCode"], "US");
        assert_eq!(address["Residential"], "0");
    }

    #[test]
    fn dates_are_two_days_out_in_reference_zone() {
        // 03:00 UTC on the 10th is still the 9th in US Central.
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 3, 0, 0).unwrap();
        let xml = build(now, central(), None);
        let tree = xml_tree::parse(&xml).unwrap();
        let req = &tree["SearchLocationsRequest"];

        assert_eq!(req["EffectiveDate"], "2024-03-11");
        assert_eq!(req["UniqueTrackingNumber"]["ShipDate"], "2024-03-11");
        assert_eq!(req["UniqueTrackingNumber"]["TrackingNumber"], "");
    }

    #[test]
    fn dates_follow_reference_zone_not_utc() {
        let now = Utc.with_ymd_and_hms(2024, 12, 30, 20, 0, 0).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            default_ship_date(now, tokyo),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
        assert_eq!(
            default_ship_date(now, central()),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn explicit_ship_date_overrides_default_ship_date_only() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        let ship = NaiveDate::from_ymd_opt(2024, 3, 20);
        let xml = build(now, central(), ship);
        let tree = xml_tree::parse(&xml).unwrap();
        let req = &tree["SearchLocationsRequest"];

        assert_eq!(req["EffectiveDate"], "2024-03-12");
        assert_eq!(req["UniqueTrackingNumber"]["ShipDate"], "2024-03-20");
    }

    #[test]
    fn coordinates_are_sent_verbatim() {
        let query = LocationQuery::new(LocationQueryOptions {
            address: Some(query(None).address().clone()),
            coordinates: Some("+35.0456-090.0024/".to_string()),
            ..LocationQueryOptions::default()
        })
        .unwrap();
        let xml = build_search_locations_xml(&query, &credentials(), Utc::now(), central()).unwrap();
        assert!(
            xml.contains("<GeographicCoordinates>+35.0456-090.0024/</GeographicCoordinates>"),
            "coordinates not verbatim: {xml}"
        );
        let tree = xml_tree::parse(&xml).unwrap();
        assert_eq!(
            tree["SearchLocationsRequest"]["GeographicCoordinates"],
            "+35.0456-090.0024/"
        );
    }

    #[test]
    fn absent_phone_number_is_an_empty_element() {
        let query = LocationQuery::new(LocationQueryOptions {
            address: Some(query(None).address().clone()),
            phone_number: None,
            ..LocationQueryOptions::default()
        })
        .unwrap();
        let xml = build_search_locations_xml(&query, &credentials(), Utc::now(), central()).unwrap();
        assert!(xml.contains("<PhoneNumber/>"), "expected empty PhoneNumber: {xml}");
    }

    #[test]
    fn text_is_escaped() {
        let options = LocationQueryOptions {
            address: Some(AddressInput {
                address: Some("1 A&B <Plaza>".to_string()),
                ..AddressInput::default()
            }),
            ..LocationQueryOptions::default()
        };
        let query = LocationQuery::new(options).unwrap();
        let xml = build_search_locations_xml(&query, &credentials(), Utc::now(), central()).unwrap();
        assert!(xml.contains("1 A&amp;B &lt;Plaza&gt;"), "not escaped: {xml}");
        let tree = xml_tree::parse(&xml).unwrap();
        assert_eq!(
            tree["SearchLocationsRequest"]["Address"]["StreetLines"],
            "1 A&B <Plaza>"
        );
    }
}
