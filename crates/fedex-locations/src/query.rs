//! Caller search options and the validated [`LocationQuery`].

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::LocatorError;

/// Caller-supplied postal address for a location search.
///
/// `street` is accepted as an alias for `address` (the street line).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state_or_province_code: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Unvalidated search options as handed to [`LocationQuery::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocationQueryOptions {
    #[serde(default)]
    pub address: Option<AddressInput>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Carrier-encoded geographic coordinates, sent verbatim.
    #[serde(default)]
    pub coordinates: Option<String>,
    #[serde(default)]
    pub ship_date: Option<NaiveDate>,
}

/// A validated location search. Always carries an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    address: AddressInput,
    phone_number: Option<String>,
    coordinates: Option<String>,
    ship_date: Option<NaiveDate>,
}

impl LocationQuery {
    /// Validates `options` and fills the street line from `street` when
    /// `address` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::MissingParameter`] if no address was given.
    pub fn new(options: LocationQueryOptions) -> Result<Self, LocatorError> {
        let mut address = options
            .address
            .ok_or(LocatorError::MissingParameter("address"))?;
        if address.address.is_none() {
            address.address.clone_from(&address.street);
        }

        Ok(Self {
            address,
            phone_number: options.phone_number,
            coordinates: options.coordinates,
            ship_date: options.ship_date,
        })
    }

    #[must_use]
    pub fn address(&self) -> &AddressInput {
        &self.address
    }

    /// Effective street line after the `street` fallback.
    #[must_use]
    pub fn street_line(&self) -> Option<&str> {
        self.address.address.as_deref()
    }

    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<&str> {
        self.coordinates.as_deref()
    }

    #[must_use]
    pub fn ship_date(&self) -> Option<NaiveDate> {
        self.ship_date
    }
}
