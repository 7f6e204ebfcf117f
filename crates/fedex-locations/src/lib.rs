//! Client for the FedEx Locations web service (`SearchLocationsRequest`, v3).
//!
//! Builds the carrier's schema-ordered XML request from a [`LocationQuery`],
//! POSTs it, and maps the XML reply to [`Location`] records or a
//! [`LocatorError`].

pub mod client;
pub mod error;
pub mod location;
pub mod query;
pub mod request;
pub mod response;
pub mod xml_tree;

pub use client::LocationClient;
pub use error::LocatorError;
pub use fedex_core::Credentials;
pub use location::{Distance, Location};
pub use query::{AddressInput, LocationQuery, LocationQueryOptions};
