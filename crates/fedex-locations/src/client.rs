//! HTTP client for the FedEx Locations web service.
//!
//! Wraps `reqwest` with request building, reply parsing, and carrier-level
//! error classification. One POST per search; no retry and no cache.

use std::time::Duration;

use chrono::{FixedOffset, Utc};
use reqwest::{Client, Url};
use serde_json::Value;

use fedex_core::{Credentials, FedexConfig};

use crate::error::LocatorError;
use crate::location::Location;
use crate::query::{LocationQuery, LocationQueryOptions};
use crate::request::build_search_locations_xml;
use crate::response::interpret_reply;
use crate::xml_tree;

/// Client for `SearchLocationsRequest`.
///
/// Holds only immutable state, so one instance can serve concurrent
/// searches. Use [`LocationClient::from_config`] in production or
/// [`LocationClient::new`] to point at a mock server in tests.
pub struct LocationClient {
    client: Client,
    endpoint: Url,
    credentials: Credentials,
    reference_offset: FixedOffset,
    debug: bool,
}

impl LocationClient {
    /// Creates a client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`LocatorError::InvalidEndpoint`] if
    /// `endpoint` is not a valid URL.
    pub fn new(
        credentials: Credentials,
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        reference_offset: FixedOffset,
    ) -> Result<Self, LocatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let endpoint_url = Url::parse(endpoint).map_err(|e| LocatorError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint: endpoint_url,
            credentials,
            reference_offset,
            debug: false,
        })
    }

    /// Creates a client from loaded configuration, including its debug flag.
    ///
    /// # Errors
    ///
    /// Same as [`LocationClient::new`].
    pub fn from_config(config: &FedexConfig) -> Result<Self, LocatorError> {
        let client = Self::new(
            config.credentials.clone(),
            &config.endpoint,
            config.request_timeout_secs,
            &config.user_agent,
            config.reference_offset,
        )?;
        Ok(client.with_debug(config.debug))
    }

    /// When enabled, full request XML and raw reply bodies are logged at
    /// `debug` level. Credentials appear in the request body, so keep this
    /// off outside of troubleshooting.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Validates `options` and runs the search.
    ///
    /// # Errors
    ///
    /// - [`LocatorError::MissingParameter`] if no address was given; nothing
    ///   is sent.
    /// - Anything [`LocationClient::search`] returns.
    pub async fn process_request(
        &self,
        options: LocationQueryOptions,
    ) -> Result<Vec<Location>, LocatorError> {
        let query = LocationQuery::new(options)?;
        self.search(&query).await
    }

    /// Sends one `SearchLocationsRequest` and maps the reply.
    ///
    /// Locations come back in carrier order (nearest first).
    ///
    /// # Errors
    ///
    /// - [`LocatorError::Rate`] if FedEx did not report success, including
    ///   replies whose body is not well-formed XML.
    /// - [`LocatorError::Http`] on network failure.
    pub async fn search(&self, query: &LocationQuery) -> Result<Vec<Location>, LocatorError> {
        let body = build_search_locations_xml(
            query,
            &self.credentials,
            Utc::now(),
            self.reference_offset,
        )?;

        tracing::debug!(
            endpoint = %self.endpoint,
            street = query.street_line().unwrap_or_default(),
            postal_code = query.address().postal_code.as_deref().unwrap_or_default(),
            "sending FedEx SearchLocationsRequest"
        );
        if self.debug {
            tracing::debug!(request = %body, "FedEx request body");
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(body)
            .send()
            .await?;
        // FedEx reports SOAP faults with 5xx, so the status alone does not
        // decide the outcome.
        let status = response.status();
        let text = response.text().await?;

        if self.debug {
            tracing::debug!(%status, body = %text, "FedEx reply body");
        }

        // Gateway error pages and truncated bodies carry no reply envelope;
        // they classify as a failure like any other unrecognized reply.
        let raw = xml_tree::parse(&text).unwrap_or_else(|err| {
            tracing::warn!(%status, error = %err, "FedEx reply is not well-formed XML");
            Value::Null
        });
        match interpret_reply(&raw) {
            Ok(locations) => {
                tracing::debug!(
                    %status,
                    count = locations.len(),
                    "FedEx location search succeeded"
                );
                Ok(locations)
            }
            Err(err) => {
                tracing::warn!(%status, error = %err, "FedEx location search failed");
                Err(err)
            }
        }
    }
}
