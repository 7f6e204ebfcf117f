/// FedEx web-services credentials sent in every request's authentication
/// and client-detail blocks.
///
/// Owned by the caller; the location client only reads them.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub password: String,
    pub account_number: String,
    pub meter: String,
}

impl Credentials {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        password: impl Into<String>,
        account_number: impl Into<String>,
        meter: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            password: password.into(),
            account_number: account_number.into(),
            meter: meter.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"[redacted]")
            .field("password", &"[redacted]")
            .field("account_number", &self.account_number)
            .field("meter", &self.meter)
            .finish()
    }
}
