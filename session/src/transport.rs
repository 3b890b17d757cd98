//! FILENAME: session/src/transport.rs
//! PURPOSE: Delivery of request documents to a provider endpoint.
//! CONTEXT: The session only needs "post this XML, give me the reply", so
//! the seam is a single-method trait. Tests substitute canned responses.

use crate::config::SessionConfig;
use crate::TransportError;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

pub trait Transport {
    /// Posts `body` to `url` and returns the response body.
    fn post(&self, url: &str, body: &str) -> Result<String, TransportError>;
}

/// Blocking HTTP transport over `reqwest`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &SessionConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        // None disables the blocking client's default 30s timeout.
        builder = builder.timeout(config.timeout());
        Ok(HttpTransport {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/xml; charset=UTF-8")
            .body(body.to_string())
            .send()?;
        let status = response.status();
        let text = response.text()?;
        // <exception> bodies pass through whatever the status.
        if !status.is_success() && text.trim().is_empty() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }
        Ok(text)
    }
}
