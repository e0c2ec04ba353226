//! Attribute providers: one HTTP lookup service per attribute.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::error::{EnrichError, EnrichResult};

/// Which attribute a provider predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Age,
    Gender,
    Nationality,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Age => write!(f, "age"),
            ProviderKind::Gender => write!(f, "gender"),
            ProviderKind::Nationality => write!(f, "nationality"),
        }
    }
}

/// Payload of the age provider: `{ "age": 42 }`.
#[derive(Debug, Clone, Deserialize)]
pub struct AgePrediction {
    pub age: Option<i32>,
}

/// Payload of the gender provider: `{ "gender": "male" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenderPrediction {
    pub gender: Option<String>,
}

/// Payload of the nationality provider, candidates ordered by likelihood.
#[derive(Debug, Clone, Deserialize)]
pub struct NationalityPrediction {
    pub country: Option<Vec<CountryCandidate>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryCandidate {
    pub country_id: String,
}

impl NationalityPrediction {
    /// The first candidate's country code, or empty when there is none.
    pub fn most_likely(&self) -> String {
        self.country
            .as_deref()
            .and_then(|candidates| candidates.first())
            .map(|candidate| candidate.country_id.clone())
            .unwrap_or_default()
    }
}

/// HTTP client for one lookup service, queried as `<base_url>?name=<name>`.
#[derive(Debug, Clone)]
pub struct AttributeProvider {
    kind: ProviderKind,
    base_url: String,
    client: reqwest::Client,
}

impl AttributeProvider {
    /// Create a provider sharing the given HTTP client.
    pub fn new(kind: ProviderKind, base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            kind,
            base_url: base_url.into(),
            client,
        }
    }

    /// Perform one GET and decode the full body into `P`.
    pub async fn lookup<P: DeserializeOwned>(&self, name: &str) -> EnrichResult<P> {
        debug!(provider = %self.kind, name, "Looking up attribute");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|source| EnrichError::Transport {
                provider: self.kind,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Status {
                provider: self.kind,
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| EnrichError::Transport {
                provider: self.kind,
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| EnrichError::Decode {
            provider: self.kind,
            source,
        })
    }
}
