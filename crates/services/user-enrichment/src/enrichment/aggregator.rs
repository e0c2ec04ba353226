//! Enrichment aggregator - concurrent fan-out to the three providers.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use domain::AttributeSet;

use super::error::{EnrichError, EnrichResult};
use super::provider::{
    AgePrediction, AttributeProvider, GenderPrediction, NationalityPrediction, ProviderKind,
};
use crate::config::ProviderConfig;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Derives demographic attributes for a given name.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Look up age, gender and nationality for `name`.
    ///
    /// Either all three lookups succeed and are merged, or exactly one
    /// error is returned. A partially filled set is never returned.
    async fn enrich(&self, name: &str, cancel: &CancellationToken) -> EnrichResult<AttributeSet>;
}

/// Enricher backed by the three HTTP attribute providers.
#[derive(Debug, Clone)]
pub struct EnrichmentAggregator {
    age: AttributeProvider,
    gender: AttributeProvider,
    nationality: AttributeProvider,
}

impl EnrichmentAggregator {
    /// Create an aggregator from already configured providers.
    pub fn new(
        age: AttributeProvider,
        gender: AttributeProvider,
        nationality: AttributeProvider,
    ) -> Self {
        Self {
            age,
            gender,
            nationality,
        }
    }

    /// Create an aggregator whose providers share one HTTP client.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::new(
            AttributeProvider::new(ProviderKind::Age, &config.age_url, client.clone()),
            AttributeProvider::new(ProviderKind::Gender, &config.gender_url, client.clone()),
            AttributeProvider::new(ProviderKind::Nationality, &config.nationality_url, client),
        ))
    }
}

#[async_trait]
impl Enricher for EnrichmentAggregator {
    async fn enrich(&self, name: &str, cancel: &CancellationToken) -> EnrichResult<AttributeSet> {
        // Fixed three-slot join: every lookup runs to completion, none is
        // abandoned because a sibling failed.
        let lookups = async {
            tokio::join!(
                self.age.lookup::<AgePrediction>(name),
                self.gender.lookup::<GenderPrediction>(name),
                self.nationality.lookup::<NationalityPrediction>(name),
            )
        };

        let (age, gender, nationality) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(name, "Enrichment cancelled, dropping in-flight lookups");
                return Err(EnrichError::Cancelled);
            }
            slots = lookups => slots,
        };

        merge(age, gender, nationality)
    }
}

/// Merge the three slots. The first failure in slot order wins; any further
/// failures are logged and discarded.
fn merge(
    age: EnrichResult<AgePrediction>,
    gender: EnrichResult<GenderPrediction>,
    nationality: EnrichResult<NationalityPrediction>,
) -> EnrichResult<AttributeSet> {
    let failures = [age.as_ref().err(), gender.as_ref().err(), nationality.as_ref().err()];
    for discarded in failures.iter().flatten().skip(1) {
        warn!(
            provider = ?discarded.provider(),
            error = %discarded,
            "Discarding additional enrichment failure"
        );
    }

    let age = age?;
    let gender = gender?;
    let nationality = nationality?;

    Ok(AttributeSet {
        age: age.age.unwrap_or_default(),
        gender: gender.gender.unwrap_or_default(),
        country: nationality.most_likely(),
    })
}
