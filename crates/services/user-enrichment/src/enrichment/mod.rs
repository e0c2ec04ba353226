//! Enrichment layer - demographic attributes from external lookup services.

mod aggregator;
mod error;
mod provider;

pub use aggregator::{EnrichmentAggregator, Enricher};
pub use error::{EnrichError, EnrichResult};
pub use provider::{
    AgePrediction, AttributeProvider, CountryCandidate, GenderPrediction, NationalityPrediction,
    ProviderKind,
};

#[cfg(any(test, feature = "test-utils"))]
pub use aggregator::MockEnricher;
