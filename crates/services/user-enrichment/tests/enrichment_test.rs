//! Integration tests for the enrichment layer against stubbed providers.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use domain::AttributeSet;
use user_enrichment_lib::config::ProviderConfig;
use user_enrichment_lib::enrichment::{
    AgePrediction, AttributeProvider, EnrichError, Enricher, EnrichmentAggregator, ProviderKind,
};

/// Three stub servers, one per provider.
struct Providers {
    age: MockServer,
    gender: MockServer,
    nationality: MockServer,
}

impl Providers {
    async fn start() -> Self {
        Self {
            age: MockServer::start_async().await,
            gender: MockServer::start_async().await,
            nationality: MockServer::start_async().await,
        }
    }

    fn aggregator(&self) -> EnrichmentAggregator {
        EnrichmentAggregator::from_config(&ProviderConfig {
            age_url: self.age.url("/"),
            gender_url: self.gender.url("/"),
            nationality_url: self.nationality.url("/"),
        })
        .unwrap()
    }

    async fn answer(&self, name: &str, age: i32, gender: &str, country: &str) {
        self.age
            .mock_async(|when, then| {
                when.method(GET).path("/").query_param("name", name);
                then.status(200)
                    .json_body(json!({ "count": 1, "name": name, "age": age }));
            })
            .await;
        self.gender
            .mock_async(|when, then| {
                when.method(GET).path("/").query_param("name", name);
                then.status(200)
                    .json_body(json!({ "name": name, "gender": gender, "probability": 0.99 }));
            })
            .await;
        self.nationality
            .mock_async(|when, then| {
                when.method(GET).path("/").query_param("name", name);
                then.status(200).json_body(json!({
                    "name": name,
                    "country": [
                        { "country_id": country, "probability": 0.6 },
                        { "country_id": "XX", "probability": 0.1 }
                    ]
                }));
            })
            .await;
    }
}

#[tokio::test]
async fn all_providers_succeed() {
    let providers = Providers::start().await;
    providers.answer("Dmitriy", 42, "male", "UA").await;

    let attributes = providers
        .aggregator()
        .enrich("Dmitriy", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        attributes,
        AttributeSet {
            age: 42,
            gender: "male".to_string(),
            country: "UA".to_string(),
        }
    );
}

#[tokio::test]
async fn empty_predictions_become_defaults() {
    let providers = Providers::start().await;
    providers
        .age
        .mock_async(|when, then| {
            when.method(GET).query_param("name", "Zzyzx");
            then.status(200).json_body(json!({ "count": 0, "age": null }));
        })
        .await;
    providers
        .gender
        .mock_async(|when, then| {
            when.method(GET).query_param("name", "Zzyzx");
            then.status(200).json_body(json!({ "gender": null }));
        })
        .await;
    providers
        .nationality
        .mock_async(|when, then| {
            when.method(GET).query_param("name", "Zzyzx");
            then.status(200).json_body(json!({ "country": [] }));
        })
        .await;

    let attributes = providers
        .aggregator()
        .enrich("Zzyzx", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(attributes, AttributeSet::default());
}

#[tokio::test]
async fn non_success_status_fails_the_whole_enrichment() {
    let providers = Providers::start().await;
    providers
        .age
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({ "age": 30 }));
        })
        .await;
    providers
        .gender
        .mock_async(|when, then| {
            when.method(GET);
            then.status(500).body("upstream exploded");
        })
        .await;
    providers
        .nationality
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({ "country": [{ "country_id": "RU" }] }));
        })
        .await;

    let err = providers
        .aggregator()
        .enrich("Oleg", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EnrichError::Status {
            provider: ProviderKind::Gender,
            ..
        }
    ));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let providers = Providers::start().await;
    providers
        .age
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).body("{ not json");
        })
        .await;
    providers
        .gender
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({ "gender": "male" }));
        })
        .await;
    providers
        .nationality
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({ "country": [] }));
        })
        .await;

    let err = providers
        .aggregator()
        .enrich("Oleg", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EnrichError::Decode {
            provider: ProviderKind::Age,
            ..
        }
    ));
}

#[tokio::test]
async fn several_failures_still_yield_one_error_after_every_lookup_ran() {
    let providers = Providers::start().await;
    let age = providers
        .age
        .mock_async(|when, then| {
            when.method(GET);
            then.status(503);
        })
        .await;
    let gender = providers
        .gender
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({ "gender": "female" }));
        })
        .await;
    let nationality = providers
        .nationality
        .mock_async(|when, then| {
            when.method(GET);
            then.status(404);
        })
        .await;

    let err = providers
        .aggregator()
        .enrich("Anna", &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.provider(), Some(ProviderKind::Age));
    age.assert_async().await;
    gender.assert_async().await;
    nationality.assert_async().await;
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
    let provider = AttributeProvider::new(
        ProviderKind::Age,
        "http://127.0.0.1:1/",
        reqwest::Client::new(),
    );

    let err = provider.lookup::<AgePrediction>("Oleg").await.unwrap_err();

    assert!(matches!(
        err,
        EnrichError::Transport {
            provider: ProviderKind::Age,
            ..
        }
    ));
}

#[tokio::test]
async fn concurrent_enrichments_do_not_mix_results() {
    let providers = Providers::start().await;
    let people = [
        ("Anna", 31, "female", "PL"),
        ("Boris", 52, "male", "RU"),
        ("Chen", 27, "male", "CN"),
        ("Dana", 44, "female", "IL"),
    ];
    for (name, age, gender, country) in people {
        providers.answer(name, age, gender, country).await;
    }

    let aggregator = providers.aggregator();
    let cancel = CancellationToken::new();
    let results = futures::future::join_all(
        people
            .iter()
            .map(|(name, _, _, _)| aggregator.enrich(name, &cancel)),
    )
    .await;

    for ((_, age, gender, country), result) in people.iter().zip(results) {
        let attributes = result.unwrap();
        assert_eq!(attributes.age, *age);
        assert_eq!(attributes.gender, *gender);
        assert_eq!(attributes.country, *country);
    }
}

#[tokio::test]
async fn cancellation_interrupts_slow_lookups() {
    let providers = Providers::start().await;
    for server in [&providers.age, &providers.gender, &providers.nationality] {
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200)
                    .delay(Duration::from_secs(10))
                    .json_body(json!({}));
            })
            .await;
    }

    let aggregator = providers.aggregator();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = tokio::time::timeout(Duration::from_secs(5), aggregator.enrich("Oleg", &cancel))
        .await
        .expect("enrichment should stop once cancelled")
        .unwrap_err();

    assert!(matches!(err, EnrichError::Cancelled));
    assert_eq!(err.provider(), None);
}
