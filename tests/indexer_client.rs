//! IndexerClient against a mock HTTP server

use algorep::batch::{AccountOutcome, BatchScorer};
use algorep::client::{AccountDataSource, ClientConfig, IndexerClient, Network};
use algorep::config::ReputationConfig;
use algorep::error::FetchError;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const TOKEN: &str = "test-token";

fn address(c: char) -> String {
    std::iter::repeat(c).take(58).collect()
}

fn client(server: &MockServer) -> IndexerClient {
    let mut config = ClientConfig::new(Network::Testnet, TOKEN).with_base_url(server.base_url());
    config.max_retries = 2;
    config.backoff_factor = 0.0;
    config.request_timeout = Duration::from_secs(2);
    IndexerClient::new(config).unwrap()
}

#[tokio::test]
async fn test_fetch_transactions_sends_key_and_limit() {
    let server = MockServer::start_async().await;
    let addr = address('A');

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/v2/accounts/{}/transactions", addr))
                .query_param("limit", "5")
                .header("X-API-Key", TOKEN);
            then.status(200).json_body(json!({
                "current-round": 100,
                "transactions": [
                    {
                        "id": "T1",
                        "tx-type": "pay",
                        "round-time": 1_700_000_000,
                        "sender": addr,
                        "payment-transaction": { "amount": 2_000_000, "receiver": "R" }
                    },
                    { "id": "T2", "tx-type": "appl", "round-time": 1_700_000_100 }
                ]
            }));
        })
        .await;

    let txns = client(&server).fetch_transactions(&addr.to_lowercase(), 5).await.unwrap();

    mock.assert_async().await;
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[0].tx_type.as_deref(), Some("pay"));
    assert_eq!(txns[0].payment.as_ref().map(|p| p.amount), Some(2_000_000));
}

#[tokio::test]
async fn test_retries_server_errors() {
    let server = MockServer::start_async().await;
    let addr = address('B');

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v2/accounts/{}/assets", addr));
            then.status(503);
        })
        .await;

    let result = client(&server).fetch_asa_holdings(&addr).await;

    assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
    // first attempt + max_retries
    assert_eq!(mock.hits_async().await, 3);
}

#[tokio::test]
async fn test_does_not_retry_client_errors() {
    let server = MockServer::start_async().await;
    let addr = address('C');

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v2/accounts/{}", addr));
            then.status(404);
        })
        .await;

    let result = client(&server).fetch_account_balance(&addr).await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_balance_and_holdings_units() {
    let server = MockServer::start_async().await;
    let addr = address('D');

    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v2/accounts/{}", addr));
            then.status(200)
                .json_body(json!({ "amount": 12_500_000, "min-balance": 100_000, "status": "Offline" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v2/accounts/{}/assets", addr));
            then.status(200).json_body(json!({
                "assets": [
                    { "asset-id": 31566704, "amount": 5_000_000, "is-frozen": false },
                    { "asset-id": 31566704, "amount": 1_000_000 },
                    { "asset-id": 10458941, "amount": 7 }
                ]
            }));
        })
        .await;

    let client = client(&server);
    let balance = client.fetch_account_balance(&addr).await.unwrap();
    assert_eq!(balance.algo_balance, 12.5);
    assert_eq!(balance.min_balance, Some(0.1));
    assert_eq!(balance.status.as_deref(), Some("Offline"));

    let holdings = client.fetch_asa_holdings(&addr).await.unwrap();
    assert_eq!(holdings.get(&31566704), Some(&6_000_000));
    assert_eq!(holdings.get(&10458941), Some(&7));
}

#[tokio::test]
async fn test_invalid_address_never_hits_network() {
    let server = MockServer::start_async().await;

    let result = client(&server).fetch_transactions("not-an-address", 10).await;

    assert!(matches!(result, Err(FetchError::InvalidAddress(_))));
}

#[tokio::test]
async fn test_batch_over_http_isolates_failing_address() {
    let server = MockServer::start_async().await;
    let good = address('E');
    let bad = address('F');

    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v2/accounts/{}/transactions", good));
            then.status(200).json_body(json!({
                "transactions": [{
                    "tx-type": "pay",
                    "round-time": 1_700_000_000,
                    "sender": good,
                    "payment-transaction": { "amount": 1_000_000, "receiver": "R" }
                }]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v2/accounts/{}/assets", good));
            then.status(200).json_body(json!({ "assets": [] }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v2/accounts/{}/transactions", bad));
            then.status(500);
        })
        .await;

    let scorer = BatchScorer::new(Arc::new(client(&server)), Arc::new(ReputationConfig::default()));
    let results = scorer
        .score_batch_at(&[good.clone(), bad.clone()], 1_700_000_000)
        .await;

    assert_eq!(results[&good].reputation_score(), Some(20.0));
    assert!(matches!(results[&bad], AccountOutcome::Failed { .. }));
}

#[tokio::test]
async fn test_malformed_record_is_ignored_not_fatal() {
    let server = MockServer::start_async().await;
    let addr = address('G');

    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v2/accounts/{}/transactions", addr));
            then.status(200).json_body(json!({
                "transactions": [
                    {
                        "id": "OK",
                        "tx-type": "pay",
                        "round-time": 1_700_000_000,
                        "sender": addr,
                        "payment-transaction": { "amount": 1_000_000, "receiver": "R" }
                    },
                    { "id": "SKEWED", "tx-type": "pay", "round-time": 1_700_000_000.5 }
                ]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v2/accounts/{}/assets", addr));
            then.status(200).json_body(json!({ "assets": [] }));
        })
        .await;

    let client = client(&server);
    let txns = client.fetch_transactions(&addr, 10).await.unwrap();
    assert_eq!(txns.len(), 2);

    let scorer = BatchScorer::new(Arc::new(client), Arc::new(ReputationConfig::default()));
    let results = scorer.score_batch_at(&[addr.clone()], 1_700_000_000).await;

    let breakdown = results[&addr].breakdown().unwrap();
    assert_eq!(breakdown.analysis.total_transactions, 1);
    assert_eq!(breakdown.analysis.ignored_transactions, 1);
    assert_eq!(breakdown.reputation_score, 20.0);
}
