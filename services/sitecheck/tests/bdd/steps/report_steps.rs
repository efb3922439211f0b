//! BDD step definitions for reporting feature

use std::sync::Arc;

use cucumber::{given, then, when};

use sitecheck::check::{CheckResult, Outcome, Target, TargetId};
use sitecheck::config::{CollectorConfig, PayloadFormat};
use sitecheck::engine::report_best_effort;
use sitecheck::report::CollectorReporter;

use crate::world::SitecheckWorld;

const COLLECTOR_URL: &str = "https://collector.example/check-now";

#[given(expr = "results where {string} is online and {string} is offline")]
fn online_and_offline_results(world: &mut SitecheckWorld, online: String, offline: String) {
    world.report_results = vec![
        CheckResult {
            target: Target::new(online, "https://online.example").with_id(TargetId::Number(1)),
            latency_ms: Some(80),
            outcome: Outcome::Online { code: 200 },
        },
        CheckResult {
            target: Target::new(offline, "https://offline.example").with_id(TargetId::Number(2)),
            latency_ms: Some(15_000),
            outcome: Outcome::Timeout,
        },
    ];
}

#[given(expr = "a collector that responds with status {int}")]
fn collector_status(world: &mut SitecheckWorld, status: u16) {
    world.http.collector_status = status;
}

#[when(expr = "the results are reported in {string} format")]
async fn report_results(world: &mut SitecheckWorld, format: String) {
    let mut config = CollectorConfig::new(COLLECTOR_URL);
    config.payload = match format.as_str() {
        "compact" => PayloadFormat::Compact,
        "full" => PayloadFormat::Full,
        other => panic!("Unknown payload format: {}", other),
    };
    let reporter = CollectorReporter::new(&config, Arc::new(world.http.clone()));
    world.report_delivered = Some(report_best_effort(&reporter, &world.report_results).await);
}

#[then("the report should be delivered")]
fn report_delivered(world: &mut SitecheckWorld) {
    assert_eq!(world.report_delivered, Some(true));
}

#[then("the report should not be delivered")]
fn report_not_delivered(world: &mut SitecheckWorld) {
    assert_eq!(world.report_delivered, Some(false));
}

#[then(expr = "the collector should have received {int} payload(s)")]
async fn collector_received(world: &mut SitecheckWorld, expected: usize) {
    assert_eq!(world.http.posts.read().await.len(), expected);
}

#[then(expr = "the payload source should be {string}")]
async fn payload_source(world: &mut SitecheckWorld, expected: String) {
    let posts = world.http.posts.read().await;
    assert_eq!(posts[0]["source"], expected.as_str());
}

#[then(regex = r"^the payload status bits should be ([\d, ]+)$")]
async fn payload_status_bits(world: &mut SitecheckWorld, bits: String) {
    let expected: Vec<u64> = bits.split(',').map(|b| b.trim().parse().unwrap()).collect();
    let posts = world.http.posts.read().await;
    let actual: Vec<u64> = posts[0]["checks"]
        .as_array()
        .expect("checks is an array")
        .iter()
        .map(|record| record["s"].as_u64().unwrap())
        .collect();
    assert_eq!(actual, expected);
}

#[then(expr = "the first payload record should have name {string} and status {string}")]
async fn first_full_record(world: &mut SitecheckWorld, name: String, status: String) {
    let posts = world.http.posts.read().await;
    let record = &posts[0]["checks"][0];
    assert_eq!(record["name"], name.as_str());
    assert_eq!(record["status"], status.as_str());
}
