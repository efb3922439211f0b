//! BDD step definitions for target listing feature

use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};

use sitecheck::source::{RemoteSource, TargetSource};

use crate::world::{Script, SitecheckWorld};

const LIST_URL: &str = "https://lists.example/websites";

fn serve_list(world: &mut SitecheckWorld, status: u16, body: String) {
    world.http.routes.insert(
        LIST_URL.to_string(),
        Script::Respond {
            status,
            body: Some(body),
            delay: Duration::ZERO,
        },
    );
}

#[given(expr = "a list endpoint returning {int} websites")]
fn list_with_websites(world: &mut SitecheckWorld, count: usize) {
    let targets: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "name": format!("Site {}", i),
                "url": format!("https://site{}.example/", i)
            })
        })
        .collect();
    serve_list(world, 200, serde_json::Value::from(targets).to_string());
}

#[given(expr = "a list endpoint returning {string}")]
fn list_with_body(world: &mut SitecheckWorld, body: String) {
    serve_list(world, 200, body);
}

#[given(expr = "a list endpoint that responds with status {int}")]
fn list_with_status(world: &mut SitecheckWorld, status: u16) {
    serve_list(world, status, "[]".to_string());
}

#[when("the targets are listed")]
async fn list_targets(world: &mut SitecheckWorld) {
    let source = RemoteSource::new(LIST_URL, None, Arc::new(world.http.clone()));
    world.listed = Some(source.list_targets().await);
}

#[then(expr = "{int} targets should be listed")]
fn targets_listed(world: &mut SitecheckWorld, expected: usize) {
    let listed = world.listed.as_ref().expect("targets not listed");
    assert_eq!(listed.len(), expected);
}
