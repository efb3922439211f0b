//! BDD step definitions for batch feature

use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};

use sitecheck::batch::BatchRunner;
use sitecheck::check::{Status, Target};
use sitecheck::config::{BatchConfig, ProbeConfig, Scheduling};
use sitecheck::probe::Prober;

use crate::world::{Script, SitecheckWorld};

fn parse_scheduling(s: &str) -> Scheduling {
    match s {
        "chunked" => Scheduling::Chunked,
        "pooled" => Scheduling::Pooled,
        other => panic!("Unknown scheduling: {}", other),
    }
}

#[given(regex = r"^websites answering after ([\d, ]+) milliseconds$")]
fn websites_with_delays(world: &mut SitecheckWorld, delays: String) {
    for delay in delays.split(',').map(|d| d.trim().parse::<u64>().unwrap()) {
        let index = world.targets.len();
        let url = format!("https://site{}.example/", index);
        world.http.routes.insert(
            url.clone(),
            Script::Respond {
                status: 200,
                body: None,
                delay: Duration::from_millis(delay),
            },
        );
        world.targets.push(Target::new(format!("site{}", index), url));
    }
}

#[given("an unreachable website")]
fn unreachable_website(world: &mut SitecheckWorld) {
    let index = world.targets.len();
    world.targets.push(Target::new(
        format!("site{}", index),
        format!("https://unreachable{}.example/", index),
    ));
}

#[when(expr = "the batch runs with a concurrency limit of {int} using {string} scheduling")]
async fn run_batch(world: &mut SitecheckWorld, limit: usize, scheduling: String) {
    let prober = Prober::new(&ProbeConfig::default(), Arc::new(world.http.clone()));
    let runner = BatchRunner::new(
        prober,
        &BatchConfig {
            concurrency: Some(limit),
            scheduling: parse_scheduling(&scheduling),
        },
    );
    world.batch_results = Some(runner.run(&world.targets).await);
}

#[then(expr = "there should be {int} results")]
fn result_count(world: &mut SitecheckWorld, expected: usize) {
    let results = world.batch_results.as_ref().expect("batch not run");
    assert_eq!(results.len(), expected);
}

#[then("the results should be in input order")]
fn results_in_order(world: &mut SitecheckWorld) {
    let results = world.batch_results.as_ref().expect("batch not run");
    let result_names: Vec<&str> = results.iter().map(|r| r.target.name.as_str()).collect();
    let target_names: Vec<&str> = world.targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(result_names, target_names);
}

#[then(expr = "result {int} should be {string}")]
fn result_status(world: &mut SitecheckWorld, position: usize, expected: String) {
    let results = world.batch_results.as_ref().expect("batch not run");
    let expected = match expected.as_str() {
        "Online" => Status::Online,
        "Offline" => Status::Offline,
        other => panic!("Unknown status: {}", other),
    };
    assert_eq!(results[position - 1].status(), expected);
}
