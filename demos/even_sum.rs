//! # Example: even_sum
//!
//! Offloads a CPU-bound loop to a background unit and follows the request state
//! through one input change.
//!
//! ## Flow
//! ```text
//! run(&recipe, &job_a) ──► Pending ──► Resolved(sum_a)
//! run(&recipe, &job_b) ──► Stale(sum_a) ──► Resolved(sum_b)
//! deactivate()         ──► unit disposed
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=offload=debug cargo run --example even_sum --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use offload::{ComputeFn, Config, LogWriter, Orchestrator, Recipe, Status, Subscribe};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize)]
struct Job {
    arg1: String,
    arg2: String,
    limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Sum {
    label: String,
    total: u64,
}

fn even_sum(job: Job) -> Sum {
    let total = (0..job.limit).filter(|i| i % 2 == 0).sum();
    Sum {
        label: format!("{}{}", job.arg1, job.arg2),
        total,
    }
}

fn job(limit: u64) -> Arc<Job> {
    Arc::new(Job {
        arg1: "foo".into(),
        arg2: "bar".into(),
        limit,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("offload=debug".parse()?))
        .init();

    let mut cfg = Config::default();
    cfg.thread_name = "even-sum-unit".into();

    let recipe = Recipe::from_compute(ComputeFn::arc("even-sum", even_sum), &cfg);
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let mut orch = Orchestrator::builder(cfg).with_subscribers(subs).build();
    let mut rx = orch.watch();

    for limit in [10_000_000, 10] {
        let state = orch.run(&recipe, &job(limit));
        println!("[main] limit={limit} -> {} (showing {:?})", state.status.as_label(), state.result);

        let done = rx
            .wait_for(|s| s.status == Status::Resolved || s.status == Status::Rejected)
            .await?
            .clone();
        println!("[main] limit={limit} -> {} {:?}", done.status.as_label(), done.result);
    }

    orch.deactivate();
    // Give the log subscriber a moment to flush the teardown event.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
