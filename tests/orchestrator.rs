//! End-to-end behavior of the orchestrator against real unit threads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use async_trait::async_trait;
use offload::{
    ComputeFn, Config, Entry, LifecycleEvent, LifecycleKind, Orchestrator, Recipe, RequestState,
    Status, Subscribe, UnitError, UnitHandle,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Job {
    arg1: String,
    arg2: String,
    limit: u64,
}

fn job(limit: u64) -> Arc<Job> {
    Arc::new(Job {
        arg1: "foo".into(),
        arg2: "bar".into(),
        limit,
    })
}

fn even_sum(job: Job) -> u64 {
    assert!(job.limit > 0, "limit must be positive");
    (0..job.limit).filter(|i| i % 2 == 0).sum()
}

fn even_sum_recipe(cfg: &Config) -> Recipe<Job, u64> {
    Recipe::from_compute(ComputeFn::arc("even-sum", even_sum), cfg)
}

/// Parks a computation: it meets `entered` once it starts and `release` before answering.
struct Gate {
    started: AtomicUsize,
    entered: Barrier,
    release: Barrier,
}

impl Gate {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            started: AtomicUsize::new(0),
            entered: Barrier::new(2),
            release: Barrier::new(2),
        })
    }
}

fn gated_recipe(gate: &Arc<Gate>, answer: u64, cfg: &Config) -> Recipe<Job, u64> {
    let gate = Arc::clone(gate);
    let compute = ComputeFn::arc("gated", move |_job: Job| {
        gate.started.fetch_add(1, Ordering::SeqCst);
        gate.entered.wait();
        gate.release.wait();
        answer
    });
    Recipe::from_compute(compute, cfg)
}

async fn settle<F>(rx: &mut watch::Receiver<RequestState<u64>>, pred: F) -> RequestState<u64>
where
    F: FnMut(&RequestState<u64>) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
        .await
        .expect("state did not settle in time")
        .expect("state channel closed")
        .clone()
}

#[tokio::test]
async fn first_activation_is_pending_then_resolves() {
    let cfg = Config::default();
    let recipe = even_sum_recipe(&cfg);
    let mut orch = Orchestrator::new(cfg);

    let first = orch.run(&recipe, &job(1_000_000));
    assert_eq!(first.status, Status::Pending);
    assert_eq!(first.result, None);
    assert_eq!(first.error, None);

    let mut rx = orch.watch();
    let done = settle(&mut rx, |s| s.status == Status::Resolved).await;
    assert_eq!(done.result, Some(249_999_500_000));
    assert_eq!(done.error, None);
}

#[tokio::test]
async fn new_input_goes_stale_and_keeps_previous_result() {
    let cfg = Config::default();
    let recipe = even_sum_recipe(&cfg);
    let mut orch = Orchestrator::new(cfg);
    let mut rx = orch.watch();

    orch.run(&recipe, &job(10));
    let r1 = settle(&mut rx, |s| s.status == Status::Resolved).await;
    assert_eq!(r1.result, Some(20));

    let stale = orch.run(&recipe, &job(100));
    assert_eq!(stale.status, Status::Stale);
    assert_eq!(stale.result, Some(20));

    let r2 = settle(&mut rx, |s| s.result == Some(2450)).await;
    assert_eq!(r2.status, Status::Resolved);
}

#[tokio::test]
async fn same_input_identity_does_not_resend() {
    let cfg = Config::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let recipe = Recipe::from_compute(
        ComputeFn::arc("count", move |job: Job| {
            counter.fetch_add(1, Ordering::SeqCst);
            job.limit
        }),
        &cfg,
    );
    let mut orch = Orchestrator::new(cfg);
    let mut rx = orch.watch();

    let input = job(3);
    orch.run(&recipe, &input);
    settle(&mut rx, |s| s.status == Status::Resolved).await;

    let again = orch.run(&recipe, &input);
    assert_eq!(again.status, Status::Resolved);

    // Equal content, new identity: a genuine new request.
    let stale = orch.run(&recipe, &job(3));
    assert_eq!(stale.status, Status::Stale);
    settle(&mut rx, |s| s.status == Status::Resolved).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unit_fault_rejects_and_clears_result() {
    let cfg = Config::default();
    let recipe = even_sum_recipe(&cfg);
    let mut orch = Orchestrator::new(cfg);
    let mut rx = orch.watch();

    orch.run(&recipe, &job(10));
    settle(&mut rx, |s| s.status == Status::Resolved).await;

    orch.run(&recipe, &job(0));
    let rejected = settle(&mut rx, |s| s.status == Status::Rejected).await;
    assert_eq!(rejected.result, None);
    assert_eq!(rejected.error, Some(UnitError::UnitFault));
    assert_eq!(rejected.error.unwrap().to_string(), "unit fault");

    // Rejected is terminal until the next request; the unit itself keeps serving.
    let pending = orch.run(&recipe, &job(10));
    assert_eq!(pending.status, Status::Pending);
    assert_eq!(pending.result, None);
    assert_eq!(pending.error, None);

    let recovered = settle(&mut rx, |s| s.status == Status::Resolved).await;
    assert_eq!(recovered.result, Some(20));
}

#[tokio::test]
async fn mistyped_unit_rejects_with_message_fault() {
    let cfg = Config::default();
    let unit_cfg = cfg.clone();
    let recipe: Recipe<Job, u64> = Recipe::new(move || {
        UnitHandle::spawn(
            Entry::handler(ComputeFn::arc("squares", |n: u64| n * n)),
            &unit_cfg,
        )
    });
    let mut orch = Orchestrator::new(cfg);
    let mut rx = orch.watch();

    orch.run(&recipe, &job(4));
    let rejected = settle(&mut rx, |s| s.status == Status::Rejected).await;
    assert_eq!(rejected.error, Some(UnitError::MessageFault));
    assert_eq!(rejected.error.unwrap().to_string(), "message fault");
}

#[tokio::test]
async fn spawn_failure_surfaces_as_rejected_state() {
    let recipe: Recipe<Job, u64> = Recipe::new(|| {
        Err(UnitError::Spawn {
            error: "thread limit reached".into(),
        })
    });
    let mut orch = Orchestrator::new(Config::default());

    let state = orch.run(&recipe, &job(4));
    assert_eq!(state.status, Status::Rejected);
    assert!(matches!(state.error, Some(UnitError::Spawn { .. })));
}

#[tokio::test]
async fn late_response_after_teardown_is_ignored() {
    let cfg = Config::default();
    let gate = Gate::new();
    let recipe = gated_recipe(&gate, 99, &cfg);
    let mut orch = Orchestrator::new(cfg);
    let rx = orch.watch();

    let pending = orch.run(&recipe, &job(1));
    assert_eq!(pending.status, Status::Pending);
    gate.entered.wait();

    orch.deactivate();
    assert!(!orch.is_live());

    // Let the computation finish and answer into a torn-down subscription.
    gate.release.wait();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(orch.snapshot(), pending);
    assert_eq!(*rx.borrow(), pending);

    // Re-activation after teardown is a no-op.
    let after = orch.run(&recipe, &job(2));
    assert_eq!(after, pending);
}

#[tokio::test]
async fn recipe_change_replaces_the_unit() {
    let cfg = Config::default();
    let gate = Gate::new();
    let slow = gated_recipe(&gate, 1, &cfg);
    let fast = Recipe::from_compute(ComputeFn::arc("fast", |_job: Job| 2u64), &cfg);
    let mut orch = Orchestrator::new(cfg);
    let mut rx = orch.watch();
    let mut events = orch.lifecycle();

    let input = job(5);
    assert_eq!(orch.run(&slow, &input).status, Status::Pending);
    gate.entered.wait();

    // Same input, new recipe: old unit is disposed and the input re-sent.
    assert_eq!(orch.run(&fast, &input).status, Status::Pending);
    let resolved = settle(&mut rx, |s| s.status == Status::Resolved).await;
    assert_eq!(resolved.result, Some(2));

    gate.release.wait();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(orch.snapshot().result, Some(2));

    let mut kinds = Vec::new();
    while let Ok(ev) = events.try_recv() {
        kinds.push((ev.kind, ev.binding));
    }
    assert!(kinds.contains(&(LifecycleKind::UnitSpawned, Some(1))));
    assert!(kinds.contains(&(LifecycleKind::UnitDisposed, Some(1))));
    assert!(kinds.contains(&(LifecycleKind::UnitSpawned, Some(2))));
    assert!(kinds.contains(&(LifecycleKind::ResponseDelivered, Some(2))));
    assert!(!kinds.contains(&(LifecycleKind::ResponseDelivered, Some(1))));
}

#[tokio::test]
async fn disposed_unit_skips_queued_requests() {
    let cfg = Config::default();
    let gate = Gate::new();
    let slow = gated_recipe(&gate, 1, &cfg);
    let fast = Recipe::from_compute(ComputeFn::arc("fast", |_job: Job| 2u64), &cfg);
    let mut orch = Orchestrator::new(cfg);
    let mut rx = orch.watch();

    orch.run(&slow, &job(1));
    gate.entered.wait();
    // Queued behind the running computation.
    for limit in 2..5 {
        orch.run(&slow, &job(limit));
    }

    orch.run(&fast, &job(5));
    gate.release.wait();

    let resolved = settle(&mut rx, |s| s.status == Status::Resolved).await;
    assert_eq!(resolved.result, Some(2));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(gate.started.load(Ordering::SeqCst), 1);
    assert_eq!(orch.snapshot().result, Some(2));
}

#[tokio::test]
async fn dropping_the_orchestrator_disposes_the_unit() {
    let cfg = Config::default();
    let gate = Gate::new();
    let recipe = gated_recipe(&gate, 7, &cfg);
    let mut orch = Orchestrator::new(cfg);
    let rx = orch.watch();
    let mut events = orch.lifecycle();

    let pending = orch.run(&recipe, &job(1));
    gate.entered.wait();
    drop(orch);
    gate.release.wait();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(*rx.borrow(), pending);
    let mut kinds = Vec::new();
    while let Ok(ev) = events.try_recv() {
        kinds.push((ev.kind, ev.binding));
    }
    assert!(kinds.contains(&(LifecycleKind::UnitDisposed, Some(1))));
    assert!(!kinds.iter().any(|(k, _)| *k == LifecycleKind::ResponseDelivered));
}

struct Unencodable;

impl Serialize for Unencodable {
    fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("refuses to encode"))
    }
}

#[tokio::test]
async fn unencodable_input_rejects_with_message_fault() {
    let cfg = Config::default();
    let unit_cfg = cfg.clone();
    let recipe: Recipe<Unencodable, u64> = Recipe::new(move || {
        UnitHandle::spawn(Entry::handler(ComputeFn::arc("id", |n: u64| n)), &unit_cfg)
    });
    let mut orch = Orchestrator::new(cfg);
    let mut events = orch.lifecycle();

    let state = orch.run(&recipe, &Arc::new(Unencodable));
    assert_eq!(state.status, Status::Rejected);
    assert_eq!(state.result, None);
    assert_eq!(state.error, Some(UnitError::MessageFault));

    let mut kinds = Vec::new();
    while let Ok(ev) = events.try_recv() {
        kinds.push(ev.kind);
    }
    assert!(kinds.contains(&LifecycleKind::MessageFaulted));
    assert!(!kinds.contains(&LifecycleKind::RequestSent));
}

#[tokio::test]
async fn unit_thread_uses_configured_name_and_stack() {
    let mut cfg = Config::default();
    cfg.thread_name = "offload-test-unit".into();
    cfg.stack_size = 4 * 1024 * 1024;
    let recipe: Recipe<Job, Option<String>> = Recipe::from_compute(
        ComputeFn::arc("whoami", |_job: Job| {
            std::thread::current().name().map(str::to_owned)
        }),
        &cfg,
    );
    let mut orch = Orchestrator::new(cfg);
    let mut rx = orch.watch();

    orch.run(&recipe, &job(1));
    let done = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.status == Status::Resolved),
    )
    .await
    .expect("state did not settle in time")
    .expect("state channel closed")
    .clone();
    assert_eq!(done.result, Some(Some("offload-test-unit".to_owned())));
}

#[test]
fn inconsistent_initial_state_is_normalized() {
    let orch: Orchestrator<Job, u64> = Orchestrator::builder(Config::default())
        .with_initial_state(RequestState {
            status: Status::Resolved,
            result: None,
            error: Some(UnitError::UnitFault),
        })
        .build();

    let seeded = orch.snapshot();
    assert!(seeded.is_consistent());
    assert_eq!(seeded, RequestState::idle());
}

#[tokio::test]
async fn initial_state_seeds_the_first_snapshot() {
    let cfg = Config::default();
    let recipe = even_sum_recipe(&cfg);
    let mut orch = Orchestrator::builder(cfg)
        .with_initial_state(RequestState::with_result(7))
        .build();
    assert_eq!(orch.snapshot().result, Some(7));

    let pending = orch.run(&recipe, &job(10));
    assert_eq!(pending.status, Status::Pending);
    assert_eq!(pending.result, Some(7));
}

#[derive(Default)]
struct Recorder {
    kinds: Mutex<Vec<LifecycleKind>>,
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, ev: &LifecycleEvent) {
        self.kinds.lock().push(ev.kind);
    }

    fn name(&self) -> &str {
        "recorder"
    }
}

#[tokio::test]
async fn subscribers_see_the_full_lifecycle() {
    let cfg = Config::default();
    let recipe = even_sum_recipe(&cfg);
    let recorder = Arc::new(Recorder::default());
    let subs: Vec<Arc<dyn Subscribe>> = vec![recorder.clone()];
    let mut orch = Orchestrator::builder(cfg)
        .with_subscribers(subs)
        .build();
    let mut rx = orch.watch();

    orch.run(&recipe, &job(10));
    settle(&mut rx, |s| s.status == Status::Resolved).await;
    orch.deactivate();

    let seen = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let kinds = recorder.kinds.lock().clone();
            if kinds.contains(&LifecycleKind::UnitDisposed) {
                return kinds;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("subscriber did not observe teardown");

    assert_eq!(
        seen,
        vec![
            LifecycleKind::UnitSpawned,
            LifecycleKind::RequestSent,
            LifecycleKind::ResponseDelivered,
            LifecycleKind::UnitDisposed,
        ]
    );
}

struct Stuck;

#[async_trait]
impl Subscribe for Stuck {
    async fn on_event(&self, _ev: &LifecycleEvent) {
        std::future::pending::<()>().await;
    }

    fn name(&self) -> &str {
        "stuck"
    }
}

#[tokio::test]
async fn slow_subscriber_overflow_shows_on_the_lifecycle_stream() {
    let mut cfg = Config::default();
    cfg.subscriber_capacity = 1;
    let recipe = even_sum_recipe(&cfg);
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Stuck)];
    let mut orch = Orchestrator::builder(cfg).with_subscribers(subs).build();
    let mut events = orch.lifecycle();

    // UnitSpawned fills the queue before the worker runs; RequestSent overflows it.
    orch.run(&recipe, &job(10));

    let mut overflow = None;
    while let Ok(ev) = events.try_recv() {
        if ev.kind == LifecycleKind::SubscriberOverflow {
            overflow = Some(ev);
            break;
        }
    }
    let ev = overflow.expect("overflow was not reported");
    assert_eq!(ev.unit.as_deref(), Some("stuck"));
    assert_eq!(ev.reason.as_deref(), Some("full"));
}
