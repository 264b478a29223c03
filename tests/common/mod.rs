//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use pushkind_realty::api::{ApiClient, ApiError, ApiResult, ListRequest, Mutation};
use pushkind_realty::domain::query::{FilterConfig, SortConfig, SortDir, ViewSchema};
use pushkind_realty::providers::{RowProvider, RowResult};

type Responder = Box<dyn Fn(&ListRequest) -> ApiResult<Value> + Send + Sync>;

/// Scripted backend recording every request it receives.
pub struct StubApi {
    responder: Responder,
    requests: Mutex<Vec<ListRequest>>,
    mutations: Mutex<Vec<Mutation>>,
    fail_mutations: AtomicBool,
}

impl StubApi {
    pub fn new(responder: impl Fn(&ListRequest) -> ApiResult<Value> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            mutations: Mutex::new(Vec::new()),
            fail_mutations: AtomicBool::new(false),
        }
    }

    /// Always answers with `body`.
    pub fn returning(body: Value) -> Self {
        Self::new(move |_| Ok(body.clone()))
    }

    pub fn failing_mutations(self) -> Self {
        self.fail_mutations.store(true, Ordering::SeqCst);
        self
    }

    pub fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().clone()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().clone()
    }
}

impl ApiClient for StubApi {
    fn get_json(&self, request: &ListRequest) -> impl Future<Output = ApiResult<Value>> + Send {
        self.requests.lock().push(request.clone());
        let response = (self.responder)(request);
        async move { response }
    }

    fn send_json(&self, mutation: &Mutation) -> impl Future<Output = ApiResult<Value>> + Send {
        self.mutations.lock().push(mutation.clone());
        let response = if self.fail_mutations.load(Ordering::SeqCst) {
            Err(ApiError::Status {
                status: 500,
                body: "internal error".to_string(),
            })
        } else {
            Ok(Value::Null)
        };
        async move { response }
    }
}

/// `count` active clients paged the way the backend pages them.
pub fn paged_clients(count: usize) -> impl Fn(&ListRequest) -> ApiResult<Value> + Send + Sync {
    move |request| {
        let page: usize = request.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let limit: usize = request.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);
        let records: Vec<Value> = (1..=count)
            .skip((page - 1) * limit)
            .take(limit)
            .map(|n| json!({"id": n, "name": format!("Клиент {n}"), "status": "active"}))
            .collect();
        Ok(json!({"records": records, "total_records": count}))
    }
}

/// Provider whose responses are released by the test, in any order.
/// It ignores cancellation on purpose.
pub struct GatedProvider {
    schema: ViewSchema,
    gates: Mutex<VecDeque<oneshot::Receiver<RowResult<u32>>>>,
    calls: AtomicUsize,
}

impl GatedProvider {
    pub fn new() -> Self {
        Self {
            schema: ViewSchema::new(
                vec![FilterConfig::select("status", "Статус", &[("Активные", "active")])],
                SortConfig::new("name", SortDir::Asc, &[("Имя", "name")]),
            ),
            gates: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Registers the response of the next call.
    pub fn gate(&self) -> oneshot::Sender<RowResult<u32>> {
        let (sender, receiver) = oneshot::channel();
        self.gates.lock().push_back(receiver);
        sender
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RowProvider for GatedProvider {
    type Row = u32;

    fn schema(&self) -> &ViewSchema {
        &self.schema
    }

    fn get_rows(&self, _cancel: CancellationToken) -> impl Future<Output = RowResult<u32>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().pop_front();
        async move {
            match gate {
                Some(gate) => gate.await.unwrap_or_else(|_| RowResult::cancelled()),
                None => RowResult::ok(Vec::new(), 0),
            }
        }
    }
}

/// Polls `condition` until it holds or a second passes.
pub async fn eventually(condition: impl Fn() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}
