use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::balance::Balance;
use crate::error::{QschedError, Result};
use crate::ids::{AccountId, RequestId, WorkerId};
use crate::priority::Priority;
use crate::time::{zero_time, Timestamp};

/// A queued or running task request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub id: RequestId,
    /// Account this request charges to. May name an unknown account.
    #[serde(default)]
    pub account_id: AccountId,
    /// Time at which the request was enqueued.
    #[serde(default)]
    pub enqueue_time: Option<Timestamp>,
    #[serde(default)]
    pub base_labels: BTreeSet<String>,
    #[serde(default)]
    pub provisionable_labels: BTreeSet<String>,
}

impl TaskRequest {
    pub fn new(
        id: impl Into<RequestId>,
        account_id: impl Into<AccountId>,
        enqueue_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: account_id.into(),
            enqueue_time: Some(enqueue_time.into()),
            base_labels: BTreeSet::new(),
            provisionable_labels: BTreeSet::new(),
        }
    }

    /// Resolve the stored enqueue time.
    ///
    /// Errors only for a malformed stored value; a missing value is the zero
    /// time.
    pub fn try_enqueued_at(&self) -> Result<DateTime<Utc>> {
        match &self.enqueue_time {
            Some(ts) => ts.to_datetime(),
            None => Ok(zero_time()),
        }
    }

    /// Enqueue time, with a missing or malformed value read as the zero time.
    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.try_enqueued_at().unwrap_or_else(|_| zero_time())
    }
}

/// Run-related information about a task currently running on a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRun {
    pub request: TaskRequest,
    /// Priority the task is currently running at.
    #[serde(default)]
    pub priority: Priority,
}

/// A worker that is either idle or running one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub running_task: Option<TaskRun>,
}

impl Worker {
    pub fn idle(id: impl Into<WorkerId>) -> Self {
        Self {
            id: id.into(),
            labels: BTreeSet::new(),
            running_task: None,
        }
    }

    pub fn running(id: impl Into<WorkerId>, request: TaskRequest, priority: Priority) -> Self {
        Self {
            id: id.into(),
            labels: BTreeSet::new(),
            running_task: Some(TaskRun { request, priority }),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.running_task.is_none()
    }

    /// Account of the running task. `None` for idle workers and for tasks
    /// without an account.
    pub fn running_account(&self) -> Option<&AccountId> {
        self.running_task
            .as_ref()
            .map(|run| &run.request.account_id)
            .filter(|id| !id.is_empty())
    }
}

/// Snapshot of a pool's scheduler state: balances, queued requests and
/// workers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StateRepr", into = "StateRepr")]
pub struct State {
    balances: HashMap<AccountId, Balance>,
    requests: HashMap<RequestId, TaskRequest>,
    workers: HashMap<WorkerId, Worker>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of an account. Accounts without a balance read as all-zero.
    pub fn balance(&self, id: &AccountId) -> Balance {
        self.balances.get(id).copied().unwrap_or_default()
    }

    pub fn set_balance(&mut self, id: impl Into<AccountId>, balance: Balance) {
        self.balances.insert(id.into(), balance);
    }

    /// Enqueue a request. Its id must be non-empty and not already queued or
    /// running.
    pub fn add_request(&mut self, request: TaskRequest) -> Result<()> {
        if request.id.is_empty() {
            return Err(QschedError::EmptyRequestId);
        }
        if self.is_known_request(&request.id) {
            return Err(QschedError::DuplicateRequest(request.id));
        }
        self.requests.insert(request.id.clone(), request);
        Ok(())
    }

    /// Add a worker, idle or running.
    pub fn add_worker(&mut self, worker: Worker) -> Result<()> {
        if worker.id.is_empty() {
            return Err(QschedError::EmptyWorkerId);
        }
        if self.workers.contains_key(&worker.id) {
            return Err(QschedError::DuplicateWorker(worker.id));
        }
        if let Some(run) = &worker.running_task {
            if run.request.id.is_empty() {
                return Err(QschedError::EmptyRequestId);
            }
            if self.is_known_request(&run.request.id) {
                return Err(QschedError::DuplicateRequest(run.request.id.clone()));
            }
        }
        self.workers.insert(worker.id.clone(), worker);
        Ok(())
    }

    pub fn balances(&self) -> &HashMap<AccountId, Balance> {
        &self.balances
    }

    /// Queued requests, keyed by request id.
    pub fn requests(&self) -> &HashMap<RequestId, TaskRequest> {
        &self.requests
    }

    pub fn workers(&self) -> &HashMap<WorkerId, Worker> {
        &self.workers
    }

    fn is_known_request(&self, id: &RequestId) -> bool {
        self.requests.contains_key(id)
            || self
                .workers
                .values()
                .filter_map(|w| w.running_task.as_ref())
                .any(|run| &run.request.id == id)
    }
}

/// Serialized layout of [`State`]: requests and workers as lists, so ids are
/// not repeated as map keys.
#[derive(Serialize, Deserialize)]
struct StateRepr {
    #[serde(default)]
    balances: HashMap<AccountId, Balance>,
    #[serde(default)]
    requests: Vec<TaskRequest>,
    #[serde(default)]
    workers: Vec<Worker>,
}

impl TryFrom<StateRepr> for State {
    type Error = QschedError;

    fn try_from(repr: StateRepr) -> Result<Self> {
        let mut state = State {
            balances: repr.balances,
            ..State::default()
        };
        for worker in repr.workers {
            state.add_worker(worker)?;
        }
        for request in repr.requests {
            state.add_request(request)?;
        }
        Ok(state)
    }
}

impl From<State> for StateRepr {
    fn from(state: State) -> Self {
        let mut requests: Vec<_> = state.requests.into_values().collect();
        requests.sort_by(|a, b| a.id.cmp(&b.id));
        let mut workers: Vec<_> = state.workers.into_values().collect();
        workers.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            balances: state.balances,
            requests,
            workers,
        }
    }
}
