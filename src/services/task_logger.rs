//! Task audit logging.
//!
//! Every tab open and close is reported to the audit service. Reporting is
//! fire-and-forget: the workspace mutation has already committed and never
//! waits on, or rolls back because of, the audit call.

use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::types::errors::AuditError;
use crate::types::task::{ActiveTask, EXECUTION_OPEN};

/// Receives task open/close records.
pub trait TaskAuditLogger: Send {
    fn log_open(&self, task: ActiveTask);
    fn log_close(&self, task: ActiveTask);
}

/// Writes audit records to the tracing log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTaskLogger;

impl TaskAuditLogger for TracingTaskLogger {
    fn log_open(&self, task: ActiveTask) {
        debug!(task_code = %task.task_code, user = %task.user_name, "task opened");
    }

    fn log_close(&self, task: ActiveTask) {
        debug!(task_code = %task.task_code, user = %task.user_name, "task closed");
    }
}

/// Posts audit records as JSON to `<endpoint>/open` and `<endpoint>/close`.
pub struct HttpTaskLogger {
    client: reqwest::Client,
    endpoint: String,
    runtime: Handle,
}

impl HttpTaskLogger {
    /// Requests are spawned on `runtime`, so callers need not be async.
    pub fn new(endpoint: &str, runtime: Handle) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            runtime,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn dispatch(&self, action: &'static str, task: ActiveTask) {
        let client = self.client.clone();
        let url = format!("{}/{}", self.endpoint, action);
        self.runtime.spawn(async move {
            if let Err(e) = post(&client, &url, &task).await {
                warn!(task_code = %task.task_code, error = %e, "task audit {} failed", action);
            }
        });
    }
}

async fn post(client: &reqwest::Client, url: &str, task: &ActiveTask) -> Result<(), AuditError> {
    client.post(url).json(task).send().await?.error_for_status()?;
    Ok(())
}

impl TaskAuditLogger for HttpTaskLogger {
    fn log_open(&self, task: ActiveTask) {
        self.dispatch("open", task);
    }

    fn log_close(&self, task: ActiveTask) {
        self.dispatch("close", task);
    }
}

/// Keeps every record in memory. Clones share the same list.
#[derive(Debug, Default, Clone)]
pub struct RecordingTaskLogger {
    records: Arc<Mutex<Vec<ActiveTask>>>,
}

impl RecordingTaskLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ActiveTask> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn opens(&self) -> Vec<ActiveTask> {
        self.records()
            .into_iter()
            .filter(|t| t.execution_type == EXECUTION_OPEN)
            .collect()
    }

    pub fn closes(&self) -> Vec<ActiveTask> {
        self.records()
            .into_iter()
            .filter(|t| t.execution_type != EXECUTION_OPEN)
            .collect()
    }

    fn push(&self, task: ActiveTask) {
        if let Ok(mut records) = self.records.lock() {
            records.push(task);
        }
    }
}

impl TaskAuditLogger for RecordingTaskLogger {
    fn log_open(&self, task: ActiveTask) {
        self.push(task);
    }

    fn log_close(&self, task: ActiveTask) {
        self.push(task);
    }
}
