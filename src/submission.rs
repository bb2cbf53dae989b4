//! Submitting extracted tasks to a task tracker over HTTP.
//!
//! Each [`ScrapedTask`] becomes one [`TaskSubmission`] JSON body POSTed to
//! the configured endpoint. Tasks are sent one at a time in page order;
//! a failed task is recorded in the [`SubmitReport`] and the rest are
//! still attempted.

use std::time::Duration;

use duescout_extract::ScrapedTask;
use serde::{Deserialize, Serialize};

use crate::config::SubmitConfig;
use crate::error::{Result, ScoutError};

/// Response bodies longer than this are truncated in error messages.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// The JSON body sent for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    /// Task title.
    pub title: String,
    /// Due instant, ISO-8601 UTC.
    pub due_date: String,
    /// Cleaned description with breadcrumb.
    pub description: String,
    /// Initial status, from config.
    pub status: String,
    /// Priority, from config.
    pub priority: String,
    /// Labels, from config.
    pub labels: Vec<String>,
    /// Page the task was found on.
    pub source_url: String,
}

impl TaskSubmission {
    /// Builds the submission body for `task` found on `source_url`.
    pub fn from_task(task: &ScrapedTask, config: &SubmitConfig, source_url: &str) -> Self {
        Self {
            title: task.title.clone(),
            due_date: task.due_date.clone(),
            description: task.raw.clone(),
            status: config.status.clone(),
            priority: config.priority.clone(),
            labels: config.labels.clone(),
            source_url: source_url.to_owned(),
        }
    }
}

/// Builds one submission per task, preserving order.
pub fn build_submissions(
    tasks: &[ScrapedTask],
    config: &SubmitConfig,
    source_url: &str,
) -> Vec<TaskSubmission> {
    tasks
        .iter()
        .map(|task| TaskSubmission::from_task(task, config, source_url))
        .collect()
}

/// Outcome of [`Submitter::submit_all`].
#[derive(Debug, Default)]
pub struct SubmitReport {
    /// Number of tasks accepted by the tracker.
    pub submitted: usize,
    /// Titles of rejected tasks with the reason.
    pub failed: Vec<(String, ScoutError)>,
}

impl SubmitReport {
    /// Whether every task was accepted.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// HTTP client for the configured task tracker endpoint.
pub struct Submitter {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl Submitter {
    /// Creates a submitter for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Config`] if no endpoint is configured or the
    /// settings are invalid, and [`ScoutError::Http`] if the HTTP client
    /// cannot be built.
    pub fn new(config: &SubmitConfig) -> Result<Self> {
        config.validate()?;
        let Some(endpoint) = config.endpoint.clone() else {
            return Err(ScoutError::Config(
                "submit.endpoint is not configured".into(),
            ));
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            endpoint,
            api_key: config.api_key.clone(),
            client,
        })
    }

    /// The endpoint tasks are POSTed to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POSTs one task.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Http`] on transport failure and
    /// [`ScoutError::Submit`] if the tracker answers with a non-2xx status.
    pub async fn submit(&self, submission: &TaskSubmission) -> Result<()> {
        let mut request = self.client.post(&self.endpoint).json(submission);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if status.is_success() {
            tracing::debug!(title = %submission.title, %status, "task submitted");
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            let snippet: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            format!("HTTP {}: {snippet}", status.as_u16())
        };
        Err(ScoutError::Submit(message))
    }

    /// POSTs every task in order, continuing past failures.
    pub async fn submit_all(&self, submissions: &[TaskSubmission]) -> SubmitReport {
        let mut report = SubmitReport::default();
        for submission in submissions {
            match self.submit(submission).await {
                Ok(()) => report.submitted += 1,
                Err(e) => {
                    tracing::warn!(title = %submission.title, error = %e, "task submission failed");
                    report.failed.push((submission.title.clone(), e));
                }
            }
        }
        tracing::info!(
            submitted = report.submitted,
            failed = report.failed.len(),
            "submission finished"
        );
        report
    }
}
