//! Live adapter for the Qwen `DashScope` API — the task-based backend
//! variant.
//!
//! Submission creates a job. The very first response is protocol-ambiguous:
//! the endpoint may answer with terminal results directly (short-circuiting
//! to synchronous behavior) or with a task id that must be polled. Both
//! branches are inherent to the upstream service and both are handled
//! explicitly here.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::codec::{EncodedImage, RawResult, ResultNormalizer};
use crate::error::BoardError;
use crate::model::{QWEN_DESCRIBE_MODEL, QWEN_IMAGE_MODEL};
use crate::poller::{QueryFuture, StatusQuery, TaskPoller, TaskStatus};
use crate::ports::describer::{DescribeFuture, SketchDescriber};
use crate::ports::image_provider::{ImageProvider, SubmitFuture, SubmitRequest};
use crate::prompt::DESCRIBE_PROMPT;

/// Default API base for the international `DashScope` endpoint.
pub const QWEN_API_BASE: &str = "https://dashscope-intl.aliyuncs.com";

/// Deadline for one submit or status-query call.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(120);

/// Live Qwen backend.
pub struct QwenProvider {
    client: Client,
    api_key: String,
    base_url: String,
    poller: TaskPoller,
    normalizer: ResultNormalizer,
}

impl QwenProvider {
    /// Create a Qwen backend with the default polling budget.
    #[must_use]
    pub fn new(api_key: String, base_url: String) -> Self {
        Self::with_poller(api_key, base_url, TaskPoller::default())
    }

    /// Create a Qwen backend with an explicit poller, for deployments that
    /// need a different attempt budget or interval.
    #[must_use]
    pub fn with_poller(api_key: String, base_url: String, poller: TaskPoller) -> Self {
        let client = Client::builder().timeout(SUBMIT_TIMEOUT).build().unwrap_or_default();
        Self { client, api_key, base_url, poller, normalizer: ResultNormalizer::new() }
    }

    fn generation_url(&self) -> String {
        format!(
            "{}/api/v1/services/aigc/multimodal-generation/generation",
            self.base_url.trim_end_matches('/')
        )
    }

    fn task_url(&self, task_id: &str) -> String {
        format!("{}/api/v1/tasks/{task_id}", self.base_url.trim_end_matches('/'))
    }

    /// Check the HTTP status and parse the common response envelope.
    async fn read_output(response: reqwest::Response) -> Result<QwenOutput, BoardError> {
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(BoardError::ProviderError {
                status: status.as_u16(),
                message: response_text,
            });
        }

        let parsed: QwenResponse = serde_json::from_str(&response_text)
            .map_err(|e| BoardError::MalformedResponse(format!("unparseable response: {e}")))?;
        Ok(parsed.output)
    }

    async fn normalize_first(&self, results: Vec<RawResult>) -> Result<EncodedImage, BoardError> {
        let first = results.into_iter().next().ok_or_else(|| {
            BoardError::MalformedResponse("task succeeded without results".to_string())
        })?;
        self.normalizer.normalize(first).await
    }
}

impl ImageProvider for QwenProvider {
    fn submit(&self, request: &SubmitRequest) -> SubmitFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let payload = serde_json::json!({
                "model": QWEN_IMAGE_MODEL,
                "input": {
                    "messages": [{
                        "role": "user",
                        "content": [
                            {"image": request.image.to_data_uri()},
                            {"text": request.prompt}
                        ]
                    }]
                },
                "parameters": {
                    "n": 1,
                    "watermark": false
                }
            });

            let response = self
                .client
                .post(self.generation_url())
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("X-DashScope-Async", "enable")
                .json(&payload)
                .send()
                .await?;

            let output = Self::read_output(response).await?;
            match output.to_status()? {
                TaskStatus::Succeeded(results) => {
                    tracing::debug!("submit answered with terminal results, skipping poll");
                    self.normalize_first(results).await
                }
                TaskStatus::Failed { message } => Err(BoardError::TaskFailed { message }),
                TaskStatus::Submitted | TaskStatus::Running => {
                    let task_id = output.task_id.ok_or_else(|| {
                        BoardError::MalformedResponse(
                            "non-terminal response without task id".to_string(),
                        )
                    })?;
                    tracing::debug!(task_id, "job created, polling");
                    let results = self.poller.poll(self, &task_id).await?;
                    self.normalize_first(results).await
                }
            }
        })
    }
}

impl StatusQuery for QwenProvider {
    fn query(&self, task_id: &str) -> QueryFuture<'_> {
        let url = self.task_url(task_id);
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .send()
                .await?;
            let output = Self::read_output(response).await?;
            output.to_status()
        })
    }
}

impl SketchDescriber for QwenProvider {
    fn describe(&self, image: &EncodedImage) -> DescribeFuture<'_> {
        let image = image.clone();
        Box::pin(async move {
            let payload = serde_json::json!({
                "model": QWEN_DESCRIBE_MODEL,
                "input": {
                    "messages": [{
                        "role": "user",
                        "content": [
                            {"image": image.to_data_uri()},
                            {"text": DESCRIBE_PROMPT}
                        ]
                    }]
                }
            });

            let response = self
                .client
                .post(self.generation_url())
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&payload)
                .send()
                .await?;

            let output = Self::read_output(response).await?;
            output.first_choice_text().map(|t| t.trim().to_string()).ok_or_else(|| {
                BoardError::MalformedResponse("no description text in response".to_string())
            })
        })
    }
}

// --- DashScope API response types ---

#[derive(Deserialize)]
struct QwenResponse {
    output: QwenOutput,
}

#[derive(Deserialize)]
struct QwenOutput {
    task_id: Option<String>,
    task_status: Option<String>,
    results: Option<Vec<QwenResultEntry>>,
    code: Option<String>,
    message: Option<String>,
    choices: Option<Vec<QwenChoice>>,
}

#[derive(Deserialize)]
struct QwenResultEntry {
    url: Option<String>,
    b64_image: Option<String>,
}

#[derive(Deserialize)]
struct QwenChoice {
    message: QwenMessage,
}

#[derive(Deserialize)]
struct QwenMessage {
    #[serde(default)]
    content: Vec<QwenContentItem>,
}

#[derive(Deserialize)]
struct QwenContentItem {
    text: Option<String>,
}

impl QwenOutput {
    /// Map the wire status string onto the task state machine.
    fn to_status(&self) -> Result<TaskStatus, BoardError> {
        match self.task_status.as_deref() {
            Some("PENDING") => Ok(TaskStatus::Submitted),
            Some("RUNNING") => Ok(TaskStatus::Running),
            Some("SUCCEEDED") => {
                let mut results = Vec::new();
                for entry in self.results.iter().flatten() {
                    results.push(RawResult::from_parts(
                        entry.url.clone(),
                        entry.b64_image.clone(),
                        None,
                    )?);
                }
                Ok(TaskStatus::Succeeded(results))
            }
            Some("FAILED") => Ok(TaskStatus::Failed { message: self.failure_message() }),
            Some(other) => {
                Err(BoardError::MalformedResponse(format!("unknown task status '{other}'")))
            }
            // An async job creation response may omit the status; a task id
            // alone still means the job was accepted.
            None if self.task_id.is_some() => Ok(TaskStatus::Submitted),
            None => Err(BoardError::MalformedResponse(
                "response carries neither task status nor task id".to_string(),
            )),
        }
    }

    fn failure_message(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "task failed without message".to_string(),
        }
    }

    fn first_choice_text(&self) -> Option<&str> {
        self.choices
            .iter()
            .flatten()
            .flat_map(|c| &c.message.content)
            .find_map(|item| item.text.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(json: &str) -> QwenOutput {
        let parsed: QwenResponse = serde_json::from_str(json).unwrap();
        parsed.output
    }

    #[test]
    fn terminal_success_with_inline_payload() {
        let out = output(
            r#"{"output":{"task_status":"SUCCEEDED","results":[{"b64_image":"aGVsbG8="}]},"request_id":"r1"}"#,
        );
        match out.to_status().unwrap() {
            TaskStatus::Succeeded(results) => {
                assert_eq!(results.len(), 1);
                assert!(matches!(results[0], RawResult::Inline { .. }));
            }
            other => panic!("expected Succeeded, got {other:?}"),
        }
    }

    #[test]
    fn terminal_success_with_url() {
        let out = output(
            r#"{"output":{"task_status":"SUCCEEDED","results":[{"url":"https://cdn.example/x.png"}]}}"#,
        );
        match out.to_status().unwrap() {
            TaskStatus::Succeeded(results) => {
                assert!(matches!(results[0], RawResult::Remote { .. }));
            }
            other => panic!("expected Succeeded, got {other:?}"),
        }
    }

    #[test]
    fn success_with_empty_result_entry_is_malformed() {
        let out = output(r#"{"output":{"task_status":"SUCCEEDED","results":[{}]}}"#);
        assert!(matches!(out.to_status(), Err(BoardError::MalformedResponse(_))));
    }

    #[test]
    fn pending_and_running_are_non_terminal() {
        assert!(matches!(
            output(r#"{"output":{"task_id":"t1","task_status":"PENDING"}}"#).to_status(),
            Ok(TaskStatus::Submitted)
        ));
        assert!(matches!(
            output(r#"{"output":{"task_id":"t1","task_status":"RUNNING"}}"#).to_status(),
            Ok(TaskStatus::Running)
        ));
    }

    #[test]
    fn failed_carries_code_and_message() {
        let out = output(
            r#"{"output":{"task_status":"FAILED","code":"DataInspection","message":"content rejected"}}"#,
        );
        match out.to_status().unwrap() {
            TaskStatus::Failed { message } => {
                assert_eq!(message, "DataInspection: content rejected");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn unknown_status_is_malformed() {
        let out = output(r#"{"output":{"task_status":"EXPLODED"}}"#);
        assert!(matches!(out.to_status(), Err(BoardError::MalformedResponse(_))));
    }

    #[test]
    fn task_id_without_status_counts_as_submitted() {
        let out = output(r#"{"output":{"task_id":"t1"}}"#);
        assert!(matches!(out.to_status(), Ok(TaskStatus::Submitted)));
    }

    #[test]
    fn empty_output_is_malformed() {
        let out = output(r#"{"output":{}}"#);
        assert!(matches!(out.to_status(), Err(BoardError::MalformedResponse(_))));
    }

    #[test]
    fn choice_text_extraction() {
        let out = output(
            r#"{"output":{"choices":[{"message":{"role":"assistant","content":[{"text":"a rider at dawn"}]}}]}}"#,
        );
        assert_eq!(out.first_choice_text(), Some("a rider at dawn"));
    }
}
