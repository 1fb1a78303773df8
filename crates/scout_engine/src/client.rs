use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use scout_logging::{scout_debug, scout_info};
use serde::Deserialize;

use crate::poll::PollSettings;
use crate::{Candidate, FailureKind, JobError, JobHandle, JobRequest, JobStatus};

/// Progress text used when a "not ready" detail carries no status fragment.
pub const DEFAULT_PROGRESS: &str = "In Progress...";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
    pub max_prompt_file_bytes: u64,
    pub poll_interval: Duration,
    /// `None` polls until the server reports a terminal state.
    pub max_poll_attempts: Option<u32>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 5 * 1024 * 1024,
            max_prompt_file_bytes: 1024 * 1024,
            poll_interval: Duration::from_secs(5),
            max_poll_attempts: None,
        }
    }
}

impl ClientSettings {
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval,
            max_attempts: self.max_poll_attempts,
        }
    }
}

/// Remote job service operations.
#[async_trait::async_trait]
pub trait JobClient: Send + Sync {
    /// Creates a job. At most one request is sent; nothing is retried.
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, JobError>;

    /// One status query. `Ok` is either `Pending` or `Complete`; every
    /// other outcome is an error.
    async fn check_status(&self, handle: &JobHandle) -> Result<JobStatus, JobError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobClient {
    settings: ClientSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestJobClient {
    pub fn new(settings: ClientSettings) -> Result<Self, JobError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| JobError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(JobError::new(
                FailureKind::InvalidUrl,
                format!("{base} cannot be used as a base url"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| JobError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, JobError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| JobError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, JobError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(JobError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(JobError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl JobClient for ReqwestJobClient {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, JobError> {
        if request.is_empty() {
            return Err(JobError::new(
                FailureKind::EmptyInput,
                "no job description or file content provided",
            ));
        }

        let url = self.endpoint(&["sourcing-jobs"])?;
        scout_info!(
            "Creating sourcing job url={} prompt_len={} github_prompt={}",
            url,
            request.prompt_text.len(),
            request.github_prompt.is_some()
        );

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&request.body())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(http_status_error(status));
        }

        let body = self.read_body(response).await?;
        let handle = parse_job_created(&body)?;
        scout_info!("Sourcing job created job_id={}", handle.job_id);
        Ok(handle)
    }

    async fn check_status(&self, handle: &JobHandle) -> Result<JobStatus, JobError> {
        let url = self.endpoint(&["sourcing-jobs", &handle.job_id, "results"])?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        scout_debug!("Status check job_id={} status={}", handle.job_id, status);
        match status {
            StatusCode::OK => {
                let body = self.read_body(response).await?;
                parse_results(&body)
            }
            StatusCode::BAD_REQUEST => {
                let body = self.read_body(response).await?;
                parse_not_ready(&body)
            }
            other => Err(http_status_error(other)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JobCreatedBody {
    #[serde(default)]
    job_id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ResultsBody {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct NotReadyBody {
    detail: String,
}

fn parse_job_created(body: &[u8]) -> Result<JobHandle, JobError> {
    let parsed: JobCreatedBody = serde_json::from_slice(body).map_err(malformed)?;
    match parsed.job_id {
        Some(serde_json::Value::String(id)) if !id.is_empty() => Ok(JobHandle::new(id)),
        _ => Err(JobError::new(
            FailureKind::MalformedResponse,
            "did not receive a job_id from the server",
        )),
    }
}

fn parse_results(body: &[u8]) -> Result<JobStatus, JobError> {
    let parsed: ResultsBody = serde_json::from_slice(body).map_err(malformed)?;
    Ok(JobStatus::Complete {
        candidates: parsed.candidates.unwrap_or_default(),
    })
}

fn parse_not_ready(body: &[u8]) -> Result<JobStatus, JobError> {
    let parsed: NotReadyBody = serde_json::from_slice(body).map_err(malformed)?;
    Ok(JobStatus::Pending {
        message: progress_fragment(&parsed.detail),
    })
}

/// Extracts the human-readable status from a "not ready" detail such as
/// `"Job not complete: running"`. Only the text between the first and the
/// second `": "` separator is used.
pub fn progress_fragment(detail: &str) -> String {
    detail
        .split(": ")
        .nth(1)
        .filter(|fragment| !fragment.is_empty())
        .unwrap_or(DEFAULT_PROGRESS)
        .to_string()
}

fn malformed(err: serde_json::Error) -> JobError {
    JobError::new(FailureKind::MalformedResponse, err.to_string())
}

fn http_status_error(status: StatusCode) -> JobError {
    JobError::new(
        FailureKind::HttpStatus(status.as_u16()),
        status.canonical_reason().unwrap_or("unknown status"),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> JobError {
    if err.is_timeout() {
        return JobError::new(FailureKind::Timeout, err.to_string());
    }
    JobError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fragment_takes_text_after_first_separator() {
        assert_eq!(progress_fragment("Job is not complete: running"), "running");
    }

    #[test]
    fn progress_fragment_stops_at_second_separator() {
        assert_eq!(progress_fragment("Job not ready: ranking: 3/10"), "ranking");
    }

    #[test]
    fn progress_fragment_defaults_without_separator() {
        assert_eq!(progress_fragment("Job is not complete"), DEFAULT_PROGRESS);
        assert_eq!(progress_fragment("Job status: "), DEFAULT_PROGRESS);
        assert_eq!(progress_fragment(""), DEFAULT_PROGRESS);
    }

    #[test]
    fn progress_fragment_requires_space_after_colon() {
        assert_eq!(progress_fragment("status:running"), DEFAULT_PROGRESS);
    }

    #[test]
    fn job_created_requires_non_empty_string_id() {
        assert_eq!(
            parse_job_created(br#"{"job_id":"abc"}"#).unwrap(),
            JobHandle::new("abc")
        );
        for body in [
            &br#"{}"#[..],
            br#"{"job_id":""}"#,
            br#"{"job_id":null}"#,
            br#"{"job_id":7}"#,
            br#"not json"#,
        ] {
            let err = parse_job_created(body).unwrap_err();
            assert_eq!(err.kind, FailureKind::MalformedResponse);
        }
    }

    #[test]
    fn missing_or_null_candidates_mean_empty_results() {
        for body in [&br#"{}"#[..], br#"{"candidates":null}"#] {
            assert_eq!(
                parse_results(body).unwrap(),
                JobStatus::Complete {
                    candidates: Vec::new()
                }
            );
        }
    }

    #[test]
    fn not_ready_without_string_detail_is_malformed() {
        let err = parse_not_ready(br#"{"detail":[{"msg":"bad"}]}"#).unwrap_err();
        assert_eq!(err.kind, FailureKind::MalformedResponse);
    }

    #[test]
    fn endpoint_escapes_job_id_and_keeps_base_path() {
        let client = ReqwestJobClient::new(ClientSettings {
            base_url: "http://jobs.internal:8000/api/".to_string(),
            ..ClientSettings::default()
        })
        .unwrap();
        let url = client
            .endpoint(&["sourcing-jobs", "a b/c", "results"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://jobs.internal:8000/api/sourcing-jobs/a%20b%2Fc/results"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ReqwestJobClient::new(ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
