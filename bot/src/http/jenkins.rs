//! Jenkins REST client

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::app::options::JenkinsOptions;
use crate::errors::{BridgeError, FetchError};
use crate::models::{BuildStatus, BuildTriggerResult};

/// Operations the bridge performs against the CI server
#[async_trait]
pub trait BuildServer: Send + Sync {
    /// Queue a new build of the configured job.
    ///
    /// Every call starts another build; callers must not retry blindly.
    async fn trigger_build(&self) -> BuildTriggerResult;

    /// Fetch the latest build of the configured job
    async fn fetch_latest_status(&self) -> Result<BuildStatus, FetchError>;
}

/// HTTP client for a single Jenkins job
pub struct JenkinsClient {
    client: Client,
    build_url: Url,
    status_url: Url,
    user: String,
    token: SecretString,
}

impl JenkinsClient {
    /// Create a new Jenkins client for the job described by `options`
    pub fn new(options: &JenkinsOptions) -> Result<Self, BridgeError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            build_url: job_url(&options.base_url, &options.job, &["build"])?,
            status_url: job_url(&options.base_url, &options.job, &["lastBuild", "api", "json"])?,
            user: options.user.clone(),
            token: options.token.clone(),
        })
    }
}

#[async_trait]
impl BuildServer for JenkinsClient {
    async fn trigger_build(&self) -> BuildTriggerResult {
        debug!("POST {}", self.build_url);

        let response = match self
            .client
            .post(self.build_url.clone())
            .basic_auth(&self.user, Some(self.token.expose_secret()))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Jenkins build trigger failed: {}", e);
                return BuildTriggerResult::network_error(e.to_string());
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read Jenkins trigger response body: {}", e);
                String::new()
            }
        };
        let result = BuildTriggerResult::from_response(status.as_u16(), body);

        if result.succeeded {
            info!("Jenkins build queued");
        } else {
            warn!("Jenkins build trigger rejected: {} - {}", status, result.raw_body);
        }
        result
    }

    async fn fetch_latest_status(&self) -> Result<BuildStatus, FetchError> {
        debug!("GET {}", self.status_url);

        let response = self
            .client
            .get(self.status_url.clone())
            .basic_auth(&self.user, Some(self.token.expose_secret()))
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to read Jenkins status response body: {}", e);
                    String::new()
                }
            };
            error!("Jenkins status fetch failed: {} - {}", status, body);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(FetchError::Transport)?;
        let build_status = serde_json::from_slice::<BuildStatus>(&bytes)?;
        debug!("Latest build: {:?}", build_status);
        Ok(build_status)
    }
}

/// Build `{base}/job/{job}/{tail..}`, encoding the job name as one segment
fn job_url(base_url: &str, job: &str, tail: &[&str]) -> Result<Url, BridgeError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| BridgeError::ConfigError(format!("invalid Jenkins URL {base_url}: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| BridgeError::ConfigError(format!("Jenkins URL cannot be a base: {base_url}")))?
        .pop_if_empty()
        .push("job")
        .push(job)
        .extend(tail);

    Ok(url)
}
