//! REST client for the GitHub Actions endpoints.
//!
//! Wraps workflow dispatch, run listing/detail, and artifact
//! listing/download for one repository using [`reqwest`].

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};

use crate::types::{ArtifactsResponse, DispatchInputs, RunsResponse, WorkflowArtifact, WorkflowRun};

/// Target repository and credentials for the Actions API.
#[derive(Debug, Clone)]
pub struct GhaConfig {
    /// API base, e.g. `https://api.github.com`.
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    /// Workflow filename under `.github/workflows`, e.g. `build.yml`.
    pub workflow_file: String,
    /// Git ref the dispatch targets, e.g. `main`.
    pub git_ref: String,
    /// Personal access token with `actions` scope.
    pub token: String,
}

/// HTTP client for a single repository's Actions API.
pub struct GhaApi {
    client: reqwest::Client,
    config: GhaConfig,
}

/// Errors from the Actions REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GhaApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("GitHub API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl GhaApi {
    /// Create a new API client for one repository.
    pub fn new(config: GhaConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("apkforge"));
        if let Ok(auth) = HeaderValue::from_str(&format!("token {}", config.token)) {
            headers.insert(AUTHORIZATION, auth);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("failed to build HTTP client");

        Self { client, config }
    }

    fn workflow_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/actions/workflows/{}{suffix}",
            self.config.api_base, self.config.owner, self.config.repo, self.config.workflow_file
        )
    }

    fn run_url(&self, run_id: i64, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/actions/runs/{run_id}{suffix}",
            self.config.api_base, self.config.owner, self.config.repo
        )
    }

    /// Trigger a `workflow_dispatch` event with the given inputs.
    ///
    /// The API acknowledges with 204 and no body; the created run must
    /// be discovered separately via [`list_runs`](Self::list_runs).
    pub async fn dispatch_workflow(&self, inputs: &DispatchInputs) -> Result<(), GhaApiError> {
        let body = serde_json::json!({
            "ref": self.config.git_ref,
            "inputs": inputs,
        });

        let response = self
            .client
            .post(self.workflow_url("/dispatches"))
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// List recent runs of the workflow, newest first.
    pub async fn list_runs(&self) -> Result<Vec<WorkflowRun>, GhaApiError> {
        let response = self.client.get(self.workflow_url("/runs")).send().await?;
        let runs: RunsResponse = Self::parse_response(response).await?;
        Ok(runs.workflow_runs)
    }

    /// Fetch one run's current status and conclusion.
    pub async fn get_run(&self, run_id: i64) -> Result<WorkflowRun, GhaApiError> {
        let response = self.client.get(self.run_url(run_id, "")).send().await?;
        Self::parse_response(response).await
    }

    /// List the artifacts produced by a run.
    pub async fn list_artifacts(&self, run_id: i64) -> Result<Vec<WorkflowArtifact>, GhaApiError> {
        let response = self
            .client
            .get(self.run_url(run_id, "/artifacts"))
            .send()
            .await?;
        let artifacts: ArtifactsResponse = Self::parse_response(response).await?;
        Ok(artifacts.artifacts)
    }

    /// Download an artifact archive (zip) into memory.
    pub async fn download_artifact(&self, archive_url: &str) -> Result<Vec<u8>, GhaApiError> {
        let response = self.client.get(archive_url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`GhaApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GhaApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GhaApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GhaApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), GhaApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> GhaApi {
        GhaApi::new(GhaConfig {
            api_base: "https://api.github.com".into(),
            owner: "acme".into(),
            repo: "build-server".into(),
            workflow_file: "build.yml".into(),
            git_ref: "main".into(),
            token: "t0ken".into(),
        })
    }

    #[test]
    fn workflow_urls_are_well_formed() {
        let api = api();
        assert_eq!(
            api.workflow_url("/dispatches"),
            "https://api.github.com/repos/acme/build-server/actions/workflows/build.yml/dispatches"
        );
        assert_eq!(
            api.workflow_url("/runs"),
            "https://api.github.com/repos/acme/build-server/actions/workflows/build.yml/runs"
        );
    }

    #[test]
    fn run_urls_are_well_formed() {
        let api = api();
        assert_eq!(
            api.run_url(42, "/artifacts"),
            "https://api.github.com/repos/acme/build-server/actions/runs/42/artifacts"
        );
    }
}
