/// Failures of the remote CI toolchain. All of them are terminal for
/// the job; a failed job must be resubmitted under a new id.
#[derive(Debug, thiserror::Error)]
pub enum GhaError {
    /// The workflow-dispatch request could not be delivered or was
    /// rejected (authentication, network, 4xx/5xx).
    #[error("Workflow dispatch failed: {0}")]
    Dispatch(String),

    /// No run matching the dispatch appeared within the discovery window.
    #[error("No workflow run found within {waited_secs}s of dispatch")]
    RunNotFound { waited_secs: u64 },

    /// The run completed with a conclusion other than `success`.
    /// The conclusion is recorded verbatim.
    #[error("workflow finished with conclusion: {conclusion}")]
    RunFailed { conclusion: String },

    /// The run did not reach a terminal status within the wait budget.
    #[error("Workflow run {run_id} did not complete within {waited_secs}s")]
    RunTimeout { run_id: i64, waited_secs: u64 },

    /// Listing or downloading the run's artifacts failed.
    #[error("Artifact download failed: {0}")]
    Download(String),

    /// The downloaded archive could not be unpacked.
    #[error("Artifact extraction failed: {0}")]
    Extraction(String),
}
