//! Fetching through FlareSolverr.
//!
//! The site sits behind Cloudflare, so the page is requested via a
//! FlareSolverr sidecar instead of directly. The core only needs "text or
//! an error" from this collaborator.

use log::{error, info};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::FeedError;

/// Timeout FlareSolverr itself applies while solving the challenge, in
/// milliseconds. The HTTP client timeout must stay above this.
const SOLVE_TIMEOUT_MS: u64 = 60_000;

#[derive(Serialize)]
struct SolveRequest<'a> {
    cmd: &'a str,
    url: &'a str,
    #[serde(rename = "maxTimeout")]
    max_timeout: u64,
}

#[derive(Deserialize)]
struct SolveResponse {
    status: String,
    #[serde(default)]
    message: String,
    solution: Option<Solution>,
}

#[derive(Deserialize)]
struct Solution {
    response: String,
}

/// Blocking client for a FlareSolverr endpoint.
pub struct FlareSolverr {
    endpoint: String,
    client: Client,
}

impl FlareSolverr {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    /// Fetch a URL through the bypass service, returning the raw page text.
    pub fn fetch(&self, url: &str) -> Result<String, FeedError> {
        info!("fetching {url} via FlareSolverr");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SolveRequest {
                cmd: "request.get",
                url,
                max_timeout: SOLVE_TIMEOUT_MS,
            })
            .send()?
            .error_for_status()?;

        let body: SolveResponse = response.json()?;
        if body.status != "ok" {
            error!("FlareSolverr returned status {:?}: {}", body.status, body.message);
            return Err(FeedError::Bypass(body.message));
        }
        let solution = body
            .solution
            .ok_or_else(|| FeedError::Bypass("response carried no solution".to_string()))?;

        info!("successfully fetched page via FlareSolverr");
        Ok(solution.response)
    }
}
