use super::{QueryExecutor, QueryResponse, http_agent, unavailable};
use crate::config::AppConfig;
use crate::errors::AreaQueryError;
use crate::query::CompiledQuery;
use std::time::Duration;
use ureq::Agent;

/// Overpass interpreter client. Queries are posted form-encoded as `data`.
#[derive(Clone)]
pub struct OverpassClient {
    url: String,
    agent: Agent,
}

impl OverpassClient {
    pub fn new(url: impl Into<String>, http_timeout: Duration) -> Self {
        Self { url: url.into(), agent: http_agent(http_timeout) }
    }

    #[must_use]
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(cfg.overpass_url.clone(), Duration::from_secs(cfg.http_timeout_secs))
    }
}

impl QueryExecutor for OverpassClient {
    fn execute(&self, query: &CompiledQuery) -> Result<QueryResponse, AreaQueryError> {
        log::debug!("posting {} byte query to {}", query.as_str().len(), self.url);
        let mut resp = self
            .agent
            .post(self.url.as_str())
            .send_form([("data", query.as_str())])
            .map_err(unavailable("overpass"))?;
        let body: QueryResponse = resp.body_mut().read_json().map_err(unavailable("overpass"))?;
        log::debug!("overpass returned {} element(s)", body.elements.len());
        Ok(body)
    }
}
