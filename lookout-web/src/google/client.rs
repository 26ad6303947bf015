use crate::google::types::CseResponse;
use crate::{Query, ResultSet, SearchBackend};
use async_trait::async_trait;
use lookout_common::{LookoutError, Result};
use lookout_config::{Credentials, SearchSettings};
use lookout_http::{Auth, HttpClient, HttpError, RequestOpts};
use std::time::Duration;

#[derive(Clone)]
pub struct GoogleSearch {
    http: HttpClient,
    credentials: Credentials,
}

impl GoogleSearch {
    /// Build a client for `settings.endpoint` with a hard per-request timeout.
    pub fn new(credentials: Credentials, settings: &SearchSettings) -> Result<Self> {
        let http = HttpClient::new(&settings.endpoint)
            .map_err(|e| LookoutError::Config(format!("search endpoint: {e}")))?
            .with_timeout(Duration::from_secs(settings.timeout_secs));
        Ok(Self { http, credentials })
    }
}

#[async_trait]
impl SearchBackend for GoogleSearch {
    async fn search(&self, query: &Query) -> Result<ResultSet> {
        let resp: CseResponse = self
            .http
            .get_json(
                "",
                RequestOpts {
                    query: Some(vec![
                        ("q", query.as_str().into()),
                        ("cx", self.credentials.engine_id().into()),
                    ]),
                    auth: Some(Auth::query("key", self.credentials.api_key())),
                    ..Default::default()
                },
            )
            .await
            .map_err(http_to_lookout)?;

        let info = resp.search_information.unwrap_or_default();
        let results = ResultSet::new(resp.items.into_iter().flatten().map(Into::into));
        tracing::info!(
            backend = self.name(),
            query_len = query.as_str().len(),
            results = results.len(),
            total_results = ?info.total_results,
            search_time = ?info.search_time,
            "search.completed"
        );
        Ok(results)
    }

    fn name(&self) -> &str {
        "google"
    }
}

fn http_to_lookout(e: HttpError) -> LookoutError {
    if e.is_timeout() {
        LookoutError::Timeout
    } else {
        LookoutError::Request(e.to_string())
    }
}
