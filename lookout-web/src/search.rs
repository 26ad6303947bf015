use crate::{Query, ResultSet};
use async_trait::async_trait;
use lookout_common::Result;

/// Anything that can turn a query into an ordered result set with one request.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &Query) -> Result<ResultSet>;

    /// Short provider name used in logs.
    fn name(&self) -> &str;
}
