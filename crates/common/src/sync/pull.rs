use serde::{Deserialize, Serialize};

use super::{SyncError, SyncService};
use crate::identity::IdentityProvider;
use crate::op_log::{Cursor, OpLogProvider, Operation};

/// One page of the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullPage {
    /// Pass this back as `since` to continue
    pub cursor: Cursor,
    #[serde(rename = "ops")]
    pub operations: Vec<Operation>,
}

fn parse_since(since: Option<&str>) -> Cursor {
    since
        .and_then(|s| s.trim().parse::<Cursor>().ok())
        .filter(|c| *c >= 0)
        .unwrap_or(0)
}

fn parse_limit(limit: Option<&str>, default: u32, max: u32) -> u32 {
    let requested = limit
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(default as i64);
    requested.clamp(1, max.max(1) as i64) as u32
}

impl<I, L> SyncService<I, L>
where
    I: IdentityProvider,
    L: OpLogProvider,
{
    /// Read the page of ops after `since`
    ///
    /// Both parameters arrive as raw query strings. Garbage falls back to
    /// the defaults rather than failing the request.
    pub async fn pull(
        &self,
        since: Option<&str>,
        limit: Option<&str>,
    ) -> Result<PullPage, SyncError> {
        let since = parse_since(since);
        let limit = parse_limit(
            limit,
            self.config.default_pull_limit,
            self.config.max_pull_limit,
        );

        let operations = self.log.since(since, limit).await?;
        let cursor = operations.last().map(|op| op.seq).unwrap_or(since);

        tracing::debug!(since, limit, cursor, count = operations.len(), "pull served");

        Ok(PullPage { cursor, operations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_since() {
        assert_eq!(parse_since(None), 0);
        assert_eq!(parse_since(Some("")), 0);
        assert_eq!(parse_since(Some("abc")), 0);
        assert_eq!(parse_since(Some("-4")), 0);
        assert_eq!(parse_since(Some("17")), 17);
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None, 400, 800), 400);
        assert_eq!(parse_limit(Some("x"), 400, 800), 400);
        assert_eq!(parse_limit(Some("0"), 400, 800), 1);
        assert_eq!(parse_limit(Some("-10"), 400, 800), 1);
        assert_eq!(parse_limit(Some("5"), 400, 800), 5);
        assert_eq!(parse_limit(Some("100000"), 400, 800), 800);
    }
}
