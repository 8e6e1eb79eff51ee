//! Sequential upload pipeline over the parsed CSV rows.
//!
//! Rows are dispatched strictly one at a time so the log order matches the
//! file order and the store's request-rate ceiling is respected. A row's
//! failure is logged and contained; the run always continues to the next row.

use std::time::Duration;

use crate::collection;
use crate::csv_input::RowRecord;
use crate::error::RowError;
use crate::logger::RunLogger;
use crate::shopify::{CollectionEnvelope, ShopifyClient, Sleeper, TokioSleeper};
use crate::ui::RunProgress;

/// Counts for one invocation. Not persisted; the log file is the durable
/// record and the report pass can re-derive these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows that reached the transform/network stage.
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Blank-title rows, noted in the log but never sent.
    pub skipped: usize,
}

/// Drives rows through transform → write → log, with fixed pacing.
pub struct UploadRunner<S: Sleeper = TokioSleeper> {
    client: ShopifyClient<S>,
    logger: RunLogger,
    pace: Duration,
    progress: Option<RunProgress>,
}

impl<S: Sleeper> UploadRunner<S> {
    pub fn new(client: ShopifyClient<S>, logger: RunLogger, pace: Duration) -> Self {
        Self {
            client,
            logger,
            pace,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: RunProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run every row in file order and return the tally.
    pub async fn run(&mut self, rows: &[RowRecord]) -> RunSummary {
        let mut summary = RunSummary::default();
        let total = rows.len();

        for (index, row) in rows.iter().enumerate() {
            let position = index + 1;
            let title = row.title.trim().to_string();

            if title.is_empty() {
                self.logger
                    .record(&format!("Row {position}: skipped (missing title)"));
                summary.skipped += 1;
                continue;
            }

            if let Some(progress) = &self.progress {
                progress.row(position, total, &title);
            }

            summary.processed += 1;
            match self.create_collection(row).await {
                Ok(()) => summary.succeeded += 1,
                Err(err) => {
                    self.logger
                        .record(&format!("Row {position} \"{title}\": ERROR -> {err}"));
                    summary.failed += 1;
                }
            }

            // ~2 req/sec against the REST rate limit.
            tokio::time::sleep(self.pace).await;
        }

        if let Some(progress) = &self.progress {
            progress.finish();
        }
        summary
    }

    async fn create_collection(&mut self, row: &RowRecord) -> Result<(), RowError> {
        let payload = collection::build_payload(row)?;
        let body = self
            .client
            .post_collection(payload.kind().endpoint(), &payload)
            .await?;

        let envelope: CollectionEnvelope =
            serde_json::from_value(body.clone()).unwrap_or_default();
        match envelope.created() {
            Some((kind, created)) => self.logger.record(&format!(
                "Created {kind}: id={} handle={}",
                created.id, created.handle
            )),
            None => self.logger.record(&format!("Unexpected response: {body}")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::csv_input::parse_records;
    use crate::shopify::RetryPolicy;

    fn runner(server: &MockServer, log_path: &std::path::Path) -> UploadRunner {
        let client = ShopifyClient::with_policy(
            "shpat_test".into(),
            server.uri(),
            RetryPolicy::default(),
        );
        UploadRunner::new(client, RunLogger::open(log_path), Duration::ZERO)
    }

    #[tokio::test]
    async fn end_to_end_single_custom_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/custom_collections.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "custom_collection": {"id": 42, "handle": "widgets"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("run.log");
        let rows = parse_records("title,type\nWidgets,custom\n").unwrap();

        let summary = runner(&server, &log_path).run(&rows).await;

        assert_eq!(
            summary,
            RunSummary {
                processed: 1,
                succeeded: 1,
                failed: 0,
                skipped: 0,
            }
        );
        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("Created custom: id=42 handle=widgets"));
    }

    #[tokio::test]
    async fn transform_failure_is_contained_to_its_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/custom_collections.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "custom_collection": {"id": 1, "handle": "ok"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("run.log");
        // Row 2 is smart with no rules_json, so its transform fails.
        let rows = parse_records(
            "title,type\nAlpha,custom\nBroken,smart\nGamma,custom\n",
        )
        .unwrap();

        let summary = runner(&server, &log_path).run(&rows).await;

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 0);

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("Row 2 \"Broken\": ERROR -> Smart collection \"Broken\" missing rules_json"));
    }

    #[tokio::test]
    async fn blank_title_rows_are_skipped_without_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "custom_collection": {"id": 9, "handle": "last"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("run.log");
        let rows = parse_records("title\n\" \"\nLast\n").unwrap();

        let summary = runner(&server, &log_path).run(&rows).await;

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.succeeded, 1);

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("Row 1: skipped (missing title)"));
        assert!(log.contains("Created custom: id=9 handle=last"));
    }

    #[tokio::test]
    async fn write_failure_logs_error_and_continues() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/custom_collections.json"))
            .respond_with(
                ResponseTemplate::new(422).set_body_string("handle already taken"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/smart_collections.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "smart_collection": {"id": 3, "handle": "fresh"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("run.log");
        let rows = parse_records(
            "title,type,rules_json\nDupe,custom,\nFresh,smart,\"[{\"\"column\"\":\"\"tag\"\",\"\"relation\"\":\"\"equals\"\",\"\"condition\"\":\"\"new\"\"}]\"\n",
        )
        .unwrap();

        let summary = runner(&server, &log_path).run(&rows).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("Row 1 \"Dupe\": ERROR -> API returned status 422: handle already taken"));
        assert!(log.contains("Created smart: id=3 handle=fresh"));
    }

    #[tokio::test]
    async fn unexpected_envelope_counts_as_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "collect": {"id": 5}
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("run.log");
        let rows = parse_records("title\nOdd\n").unwrap();

        let summary = runner(&server, &log_path).run(&rows).await;

        assert_eq!(summary.succeeded, 1);
        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("Unexpected response:"));
    }
}
