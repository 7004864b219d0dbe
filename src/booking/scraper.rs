//! 日付範囲全体の検索を実行する

use tracing::{info, warn};

use crate::config::SearchConfig;
use crate::error::ScraperError;
use crate::traits::RenderSession;

use super::dates::{DateRange, DATE_FORMAT};
use super::extract::CountExtractor;
use super::runner::DayRunner;
use super::session::ChromeSession;
use super::sink::ResultSink;
use super::types::{ExtractionOutcome, RunReport};

/// Booking 日別件数スクレイパー
pub struct BookingScraper<S: RenderSession = ChromeSession> {
    config: SearchConfig,
    session: S,
    extractor: CountExtractor,
}

impl BookingScraper<ChromeSession> {
    pub fn new(config: SearchConfig) -> Self {
        let session = ChromeSession::new(&config);
        Self::with_session(config, session)
    }
}

impl<S: RenderSession> BookingScraper<S> {
    pub fn with_session(config: SearchConfig, session: S) -> Self {
        Self {
            config,
            session,
            extractor: CountExtractor::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: CountExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// 日付範囲 `[start, end)` を1日ずつ検索して出力する
    ///
    /// 日付の検証とブラウザ起動の失敗はエラーとして返す。各日の失敗は記録に残して続行する。
    pub async fn run(
        &mut self,
        location: &str,
        start: &str,
        end: &str,
    ) -> Result<RunReport, ScraperError> {
        let range = DateRange::parse(start, end)?;
        let total_days = range.total_days();

        self.session.open().await?;

        info!("=== Searching {} ===", location);
        info!(
            "Period: {} to {} ({} searches)",
            range.start().format(DATE_FORMAT),
            range.end().format(DATE_FORMAT),
            total_days
        );

        let mut sink = ResultSink::new(location, range);
        let runner = DayRunner::new(
            &self.session,
            &self.extractor,
            &self.config.base_url,
            location,
        );

        for (i, day_pair) in range.days().enumerate() {
            info!(
                "[{}/{}] Searching {} (checkout {})",
                i + 1,
                total_days,
                day_pair.check_in().format(DATE_FORMAT),
                day_pair.check_out().format(DATE_FORMAT)
            );

            let record = runner.run_day(day_pair).await;
            match &record.outcome {
                ExtractionOutcome::Errored(message) => warn!("   -> error: {}", message),
                outcome => info!("   -> count: {}", outcome),
            }
            sink.push(record);
        }

        if let Err(e) = self.session.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        let artifact = sink.finalize(
            &self.config.output_dir,
            self.config.export_format,
            &self.config.file_prefix,
        )?;

        Ok(RunReport {
            records: sink.into_records(),
            artifact,
        })
    }
}
