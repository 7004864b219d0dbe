use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::booking::{BookingScraper, RunReport};
use crate::config::{ExportFormat, SearchConfig};
use crate::error::ScraperError;

/// 件数検索リクエスト
#[derive(Debug, Clone)]
pub struct CountRequest {
    pub location: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`（この日は含まない）
    pub end_date: String,
    pub output_dir: Option<PathBuf>,
    pub export_format: Option<ExportFormat>,
    pub headless: Option<bool>,
}

impl CountRequest {
    pub fn new(
        location: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            output_dir: None,
            export_format: None,
            headless: None,
        }
    }

    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = Some(format);
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = Some(headless);
        self
    }

    /// サービスの基本設定にリクエスト側の指定を重ねる
    fn apply_to(&self, mut config: SearchConfig) -> SearchConfig {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(format) = self.export_format {
            config.export_format = format;
        }
        if let Some(headless) = self.headless {
            config.headless = headless;
        }
        config
    }
}

/// tower::Serviceを実装した件数検索サービス
///
/// 1回の呼び出しで1回分の実行（ブラウザ起動から出力まで）を行う。
#[derive(Debug, Clone, Default)]
pub struct SearchService {
    config: SearchConfig,
}

impl SearchService {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl Service<CountRequest> for SearchService {
    type Response = RunReport;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CountRequest) -> Self::Future {
        info!(
            "件数検索リクエスト受信: location={}, {}..{}",
            req.location, req.start_date, req.end_date
        );
        let config = req.apply_to(self.config.clone());

        Box::pin(async move {
            let mut scraper = BookingScraper::new(config);
            let report = scraper
                .run(&req.location, &req.start_date, &req.end_date)
                .await?;

            info!(
                "件数検索完了: found={}, not_found={}, errored={}",
                report.found_days(),
                report.not_found_days(),
                report.errored_days()
            );

            Ok(report)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_request_builder() {
        let req = CountRequest::new("高雄", "2025-01-01", "2025-01-03")
            .with_output_dir("/tmp/out")
            .with_export_format(ExportFormat::Csv)
            .with_headless(false);

        assert_eq!(req.location, "高雄");
        assert_eq!(req.start_date, "2025-01-01");
        assert_eq!(req.end_date, "2025-01-03");
        assert_eq!(req.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(req.export_format, Some(ExportFormat::Csv));
        assert_eq!(req.headless, Some(false));
    }

    #[test]
    fn test_request_overrides_service_config() {
        let base = SearchConfig::default().with_output_dir("/srv/exports");

        let untouched = CountRequest::new("台南", "2025-01-01", "2025-01-02").apply_to(base.clone());
        assert_eq!(untouched.output_dir, PathBuf::from("/srv/exports"));
        assert!(untouched.headless);

        let overridden = CountRequest::new("台南", "2025-01-01", "2025-01-02")
            .with_headless(false)
            .with_export_format(ExportFormat::Csv)
            .apply_to(base);
        assert!(!overridden.headless);
        assert_eq!(overridden.export_format, ExportFormat::Csv);
    }

    #[tokio::test]
    async fn test_invalid_range_rejected_without_browser() {
        let mut service = SearchService::default();
        let err = service
            .call(CountRequest::new("高雄", "2025-01-05", "2025-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScraperError::InvalidRange { .. }));
    }
}
