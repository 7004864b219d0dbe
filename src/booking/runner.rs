//! 1日分の検索（URL組み立て → 描画 → 件数抽出 → 記録）

use tracing::{debug, error, warn};

use crate::error::ScraperError;
use crate::traits::RenderSession;

use super::extract::CountExtractor;
use super::query::build_request;
use super::types::{DayPair, DayRecord, ExtractionOutcome, SearchRequest};

pub struct DayRunner<'a, S: RenderSession> {
    session: &'a S,
    extractor: &'a CountExtractor,
    base_url: &'a str,
    location: &'a str,
}

impl<'a, S: RenderSession> DayRunner<'a, S> {
    pub fn new(
        session: &'a S,
        extractor: &'a CountExtractor,
        base_url: &'a str,
        location: &'a str,
    ) -> Self {
        Self {
            session,
            extractor,
            base_url,
            location,
        }
    }

    /// 1日分を処理する。失敗してもその日の `Errored` 記録として返す
    pub async fn run_day(&self, day_pair: DayPair) -> DayRecord {
        let request = build_request(self.base_url, self.location, day_pair);

        let outcome = match self.render_and_extract(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if e.is_per_day() {
                    warn!("Search for {} failed: {}", day_pair.check_in(), e);
                } else {
                    error!("Unexpected failure for {}: {}", day_pair.check_in(), e);
                }
                ExtractionOutcome::Errored(e.to_string())
            }
        };

        DayRecord::new(&request, outcome)
    }

    async fn render_and_extract(
        &self,
        request: &SearchRequest,
    ) -> Result<ExtractionOutcome, ScraperError> {
        debug!("Rendering {}", request.target_url());
        let page = self.session.render(request.target_url()).await?;

        debug!("Extracting count for {}", request.day_pair().check_in());
        let outcome = self.extractor.extract(&page).await;

        // 抽出の成否に関わらずページは閉じる
        self.session.release(page).await;
        outcome
    }
}
