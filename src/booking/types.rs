//! Booking 日別検索の型定義

use std::fmt;

use chrono::NaiveDate;

use super::sink::SinkReport;

/// 1泊分のチェックイン/チェックアウト日
///
/// チェックアウトは常にチェックインの翌日。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayPair {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl DayPair {
    /// `check_in` から1泊。翌日が表現できない日付は `None`
    pub fn starting(check_in: NaiveDate) -> Option<Self> {
        check_in.succ_opt().map(|check_out| Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }
}

/// 1日分の検索リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    location: String,
    day_pair: DayPair,
    target_url: String,
}

impl SearchRequest {
    pub(crate) fn new(location: String, day_pair: DayPair, target_url: String) -> Self {
        Self {
            location,
            day_pair,
            target_url,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn day_pair(&self) -> DayPair {
        self.day_pair
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }
}

/// 件数抽出の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Found(u64),
    NotFound,
    Errored(String),
}

impl ExtractionOutcome {
    /// 件数なし（NotFound / Errored）の表示値
    pub const SENTINEL: &'static str = "N/A";

    pub fn count(&self) -> Option<u64> {
        match self {
            ExtractionOutcome::Found(count) => Some(*count),
            _ => None,
        }
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, ExtractionOutcome::Errored(_))
    }
}

impl fmt::Display for ExtractionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionOutcome::Found(count) => write!(f, "{}", count),
            _ => f.write_str(Self::SENTINEL),
        }
    }
}

/// 出力1行分の記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub location: String,
    pub outcome: ExtractionOutcome,
    pub target_url: String,
}

impl DayRecord {
    pub fn new(request: &SearchRequest, outcome: ExtractionOutcome) -> Self {
        Self {
            check_in: request.day_pair.check_in,
            check_out: request.day_pair.check_out,
            location: request.location.clone(),
            outcome,
            target_url: request.target_url.clone(),
        }
    }
}

/// 1回の実行結果
#[derive(Debug)]
pub struct RunReport {
    /// 日付順の記録
    pub records: Vec<DayRecord>,
    pub artifact: SinkReport,
}

impl RunReport {
    pub fn found_days(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, ExtractionOutcome::Found(_)))
            .count()
    }

    pub fn not_found_days(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == ExtractionOutcome::NotFound)
            .count()
    }

    pub fn errored_days(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_errored()).count()
    }
}
