//! Booking 日別件数スクレイパーモジュール
//!
//! 日付範囲を1泊ずつ検索し、検索結果の件数を表形式で出力する

mod dates;
mod extract;
mod query;
mod runner;
mod scraper;
mod session;
mod sink;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use dates::{parse_date, DateRange, DayPairs, DATE_FORMAT};
pub use extract::{normalize_count, CountExtractor, ExtractionStrategy};
pub use query::{build_request, BOOKING_SEARCH_URL};
pub use runner::DayRunner;
pub use scraper::BookingScraper;
pub use session::{ChromeSession, RenderedPage};
pub use sink::{ExportRow, ResultSink, SinkReport, HEADERS};
pub use types::{DayPair, DayRecord, ExtractionOutcome, RunReport, SearchRequest};
