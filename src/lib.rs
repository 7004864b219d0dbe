//! Booking 日別宿泊施設数スクレイパーライブラリ
//!
//! - 指定地域・日付範囲を1泊ずつ Booking で検索
//! - 検索結果ページから件数を抽出し、xlsx / csv に出力
//!
//! # 使用例
//!
//! ```rust,ignore
//! use booking_count::{BookingScraper, SearchConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SearchConfig::new().with_output_dir("./exports");
//!     let mut scraper = BookingScraper::new(config);
//!
//!     let report = scraper.run("高雄", "2025-01-01", "2025-01-08").await.unwrap();
//!     println!("{:?}", report.artifact);
//! }
//! ```
//!
//! # tower::Service 経由
//!
//! ```rust,ignore
//! use booking_count::{CountRequest, SearchService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = SearchService::default();
//!     let request = CountRequest::new("高雄", "2025-01-01", "2025-01-08").with_headless(false);
//!     let report = service.call(request).await.unwrap();
//!     println!("found days: {}", report.found_days());
//! }
//! ```

pub mod booking;
pub mod config;
pub mod error;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use booking::{
    BookingScraper, ChromeSession, CountExtractor, DateRange, DayPair, DayRecord,
    ExtractionOutcome, ExtractionStrategy, ResultSink, RunReport, SearchRequest, SinkReport,
};
pub use config::{ExportFormat, SearchConfig};
pub use error::ScraperError;
pub use service::{CountRequest, SearchService};
pub use traits::{DomQuery, RenderSession};
