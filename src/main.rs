//! 対話式CLI
//!
//! 実行方法:
//! ```
//! cargo run --bin booking-count
//! ```
//!
//! 環境変数: BOOKING_OUTPUT_DIR / BOOKING_EXPORT_FORMAT / BOOKING_HEADLESS /
//! BOOKING_NO_SANDBOX / CHROME_PATH / RUST_LOG

use std::io::{self, BufRead, Write};

use booking_count::{BookingScraper, RunReport, ScraperError, SearchConfig, SinkReport};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Booking 日別宿泊施設数検索ツール（日付範囲版） ===");

    match prompt_and_run().await {
        Ok(report) => print_summary(&report),
        Err(e) => eprintln!("\n実行中にエラーが発生しました: {}", e),
    }

    print!("\nEnter キーで終了します...");
    let _ = io::stdout().flush();
    let _ = read_line();
}

async fn prompt_and_run() -> Result<RunReport, ScraperError> {
    let location = prompt("1. 検索地域を入力してください（例: 高雄）: ")?;
    let start_date = prompt("2. チェックイン開始日を入力してください（YYYY-MM-DD）: ")?;
    let end_date = prompt("3. チェックイン終了日を入力してください（YYYY-MM-DD、この日は含まない）: ")?;

    let mut scraper = BookingScraper::new(SearchConfig::from_env());
    scraper.run(&location, &start_date, &end_date).await
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    read_line()
}

fn read_line() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_summary(report: &RunReport) {
    println!();
    println!(
        "件数取得: {}日 / 件数なし: {}日 / エラー: {}日",
        report.found_days(),
        report.not_found_days(),
        report.errored_days()
    );
    match &report.artifact {
        SinkReport::Written(path) => {
            println!("[完了] データを出力しました: {}", path.display())
        }
        SinkReport::NoDataCollected => println!("[完了] 有効なデータを取得できませんでした。"),
    }
}
