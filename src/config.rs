use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::booking::BOOKING_SEARCH_URL;

/// デスクトップChromeのユーザーエージェント
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 出力ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("未対応の出力形式: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub export_format: ExportFormat,
    pub headless: bool,
    pub no_sandbox: bool,
    pub chrome_executable: Option<PathBuf>,
    pub viewport: (u32, u32),
    pub user_agent: String,
    /// ナビゲーション + ネットワークアイドル待機の上限
    pub navigation_timeout: Duration,
    /// アイドル判定後、クライアント側描画を待つ時間
    pub settle_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: BOOKING_SEARCH_URL.to_string(),
            output_dir: PathBuf::from("."),
            file_prefix: "booking".to_string(),
            export_format: ExportFormat::default(),
            headless: true,
            no_sandbox: false,
            chrome_executable: None,
            viewport: (1280, 800),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            navigation_timeout: Duration::from_secs(60),
            settle_delay: Duration::from_secs(2),
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 環境変数で既定値を上書きした設定を作る
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("BOOKING_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(value) = std::env::var("BOOKING_HEADLESS") {
            match parse_flag(&value) {
                Some(headless) => config.headless = headless,
                None => warn!("Ignoring BOOKING_HEADLESS={:?}", value),
            }
        }
        if let Ok(value) = std::env::var("BOOKING_NO_SANDBOX") {
            match parse_flag(&value) {
                Some(no_sandbox) => config.no_sandbox = no_sandbox,
                None => warn!("Ignoring BOOKING_NO_SANDBOX={:?}", value),
            }
        }
        if let Ok(value) = std::env::var("BOOKING_EXPORT_FORMAT") {
            match value.parse() {
                Ok(format) => config.export_format = format,
                Err(e) => warn!("{}", e),
            }
        }
        config.chrome_executable = std::env::var("CHROME_PATH")
            .or_else(|_| std::env::var("CHROMIUM_PATH"))
            .ok()
            .map(PathBuf::from);

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_no_sandbox(mut self, no_sandbox: bool) -> Self {
        self.no_sandbox = no_sandbox;
        self
    }

    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
