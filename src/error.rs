use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("日付形式エラー（YYYY-MM-DD で入力してください）: {0}")]
    InvalidDateFormat(String),

    #[error("日付範囲エラー: 終了日 {end} は開始日 {start} より後である必要があります")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("JavaScript実行エラー: {0}")]
    JavaScript(String),

    #[error("出力エラー: {0}")]
    Export(String),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),
}

impl ScraperError {
    /// 1日分の処理内で発生し、その日の記録に変換されるエラーか
    pub fn is_per_day(&self) -> bool {
        matches!(
            self,
            ScraperError::Navigation(_) | ScraperError::Timeout(_) | ScraperError::JavaScript(_)
        )
    }
}
