use async_trait::async_trait;

use crate::error::ScraperError;

/// 描画済みページに対するDOM問い合わせ
#[async_trait]
pub trait DomQuery: Send + Sync {
    /// セレクタに最初に一致した要素の表示テキスト。一致なしは `None`
    async fn first_text(&self, selector: &str) -> Result<Option<String>, ScraperError>;

    /// ページ全体 (body) の表示テキスト
    async fn body_text(&self) -> Result<String, ScraperError>;
}

/// ブラウザコンテキストのライフサイクル
///
/// コンテキストは1回の実行で共有し、ページは1リクエストごとに開いて閉じる。
#[async_trait]
pub trait RenderSession: Send + Sync {
    type Page: DomQuery + 'static;

    /// ブラウザ起動
    async fn open(&mut self) -> Result<(), ScraperError>;

    /// 新しいページでURLを開き、描画が落ち着くまで待機
    ///
    /// 失敗時は開いたページを閉じてからエラーを返す。
    async fn render(&self, target_url: &str) -> Result<Self::Page, ScraperError>;

    /// ページを閉じる
    async fn release(&self, page: Self::Page);

    /// リソース解放（複数回呼んでもよい）
    async fn close(&mut self) -> Result<(), ScraperError>;
}
