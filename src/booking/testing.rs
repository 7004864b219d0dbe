//! テスト用の DomQuery / RenderSession 実装

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::error::ScraperError;
use crate::traits::{DomQuery, RenderSession};

/// 問い合わせ履歴を記録する固定DOM
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    elements: HashMap<String, String>,
    body: String,
    failing_selector: Option<String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, selector: &str, text: &str) -> Self {
        self.elements.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn failing_on(mut self, selector: &str) -> Self {
        self.failing_selector = Some(selector.to_string());
        self
    }

    /// 問い合わせたセレクタ（body は `<body>`）
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DomQuery for FakePage {
    async fn first_text(&self, selector: &str) -> Result<Option<String>, ScraperError> {
        self.queries.lock().unwrap().push(selector.to_string());
        if self.failing_selector.as_deref() == Some(selector) {
            return Err(ScraperError::JavaScript(format!("querySelector({}) threw", selector)));
        }
        Ok(self.elements.get(selector).cloned())
    }

    async fn body_text(&self) -> Result<String, ScraperError> {
        self.queries.lock().unwrap().push("<body>".to_string());
        Ok(self.body.clone())
    }
}

/// 1日分の描画結果
#[derive(Debug, Clone)]
pub enum FakeRender {
    Page(FakePage),
    Timeout,
    NavigationFailure,
}

/// チェックイン日ごとに描画結果を返すセッション
#[derive(Debug, Default)]
pub struct FakeSession {
    responses: HashMap<String, FakeRender>,
    fail_launch: bool,
    pub opened: usize,
    pub closed: usize,
    rendered: Mutex<Vec<String>>,
    released: AtomicUsize,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// `check_in` は `YYYY-MM-DD`
    pub fn respond(mut self, check_in: &str, render: FakeRender) -> Self {
        self.responses.insert(check_in.to_string(), render);
        self
    }

    pub fn with_count(self, check_in: &str, count: &str) -> Self {
        let text = format!("高雄：找到 {} 間住宿", count);
        self.respond(check_in, FakeRender::Page(FakePage::new().with_element("h1", &text)))
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn rendered_urls(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    fn check_in_of(url: &str) -> Option<&str> {
        let start = url.find("checkin=")? + "checkin=".len();
        url.get(start..start + 10)
    }
}

#[async_trait]
impl RenderSession for FakeSession {
    type Page = FakePage;

    async fn open(&mut self) -> Result<(), ScraperError> {
        if self.fail_launch {
            return Err(ScraperError::BrowserInit("chrome not found".into()));
        }
        self.opened += 1;
        Ok(())
    }

    async fn render(&self, target_url: &str) -> Result<FakePage, ScraperError> {
        self.rendered.lock().unwrap().push(target_url.to_string());
        let response = Self::check_in_of(target_url).and_then(|d| self.responses.get(d));
        match response {
            Some(FakeRender::Page(page)) => Ok(page.clone()),
            Some(FakeRender::Timeout) => Err(ScraperError::Timeout(format!(
                "{} did not settle within 60s",
                target_url
            ))),
            Some(FakeRender::NavigationFailure) | None => Err(ScraperError::Navigation(
                "net::ERR_NAME_NOT_RESOLVED".into(),
            )),
        }
    }

    async fn release(&self, _page: FakePage) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        self.closed += 1;
        Ok(())
    }
}

/// テストごとに一意な一時ディレクトリ
pub fn temp_output_dir(label: &str) -> std::path::PathBuf {
    let unique_id = format!(
        "{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    );
    std::env::temp_dir().join(format!("booking-count-{}-{}", label, unique_id))
}

/// xlsx の先頭シートを行ごとに読み戻す
pub fn read_xlsx_rows(path: &std::path::Path) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range.rows().map(|row| row.to_vec()).collect()
}

pub fn text(value: &str) -> Data {
    Data::String(value.to_string())
}
