//! chromiumoxide によるページ描画

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::ScraperError;
use crate::traits::{DomQuery, RenderSession};

/// ネットワークアイドル判定のインターバル（ミリ秒）
const NETWORK_IDLE_CHECK_INTERVAL_MS: u64 = 500;
/// 連続何回アイドルならOKとするか
const REQUIRED_IDLE_CHECKS: u32 = 3;

/// Resource Timing バッファの上限（ブラウザ既定は250件）
const RESOURCE_TIMING_BUFFER_SIZE: u32 = 5000;

/// 読み込み完了かつ直近500ms以内のリソース通信なし
const NETWORK_IDLE_SCRIPT: &str = r#"
    (() => {
        if (!window.__bookingTimingBufferSet) {
            performance.setResourceTimingBufferSize(__BUFFER_SIZE__);
            window.__bookingTimingBufferSet = true;
        }
        if (document.readyState !== 'complete') {
            return false;
        }
        const now = performance.now();
        const busy = performance.getEntriesByType('resource').some(e => {
            return e.responseEnd === 0 || (now - e.responseEnd) < 500;
        });
        return !busy;
    })()
"#;

static SESSION_SEQ: AtomicU64 = AtomicU64::new(0);

fn network_idle_script() -> String {
    NETWORK_IDLE_SCRIPT.replace("__BUFFER_SIZE__", &RESOURCE_TIMING_BUFFER_SIZE.to_string())
}

/// セッションごとに一意なユーザーデータディレクトリ
fn unique_user_data_dir() -> PathBuf {
    let unique_id = format!(
        "{}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos(),
        SESSION_SEQ.fetch_add(1, Ordering::Relaxed)
    );
    std::env::temp_dir().join(format!("booking-count-{}", unique_id))
}

/// 1回の実行で共有するブラウザ
pub struct ChromeSession {
    config: SearchConfig,
    user_data_dir: PathBuf,
    browser: Option<Browser>,
    handler_task: Option<JoinHandle<()>>,
}

impl ChromeSession {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            config: config.clone(),
            user_data_dir: unique_user_data_dir(),
            browser: None,
            handler_task: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.browser.is_some()
    }

    pub fn user_data_dir(&self) -> &Path {
        &self.user_data_dir
    }

    fn browser_config(&self) -> Result<BrowserConfig, ScraperError> {
        let (width, height) = self.config.viewport;

        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .viewport(Viewport {
                width,
                height,
                ..Default::default()
            })
            .request_timeout(self.config.navigation_timeout)
            .user_data_dir(&self.user_data_dir)
            .arg(format!("--user-agent={}", self.config.user_agent))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        if let Some(path) = &self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if !self.config.headless {
            builder = builder.with_head();
        }
        if self.config.no_sandbox {
            builder = builder.no_sandbox();
        }

        builder.build().map_err(ScraperError::BrowserInit)
    }

    async fn navigate(&self, page: &Page, target_url: &str) -> Result<(), ScraperError> {
        let started = Instant::now();
        let limit = self.config.navigation_timeout;

        match timeout(limit, page.goto(target_url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(ScraperError::Navigation(e.to_string())),
            Err(_) => {
                return Err(ScraperError::Timeout(format!(
                    "{} の読み込みが{}秒以内に完了しませんでした",
                    target_url,
                    limit.as_secs()
                )))
            }
        }

        self.wait_network_idle(page, started + limit).await?;

        // クライアント側の遅延描画を待つ
        sleep(self.config.settle_delay).await;
        Ok(())
    }

    /// ネットワークがアイドルになるまで待機。期限を過ぎたらタイムアウト
    async fn wait_network_idle(&self, page: &Page, deadline: Instant) -> Result<(), ScraperError> {
        let started = Instant::now();
        let script = network_idle_script();
        let mut idle_count = 0;

        while Instant::now() < deadline {
            match page.evaluate(script.as_str()).await {
                Ok(val) => {
                    if val.into_value::<bool>().unwrap_or(false) {
                        idle_count += 1;
                        if idle_count >= REQUIRED_IDLE_CHECKS {
                            debug!(
                                "Network idle after {:?} ({} consecutive checks)",
                                started.elapsed(),
                                idle_count
                            );
                            return Ok(());
                        }
                    } else {
                        idle_count = 0;
                    }
                }
                Err(e) => {
                    debug!("Network idle check error: {}", e);
                    idle_count = 0;
                }
            }

            sleep(Duration::from_millis(NETWORK_IDLE_CHECK_INTERVAL_MS)).await;
        }

        Err(ScraperError::Timeout(format!(
            "ネットワークが{}秒以内にアイドルになりませんでした",
            self.config.navigation_timeout.as_secs()
        )))
    }
}

#[async_trait]
impl RenderSession for ChromeSession {
    type Page = RenderedPage;

    async fn open(&mut self) -> Result<(), ScraperError> {
        if self.browser.is_some() {
            return Ok(());
        }
        info!("Launching browser...");

        let browser_config = self.browser_config()?;
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        let task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event error: {:?}", e);
                }
            }
        });

        self.browser = Some(browser);
        self.handler_task = Some(task);
        info!("Browser launched");
        Ok(())
    }

    async fn render(&self, target_url: &str) -> Result<RenderedPage, ScraperError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("Browser not initialized".to_string()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::Navigation(e.to_string()))?;

        match self.navigate(&page, target_url).await {
            Ok(()) => Ok(RenderedPage { page }),
            Err(e) => {
                close_page(page).await;
                Err(e)
            }
        }
    }

    async fn release(&self, page: RenderedPage) {
        close_page(page.page).await;
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        if let Some(mut browser) = self.browser.take() {
            info!("Closing browser...");
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = browser.wait().await {
                debug!("Failed to wait for browser exit: {}", e);
            }
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        if self.user_data_dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.user_data_dir) {
                debug!("Failed to remove user data dir {:?}: {}", self.user_data_dir, e);
            }
        }
        Ok(())
    }
}

async fn close_page(page: Page) {
    if let Err(e) = page.close().await {
        debug!("Failed to close page: {}", e);
    }
}

/// querySelector の結果（null を避けるため常にオブジェクトで返す）
#[derive(Debug, Deserialize)]
struct ElementText {
    found: bool,
    text: String,
}

/// 描画済みページ
pub struct RenderedPage {
    page: Page,
}

#[async_trait]
impl DomQuery for RenderedPage {
    async fn first_text(&self, selector: &str) -> Result<Option<String>, ScraperError> {
        let selector_literal =
            serde_json::to_string(selector).map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                return el
                    ? {{ found: true, text: el.innerText || '' }}
                    : {{ found: false, text: '' }};
            }})()
            "#,
            selector_literal
        );

        let element: ElementText = self
            .page
            .evaluate(script.as_str())
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?
            .into_value()
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;

        Ok(element.found.then_some(element.text))
    }

    async fn body_text(&self) -> Result<String, ScraperError> {
        self.page
            .evaluate("document.body ? document.body.innerText : ''")
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?
            .into_value::<String>()
            .map_err(|e| ScraperError::JavaScript(e.to_string()))
    }
}
