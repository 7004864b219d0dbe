//! 検索結果件数の抽出
//!
//! Booking のマークアップやクラス名は頻繁に変わるため、複数の方法を優先順に試す。
//! 最初にテキストを採用した方法で打ち切り、以降の方法は呼ばない。

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::ScraperError;
use crate::traits::DomQuery;

use super::types::ExtractionOutcome;

/// 件数見出しと判断するための文言（繁体字 / 英語）
const RESULT_MARKERS: [&str; 2] = ["找到", "properties found"];

/// 具体的なものから汎用の見出しへ
const COUNT_SELECTORS: [&str; 3] = [".ef29a7424c", "[data-testid='header-title']", "h1"];

static DIGIT_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9,]*").expect("valid regex"));

static BODY_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"找到\s*([0-9][0-9,]*)\s*間住宿").expect("valid regex"));

/// 件数テキストを取り出す方法1つ分
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// 最初に一致した要素のテキストに件数文言が含まれていれば採用
    Selector(String),
    /// ページ全体のテキストから「找到 N 間住宿」を探す
    BodyPattern,
}

impl ExtractionStrategy {
    /// 採用したテキストを返す。採用しなければ `None`
    pub async fn try_extract<D>(&self, dom: &D) -> Result<Option<String>, ScraperError>
    where
        D: DomQuery + ?Sized,
    {
        match self {
            ExtractionStrategy::Selector(selector) => {
                let text = dom.first_text(selector).await?;
                match text {
                    Some(text) if RESULT_MARKERS.iter().any(|m| text.contains(m)) => {
                        Ok(Some(text))
                    }
                    Some(text) => {
                        debug!("Selector {} matched without count marker: {:?}", selector, text);
                        Ok(None)
                    }
                    None => {
                        debug!("Selector {} matched nothing", selector);
                        Ok(None)
                    }
                }
            }
            ExtractionStrategy::BodyPattern => {
                let body = dom.body_text().await?;
                Ok(BODY_COUNT
                    .captures(&body)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string()))
            }
        }
    }
}

/// 採用テキスト中の最初の数字列から件数を得る（桁区切りは除去）
pub fn normalize_count(raw: &str) -> Option<u64> {
    let digits: String = DIGIT_GROUP
        .find(raw)?
        .as_str()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    digits.parse().ok()
}

#[derive(Debug, Clone)]
pub struct CountExtractor {
    strategies: Vec<ExtractionStrategy>,
}

impl Default for CountExtractor {
    fn default() -> Self {
        let mut strategies: Vec<_> = COUNT_SELECTORS
            .iter()
            .map(|s| ExtractionStrategy::Selector(s.to_string()))
            .collect();
        strategies.push(ExtractionStrategy::BodyPattern);
        Self { strategies }
    }
}

impl CountExtractor {
    pub fn new(strategies: Vec<ExtractionStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[ExtractionStrategy] {
        &self.strategies
    }

    /// 戦略を順に試し、最初に採用されたテキストを件数にする
    ///
    /// 採用テキストに数字がなければ後続の戦略は試さず `NotFound`。
    pub async fn extract<D>(&self, dom: &D) -> Result<ExtractionOutcome, ScraperError>
    where
        D: DomQuery + ?Sized,
    {
        for strategy in &self.strategies {
            if let Some(raw) = strategy.try_extract(dom).await? {
                debug!("Accepted via {:?}: {:?}", strategy, raw);
                return Ok(match normalize_count(&raw) {
                    Some(count) => ExtractionOutcome::Found(count),
                    None => ExtractionOutcome::NotFound,
                });
            }
        }
        Ok(ExtractionOutcome::NotFound)
    }
}
