//! 日別記録の蓄積とファイル出力

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::config::ExportFormat;
use crate::error::ScraperError;

use super::dates::{DateRange, DATE_FORMAT};
use super::types::{DayRecord, ExtractionOutcome};

/// 出力の列見出し
pub const HEADERS: [&str; 5] = ["搜尋日期", "退房日期", "地區", "找到數量", "搜尋連結"];

/// 出力処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkReport {
    Written(PathBuf),
    /// 記録が1件もないため出力しなかった
    NoDataCollected,
}

/// 出力1行分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub check_in: String,
    pub check_out: String,
    pub location: String,
    /// `None` は件数なし（NotFound / Errored）
    pub count: Option<u64>,
    pub target_url: String,
}

impl ExportRow {
    fn count_cell(&self) -> String {
        self.count
            .map(|c| c.to_string())
            .unwrap_or_else(|| ExtractionOutcome::SENTINEL.to_string())
    }
}

impl From<&DayRecord> for ExportRow {
    fn from(record: &DayRecord) -> Self {
        Self {
            check_in: record.check_in.format(DATE_FORMAT).to_string(),
            check_out: record.check_out.format(DATE_FORMAT).to_string(),
            location: record.location.clone(),
            count: record.outcome.count(),
            target_url: record.target_url.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ResultSink {
    location: String,
    range: DateRange,
    records: Vec<DayRecord>,
}

impl ResultSink {
    pub fn new(location: impl Into<String>, range: DateRange) -> Self {
        Self {
            location: location.into(),
            range,
            records: Vec::with_capacity(range.total_days()),
        }
    }

    /// 到着順（= 日付順）に追加
    pub fn push(&mut self, record: DayRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DayRecord> {
        self.records
    }

    pub fn rows(&self) -> Vec<ExportRow> {
        self.records.iter().map(ExportRow::from).collect()
    }

    /// `<prefix>_<location>_<start>_to_<end>.<ext>`
    pub fn artifact_name(&self, prefix: &str, format: ExportFormat) -> String {
        format!(
            "{}_{}_{}_to_{}.{}",
            prefix,
            sanitize_file_component(&self.location),
            self.range.start().format(DATE_FORMAT),
            self.range.end().format(DATE_FORMAT),
            format.extension()
        )
    }

    /// 記録をファイルに書き出す。記録がなければ何も書かない
    pub fn finalize(
        &self,
        output_dir: &Path,
        format: ExportFormat,
        prefix: &str,
    ) -> Result<SinkReport, ScraperError> {
        if self.records.is_empty() {
            info!("No data collected, skipping export");
            return Ok(SinkReport::NoDataCollected);
        }

        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(self.artifact_name(prefix, format));
        let rows = self.rows();

        match format {
            ExportFormat::Xlsx => write_xlsx(&path, &rows)?,
            ExportFormat::Csv => write_csv(&path, &rows)?,
        }

        info!("Exported {} rows to {:?}", rows.len(), path);
        Ok(SinkReport::Written(path))
    }
}

fn sanitize_file_component(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn write_xlsx(path: &Path, rows: &[ExportRow]) -> Result<(), ScraperError> {
    let export_err = |e: rust_xlsxwriter::XlsxError| ScraperError::Export(e.to_string());

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).map_err(export_err)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.check_in.as_str()).map_err(export_err)?;
        sheet.write_string(r, 1, row.check_out.as_str()).map_err(export_err)?;
        sheet.write_string(r, 2, row.location.as_str()).map_err(export_err)?;
        match row.count {
            Some(count) => sheet.write_number(r, 3, count as f64).map_err(export_err)?,
            None => sheet
                .write_string(r, 3, ExtractionOutcome::SENTINEL)
                .map_err(export_err)?,
        };
        sheet.write_string(r, 4, row.target_url.as_str()).map_err(export_err)?;
    }

    workbook.save(path).map_err(export_err)?;
    Ok(())
}

fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<(), ScraperError> {
    let export_err = |e: csv::Error| ScraperError::Export(e.to_string());

    let mut file = File::create(path)?;
    // Excel が UTF-8 と判定できるよう BOM を付ける
    file.write_all(b"\xEF\xBB\xBF")?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(HEADERS).map_err(export_err)?;
    for row in rows {
        writer
            .write_record([
                row.check_in.as_str(),
                row.check_out.as_str(),
                row.location.as_str(),
                row.count_cell().as_str(),
                row.target_url.as_str(),
            ])
            .map_err(export_err)?;
    }
    writer.flush()?;
    Ok(())
}
