use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::drift::DriftReport;
use crate::error::Result;
use crate::ingest::IngestReport;
use crate::store::BuildReport;

pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_ingest(&self, report: &IngestReport) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_ingest_table(report)),
            OutputFormat::Json => to_json(report),
        }
    }

    pub fn format_build(&self, report: &BuildReport) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_build_table(report)),
            OutputFormat::Json => to_json(report),
        }
    }

    pub fn format_drift(&self, report: &DriftReport) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_drift_table(report)),
            OutputFormat::Json => to_json(report),
        }
    }

    fn format_ingest_table(&self, report: &IngestReport) -> String {
        let mut table = counts_table(&[
            ("발견", report.discovered),
            ("처리", report.processed),
            ("건너뜀", report.skipped),
            ("실패", report.failed),
            ("조문", report.provisions),
        ]);
        table.set_content_arrangement(ContentArrangement::Dynamic);

        let mut result = String::new();
        result.push_str(&format!("\n{} 수집 완료\n\n", "📥".cyan()));
        result.push_str(&table.to_string());

        if !report.failures.is_empty() {
            let mut failures = Table::new();
            failures.set_header(vec![
                Cell::new("법령일련번호").fg(Color::Cyan),
                Cell::new("사유").fg(Color::Cyan),
            ]);
            for (source_id, reason) in &report.failures {
                failures.add_row(vec![Cell::new(source_id), Cell::new(truncate_string(reason, 60))]);
            }
            failures.set_content_arrangement(ContentArrangement::Dynamic);

            result.push_str(&format!("\n\n{} 실패 {}건\n\n", "⚠".yellow(), report.failures.len()));
            result.push_str(&failures.to_string());
        }

        result
    }

    fn format_build_table(&self, report: &BuildReport) -> String {
        let table = counts_table(&[
            ("시드 파일", report.seed_files),
            ("법령", report.documents),
            ("조문", report.provisions),
            ("중복 제거", report.duplicates_dropped),
            ("번역", report.translations),
            ("상호 참조", report.cross_references),
            ("외부 참조", report.external_references),
        ]);

        format!("\n{} 데이터베이스 구축 완료\n\n{}", "🗄".cyan(), table)
    }

    fn format_drift_table(&self, report: &DriftReport) -> String {
        let mut result = String::new();

        if !report.has_updates() {
            result.push_str(&format!(
                "\n{} 변경 없음 (로컬 {}건, 조회 {}건)\n",
                "✅".green(),
                report.local_documents,
                report.checked
            ));
            return result;
        }

        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("문서 ID").fg(Color::Cyan),
            Cell::new("법령명").fg(Color::Cyan),
            Cell::new("공포일").fg(Color::Cyan),
            Cell::new("시행일").fg(Color::Cyan),
        ]);
        for entry in &report.new_entries {
            table.add_row(vec![
                Cell::new(entry.document_id()),
                Cell::new(truncate_string(&entry.title, 40)),
                Cell::new(or_dash(&entry.promulgation_date)),
                Cell::new(or_dash(&entry.effective_date)),
            ]);
        }
        table.set_content_arrangement(ContentArrangement::Dynamic);

        result.push_str(&format!(
            "\n{} 신규 법령 {}건\n\n",
            "🆕".yellow(),
            report.new_entries.len().to_string().yellow()
        ));
        result.push_str(&table.to_string());
        result
    }
}

fn counts_table(rows: &[(&str, usize)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new("항목").fg(Color::Cyan), Cell::new("건수").fg(Color::Cyan)]);
    for (label, count) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    table
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::LawIndexEntry;

    #[test]
    fn test_ingest_json_contains_counts() {
        let report = IngestReport {
            discovered: 3,
            processed: 2,
            failed: 1,
            failures: vec![("9".to_string(), "status 500".to_string())],
            ..Default::default()
        };
        let json = Formatter::new(OutputFormat::Json).format_ingest(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["discovered"], 3);
        assert_eq!(value["failures"][0][1], "status 500");
    }

    #[test]
    fn test_ingest_table_lists_failures() {
        colored::control::set_override(false);
        let report = IngestReport {
            failed: 1,
            failures: vec![("42".to_string(), "not found upstream, stub written".to_string())],
            ..Default::default()
        };
        let table = Formatter::new(OutputFormat::Table).format_ingest(&report).unwrap();
        assert!(table.contains("42"));
        assert!(table.contains("실패 1건"));
    }

    #[test]
    fn test_drift_table_lists_new_documents() {
        colored::control::set_override(false);
        let report = DriftReport {
            local_documents: 2,
            checked: 2,
            new_entries: vec![LawIndexEntry {
                title: "클라우드컴퓨팅 발전 및 이용자 보호에 관한 법률".to_string(),
                source_id: "777".to_string(),
                law_number: "13234".to_string(),
                ..Default::default()
            }],
        };
        let table = Formatter::new(OutputFormat::Table).format_drift(&report).unwrap();
        assert!(table.contains("act-13234"));

        let empty = Formatter::new(OutputFormat::Table).format_drift(&DriftReport::default()).unwrap();
        assert!(empty.contains("변경 없음"));
    }

    #[test]
    fn test_truncate_string_counts_chars() {
        assert_eq!(truncate_string("개인정보 보호법", 20), "개인정보 보호법");
        assert_eq!(truncate_string("가나다라마바", 5), "가나...");
    }
}
