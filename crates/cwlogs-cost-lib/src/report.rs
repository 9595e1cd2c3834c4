use crate::data_structures::ComparisonResult;
use crate::error::{EstimatorError, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const TITLE: &str = "CloudWatch Logs Cost Analysis";

/// Formats `value` with two decimals and `,` between thousands, e.g. `-1,234.50`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let whole: String = grouped.chars().rev().collect();

    format!("{}{}.{}", sign, whole, fraction)
}

pub fn render_report(analysis: &ComparisonResult) -> String {
    let mut report = vec![
        TITLE.to_string(),
        "=".repeat(27),
        format!("Region: {}", analysis.region()),
        format!("Total GB Ingested: {} GB", format_amount(analysis.total_gb())),
        format!(
            "  - Standard Storage: {} GB",
            format_amount(analysis.total_standard_gb())
        ),
        format!(
            "  - Infrequent Access: {} GB",
            format_amount(analysis.total_ia_gb())
        ),
        String::new(),
        format!(
            "Old Pricing Total Cost: ${}",
            format_amount(analysis.total_old_cost())
        ),
        format!(
            "New Pricing Total Cost: ${}",
            format_amount(analysis.total_new_cost())
        ),
        format!("Cost Difference: ${}", format_amount(analysis.cost_difference())),
    ];

    if let Some(pct_change) = analysis.percentage_change() {
        report.push(format!("Percentage Change: {}%", format_amount(pct_change)));
    }

    report.push(String::new());
    report.push("Daily Breakdown:".to_string());
    report.push("-".repeat(15));

    for day in analysis.daily_comparisons() {
        report.push(format!(
            "{}: Old: ${}, New: ${}, Diff: ${}, Usage: {} GB (Standard: {} GB, IA: {} GB)",
            day.date().format("%Y-%m-%d"),
            format_amount(day.old_cost()),
            format_amount(day.new_cost()),
            format_amount(day.difference()),
            format_amount(day.total_gb()),
            format_amount(day.standard_gb()),
            format_amount(day.ia_gb()),
        ));
    }

    report.join("\n")
}

/// `<YYYYMMDD>_CWLogsReport_<account>.md`
pub fn report_file_name(date: NaiveDate, account_id: &str) -> String {
    format!("{}_CWLogsReport_{}.md", date.format("%Y%m%d"), account_id)
}

/// Writes `report` into `reports_dir`, creating the directory when missing.
pub fn write_report<P: AsRef<Path>>(
    reports_dir: P,
    date: NaiveDate,
    account_id: &str,
    report: &str,
) -> Result<PathBuf> {
    let reports_dir = reports_dir.as_ref();
    std::fs::create_dir_all(reports_dir).map_err(|e| EstimatorError::Io {
        path: reports_dir.to_path_buf(),
        source: e,
    })?;

    let path = reports_dir.join(report_file_name(date, account_id));
    std::fs::write(&path, report).map_err(|e| EstimatorError::Io {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(50.0), "50.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-1234.5), "-1,234.50");
        assert_eq!(format_amount(-12.25), "-12.25");
        assert_eq!(format_amount(100000.0), "100,000.00");
    }

    #[test]
    fn test_report_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        assert_eq!(
            report_file_name(date, "123456789012"),
            "20250502_CWLogsReport_123456789012.md"
        );
    }

    #[test]
    fn test_write_report_creates_directory() {
        let dir = TempDir::new().unwrap();
        let reports_dir = dir.path().join("reports");
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();

        let path = write_report(&reports_dir, date, "acct", "hello").unwrap();
        assert_eq!(path, reports_dir.join("20250502_CWLogsReport_acct.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
