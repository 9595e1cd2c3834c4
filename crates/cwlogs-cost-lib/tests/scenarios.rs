use cwlogs_cost_estimator::{
    render_report, CostAnalyzer, DailyAggregator, DailyUsageRecord, NaiveDate, PricingCatalog,
    RegionPricing, StorageClass, TierSchedule, TieredCostCalculator, UsageLoader,
};
use std::collections::HashMap;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
}

fn catalog() -> PricingCatalog {
    let mut regions = HashMap::new();
    regions.insert(
        "us-east-1".to_string(),
        RegionPricing::new(
            0.50,
            0.25,
            TierSchedule::from_rates([0.30, 0.15, 0.07, 0.05]),
            TierSchedule::from_rates([0.20, 0.10, 0.05, 0.04]),
        ),
    );
    PricingCatalog::new(regions, "us-east-1").unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn single_day_with_builtin_pricing() {
    let catalog = PricingCatalog::builtin().unwrap();
    let analyzer = CostAnalyzer::new(&catalog);
    let records = vec![DailyUsageRecord::new(day(1), 100.0, 0.0)];

    let result = analyzer.analyze(&records, "us-east-1").unwrap();
    assert!(close(result.total_old_cost(), 50.0));
    assert!(result.total_new_cost().is_finite());
    assert!(result.total_new_cost() >= 0.0);
}

#[test]
fn forty_thousand_gb_month_across_three_bands() {
    let catalog = catalog();
    let calculator = TieredCostCalculator::new(&catalog);

    let breakdown = calculator
        .cost_for_monthly(40_000.0, "us-east-1", StorageClass::Standard)
        .unwrap();
    let costs = breakdown.tier_costs();
    assert!(close(costs[0], 3000.0));
    assert!(close(costs[1], 3000.0));
    assert!(close(costs[2], 700.0));
    assert_eq!(costs[3], 0.0);
    assert!(close(breakdown.total_monthly_cost(), 6700.0));
}

#[test]
fn zero_usage_day_is_kept_in_order() {
    let catalog = catalog();
    let analyzer = CostAnalyzer::new(&catalog);
    let records = vec![
        DailyUsageRecord::new(day(3), 20.0, 5.0),
        DailyUsageRecord::new(day(2), 0.0, 0.0),
        DailyUsageRecord::new(day(1), 10.0, 0.0),
    ];

    let result = analyzer.analyze(&records, "us-east-1").unwrap();
    assert_eq!(result.total_gb(), 35.0);

    let dates: Vec<_> = result.daily_comparisons().iter().map(|r| r.date()).collect();
    assert_eq!(dates, vec![day(1), day(2), day(3)]);
    assert_eq!(result.daily_comparisons()[1].new_cost(), 0.0);
}

#[test]
fn empty_history() {
    let catalog = catalog();
    let analyzer = CostAnalyzer::new(&catalog);

    let result = analyzer.analyze(&[], "us-east-1").unwrap();
    assert_eq!(result.total_standard_gb(), 0.0);
    assert_eq!(result.total_ia_gb(), 0.0);
    assert_eq!(result.total_gb(), 0.0);
    assert_eq!(result.total_old_cost(), 0.0);
    assert_eq!(result.total_new_cost(), 0.0);
    assert!(result.is_empty());
}

#[test]
fn rendered_report_layout() {
    let catalog = catalog();
    let analyzer = CostAnalyzer::new(&catalog);
    let records = vec![
        DailyUsageRecord::new(day(2), 0.0, 0.0),
        DailyUsageRecord::new(day(1), 100.0, 40.0),
    ];

    let result = analyzer.analyze(&records, "us-east-1").unwrap();
    let expected = "\
CloudWatch Logs Cost Analysis
===========================
Region: us-east-1
Total GB Ingested: 140.00 GB
  - Standard Storage: 100.00 GB
  - Infrequent Access: 40.00 GB

Old Pricing Total Cost: $60.00
New Pricing Total Cost: $38.00
Cost Difference: $-22.00
Percentage Change: -36.67%

Daily Breakdown:
---------------
2025-04-01: Old: $60.00, New: $38.00, Diff: $-22.00, Usage: 140.00 GB (Standard: 100.00 GB, IA: 40.00 GB)
2025-04-02: Old: $0.00, New: $0.00, Diff: $0.00, Usage: 0.00 GB (Standard: 0.00 GB, IA: 0.00 GB)";

    assert_eq!(render_report(&result), expected);
}

#[test]
fn rendered_report_omits_percentage_without_old_cost() {
    let catalog = catalog();
    let analyzer = CostAnalyzer::new(&catalog);

    let report = render_report(&analyzer.analyze(&[], "us-east-1").unwrap());
    assert!(!report.contains("Percentage Change"));
    assert!(report.ends_with("Daily Breakdown:\n---------------"));
}

#[test]
fn usage_file_to_comparison() {
    let dir = tempfile::TempDir::new().unwrap();
    let gib = 1024u64 * 1024 * 1024;
    let lines = [
        format!(r#"{{"date": "2025-04-01", "log_group": "/aws/lambda/a", "storage_class": "STANDARD", "bytes": {}}}"#, 10 * gib),
        format!(r#"{{"date": "2025-04-01", "log_group": "/aws/lambda/b", "storage_class": "INFREQUENT_ACCESS", "bytes": {}}}"#, 4 * gib),
        format!(r#"{{"date": "2025-04-02", "log_group": "/aws/ecs/c", "storage_class": "STANDARD", "bytes": {}}}"#, 50 * gib),
        format!(r#"{{"date": "2025-04-02", "log_group": "/aws/lambda/a", "storage_class": "DELIVERY", "bytes": {}}}"#, 2 * gib),
    ];
    let path = dir.path().join("usage.jsonl");
    std::fs::write(&path, lines.join("\n")).unwrap();

    let observations = UsageLoader::new().load(&path).unwrap();
    let records = DailyAggregator::new()
        .with_log_group_prefix("/aws/lambda/")
        .aggregate(&observations);
    assert_eq!(records.len(), 2);

    let catalog = catalog();
    let result = CostAnalyzer::new(&catalog)
        .analyze(&records, "us-east-1")
        .unwrap();
    assert_eq!(result.total_standard_gb(), 12.0);
    assert_eq!(result.total_ia_gb(), 4.0);
    assert!(close(result.total_old_cost(), 12.0 * 0.5 + 4.0 * 0.25));
}
