use cwlogs_cost_estimator::prelude::*;
use cwlogs_cost_estimator::{format_amount, DailyAggregator, UsageLoader};
use std::env;

fn main() -> Result<()> {
    let catalog = PricingCatalog::builtin()?;
    let args: Vec<String> = env::args().collect();
    let region = args.get(2).map(String::as_str).unwrap_or("us-east-1");

    let records = if let Some(path) = args.get(1) {
        println!("Loading usage data from: {}", path);
        let observations = UsageLoader::new().load(path)?;
        DailyAggregator::new().aggregate(&observations)
    } else {
        println!("No usage file given, using a synthetic month of 400 GB/day");
        (1..=30)
            .filter_map(|d| NaiveDate::from_ymd_opt(2025, 4, d))
            .map(|date| DailyUsageRecord::new(date, 350.0, 50.0))
            .collect()
    };

    let analysis = CostAnalyzer::new(&catalog).analyze(&records, region)?;

    println!();
    println!("{}", render_report(&analysis));
    println!();

    println!("Tier breakdown ({}):", region);
    for breakdown in [analysis.standard_breakdown(), analysis.ia_breakdown()] {
        println!(
            "  {:<18} {} GB/month",
            breakdown.storage_class().name(),
            format_amount(breakdown.monthly_gb_ingested())
        );
        for (i, band) in breakdown.bands().iter().enumerate() {
            println!(
                "    tier {}: {:>12} GB x ${:.4} = ${}",
                i + 1,
                format_amount(band.usage_gb()),
                band.rate(),
                format_amount(band.cost())
            );
        }
    }

    println!();
    println!(
        "Sum of daily tiered costs: ${} (period total: ${})",
        format_amount(analysis.daily_new_cost_sum()),
        format_amount(analysis.total_new_cost())
    );

    Ok(())
}
