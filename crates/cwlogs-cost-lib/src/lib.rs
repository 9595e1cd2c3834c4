pub mod aggregator;
pub mod analyzer;
pub mod calculator;
pub mod data_structures;
pub mod error;
pub mod loader;
pub mod pricing;
pub mod report;

pub use aggregator::DailyAggregator;
pub use analyzer::CostAnalyzer;
pub use calculator::{FlatCostCalculator, TieredCostCalculator};
pub use data_structures::{
    AnalysisWindow, BandCharge, BillingPeriod, ComparisonResult, DailyComparisonRow,
    DailyUsageRecord, RegionPricing, StorageClass, TierBreakdown, TierSchedule,
    UsageObservation,
};
pub use error::{ErrorKind, EstimatorError, Result};
pub use loader::UsageLoader;
pub use pricing::{PricingCatalog, DEFAULT_REGION};
pub use report::{format_amount, render_report, report_file_name, write_report};

pub use chrono::NaiveDate;

pub mod prelude {
    pub use crate::analyzer::CostAnalyzer;
    pub use crate::data_structures::{ComparisonResult, DailyUsageRecord, StorageClass};
    pub use crate::error::{EstimatorError, Result};
    pub use crate::pricing::PricingCatalog;
    pub use crate::report::render_report;
    pub use chrono::NaiveDate;
}
