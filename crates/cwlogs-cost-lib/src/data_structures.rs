use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub const GB_PER_TB: f64 = 1000.0;
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

pub const TIER_THRESHOLDS_GB: [f64; 3] = [10.0 * GB_PER_TB, 30.0 * GB_PER_TB, 50.0 * GB_PER_TB];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    Standard,
    InfrequentAccess,
}

impl StorageClass {
    /// Maps a CloudWatch log group class onto a storage class. Anything other than
    /// `INFREQUENT_ACCESS` (`STANDARD`, `DELIVERY`, unknown) is billed as standard.
    pub fn from_log_group_class(class: &str) -> Self {
        if class.eq_ignore_ascii_case("INFREQUENT_ACCESS") {
            StorageClass::InfrequentAccess
        } else {
            StorageClass::Standard
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StorageClass::Standard => "Standard",
            StorageClass::InfrequentAccess => "Infrequent Access",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSchedule {
    first_10tb: f64,
    next_20tb: f64,
    next_20tb_plus: f64,
    over_50tb: f64,
}

impl TierSchedule {
    pub fn new(first_10tb: f64, next_20tb: f64, next_20tb_plus: f64, over_50tb: f64) -> Self {
        Self {
            first_10tb,
            next_20tb,
            next_20tb_plus,
            over_50tb,
        }
    }

    pub fn from_rates(rates: [f64; 4]) -> Self {
        Self::new(rates[0], rates[1], rates[2], rates[3])
    }

    pub fn rates(&self) -> [f64; 4] {
        [
            self.first_10tb,
            self.next_20tb,
            self.next_20tb_plus,
            self.over_50tb,
        ]
    }

    pub fn first_10tb(&self) -> f64 {
        self.first_10tb
    }

    pub fn next_20tb(&self) -> f64 {
        self.next_20tb
    }

    pub fn next_20tb_plus(&self) -> f64 {
        self.next_20tb_plus
    }

    pub fn over_50tb(&self) -> f64 {
        self.over_50tb
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionPricing {
    standard_ingestion_rate: f64,
    infrequent_ingestion_rate: f64,
    standard_tiers: TierSchedule,
    infrequent_tiers: TierSchedule,
}

impl RegionPricing {
    pub fn new(
        standard_ingestion_rate: f64,
        infrequent_ingestion_rate: f64,
        standard_tiers: TierSchedule,
        infrequent_tiers: TierSchedule,
    ) -> Self {
        Self {
            standard_ingestion_rate,
            infrequent_ingestion_rate,
            standard_tiers,
            infrequent_tiers,
        }
    }

    pub fn standard_ingestion_rate(&self) -> f64 {
        self.standard_ingestion_rate
    }

    pub fn infrequent_ingestion_rate(&self) -> f64 {
        self.infrequent_ingestion_rate
    }

    pub fn tiers(&self, storage_class: StorageClass) -> &TierSchedule {
        match storage_class {
            StorageClass::Standard => &self.standard_tiers,
            StorageClass::InfrequentAccess => &self.infrequent_tiers,
        }
    }

    pub(crate) fn all_rates(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        let flat = [
            ("standard_ingestion", self.standard_ingestion_rate),
            ("infrequent_ingestion", self.infrequent_ingestion_rate),
        ];
        let names = ["first_10tb", "next_20tb", "next_20tb_plus", "over_50tb"];
        let standard = names.into_iter().zip(self.standard_tiers.rates());
        let infrequent = names.into_iter().zip(self.infrequent_tiers.rates());
        flat.into_iter().chain(standard).chain(infrequent)
    }
}

/// Month length used to turn daily volumes into monthly ones and back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BillingPeriod {
    days_per_month: f64,
}

impl BillingPeriod {
    pub const DEFAULT_DAYS: f64 = 30.0;

    pub fn new(days_per_month: f64) -> Option<Self> {
        if days_per_month.is_finite() && days_per_month > 0.0 {
            Some(Self { days_per_month })
        } else {
            None
        }
    }

    pub fn days_per_month(&self) -> f64 {
        self.days_per_month
    }

    pub fn to_monthly(&self, daily: f64) -> f64 {
        daily * self.days_per_month
    }

    pub fn to_daily(&self, monthly: f64) -> f64 {
        monthly / self.days_per_month
    }
}

impl Default for BillingPeriod {
    fn default() -> Self {
        Self {
            days_per_month: Self::DEFAULT_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsageRecord {
    date: NaiveDate,
    standard_gb: f64,
    ia_gb: f64,
}

impl DailyUsageRecord {
    pub fn new(date: NaiveDate, standard_gb: f64, ia_gb: f64) -> Self {
        Self {
            date,
            standard_gb,
            ia_gb,
        }
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, 0.0, 0.0)
    }

    pub fn add(&mut self, storage_class: StorageClass, gb: f64) {
        match storage_class {
            StorageClass::Standard => self.standard_gb += gb,
            StorageClass::InfrequentAccess => self.ia_gb += gb,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn standard_gb(&self) -> f64 {
        self.standard_gb
    }

    pub fn ia_gb(&self) -> f64 {
        self.ia_gb
    }

    pub fn total_gb(&self) -> f64 {
        self.standard_gb + self.ia_gb
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsageObservation {
    date: NaiveDate,
    log_group: Option<String>,
    storage_class: StorageClass,
    bytes: f64,
}

impl UsageObservation {
    pub fn new(
        date: NaiveDate,
        log_group: Option<String>,
        storage_class: StorageClass,
        bytes: f64,
    ) -> Self {
        Self {
            date,
            log_group,
            storage_class,
            bytes,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn log_group(&self) -> Option<&str> {
        self.log_group.as_deref()
    }

    pub fn storage_class(&self) -> StorageClass {
        self.storage_class
    }

    pub fn bytes(&self) -> f64 {
        self.bytes
    }

    pub fn gb(&self) -> f64 {
        self.bytes / BYTES_PER_GB
    }
}

/// A half-open range of days, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl AnalysisWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start.checked_add_months(Months::new(1))?;
        Self::new(start, end)
    }

    pub fn previous_full_month(today: NaiveDate) -> Option<Self> {
        let end = today.with_day(1)?;
        let start = end.checked_sub_months(Months::new(1))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.start)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandCharge {
    usage_gb: f64,
    rate: f64,
    cost: f64,
}

impl BandCharge {
    pub fn new(usage_gb: f64, rate: f64) -> Self {
        Self {
            usage_gb,
            rate,
            cost: usage_gb * rate,
        }
    }

    pub fn usage_gb(&self) -> f64 {
        self.usage_gb
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierBreakdown {
    storage_class: StorageClass,
    daily_gb_ingested: f64,
    monthly_gb_ingested: f64,
    bands: [BandCharge; 4],
    total_monthly_cost: f64,
    total_daily_cost: f64,
}

impl TierBreakdown {
    pub fn new(
        storage_class: StorageClass,
        daily_gb_ingested: f64,
        monthly_gb_ingested: f64,
        bands: [BandCharge; 4],
        billing_period: BillingPeriod,
    ) -> Self {
        let total_monthly_cost = bands.iter().map(BandCharge::cost).sum();
        Self {
            storage_class,
            daily_gb_ingested,
            monthly_gb_ingested,
            bands,
            total_monthly_cost,
            total_daily_cost: billing_period.to_daily(total_monthly_cost),
        }
    }

    pub fn storage_class(&self) -> StorageClass {
        self.storage_class
    }

    pub fn daily_gb_ingested(&self) -> f64 {
        self.daily_gb_ingested
    }

    pub fn monthly_gb_ingested(&self) -> f64 {
        self.monthly_gb_ingested
    }

    pub fn bands(&self) -> &[BandCharge; 4] {
        &self.bands
    }

    pub fn tier_usage(&self) -> [f64; 4] {
        self.bands.map(|band| band.usage_gb())
    }

    pub fn tier_costs(&self) -> [f64; 4] {
        self.bands.map(|band| band.cost())
    }

    pub fn tier1_cost(&self) -> f64 {
        self.bands[0].cost()
    }

    pub fn tier2_cost(&self) -> f64 {
        self.bands[1].cost()
    }

    pub fn tier3_cost(&self) -> f64 {
        self.bands[2].cost()
    }

    pub fn tier4_cost(&self) -> f64 {
        self.bands[3].cost()
    }

    pub fn total_monthly_cost(&self) -> f64 {
        self.total_monthly_cost
    }

    pub fn total_daily_cost(&self) -> f64 {
        self.total_daily_cost
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyComparisonRow {
    date: NaiveDate,
    old_cost: f64,
    new_cost: f64,
    standard_gb: f64,
    ia_gb: f64,
    total_gb: f64,
    difference: f64,
}

impl DailyComparisonRow {
    pub fn new(record: &DailyUsageRecord, old_cost: f64, new_cost: f64) -> Self {
        Self {
            date: record.date(),
            old_cost,
            new_cost,
            standard_gb: record.standard_gb(),
            ia_gb: record.ia_gb(),
            total_gb: record.total_gb(),
            difference: new_cost - old_cost,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn old_cost(&self) -> f64 {
        self.old_cost
    }

    /// Tiered cost for this day alone, with the day's volume used as the daily rate
    /// for tiering. Not a share of [`ComparisonResult::total_new_cost`].
    pub fn new_cost(&self) -> f64 {
        self.new_cost
    }

    pub fn standard_gb(&self) -> f64 {
        self.standard_gb
    }

    pub fn ia_gb(&self) -> f64 {
        self.ia_gb
    }

    pub fn total_gb(&self) -> f64 {
        self.total_gb
    }

    pub fn difference(&self) -> f64 {
        self.difference
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    region: String,
    total_old_cost: f64,
    total_new_cost: f64,
    total_standard_gb: f64,
    total_ia_gb: f64,
    total_gb: f64,
    standard_breakdown: TierBreakdown,
    ia_breakdown: TierBreakdown,
    daily_comparisons: Vec<DailyComparisonRow>,
}

impl ComparisonResult {
    pub(crate) fn new(
        region: String,
        total_old_cost: f64,
        total_standard_gb: f64,
        total_ia_gb: f64,
        standard_breakdown: TierBreakdown,
        ia_breakdown: TierBreakdown,
        daily_comparisons: Vec<DailyComparisonRow>,
    ) -> Self {
        Self {
            region,
            total_old_cost,
            total_new_cost: standard_breakdown.total_monthly_cost()
                + ia_breakdown.total_monthly_cost(),
            total_standard_gb,
            total_ia_gb,
            total_gb: total_standard_gb + total_ia_gb,
            standard_breakdown,
            ia_breakdown,
            daily_comparisons,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn total_old_cost(&self) -> f64 {
        self.total_old_cost
    }

    /// Tiered cost of the whole period, computed from the monthly totals per
    /// storage class. Tiering is non-linear, so this differs from
    /// [`ComparisonResult::daily_new_cost_sum`].
    pub fn total_new_cost(&self) -> f64 {
        self.total_new_cost
    }

    pub fn total_standard_gb(&self) -> f64 {
        self.total_standard_gb
    }

    pub fn total_ia_gb(&self) -> f64 {
        self.total_ia_gb
    }

    pub fn total_gb(&self) -> f64 {
        self.total_gb
    }

    pub fn standard_breakdown(&self) -> &TierBreakdown {
        &self.standard_breakdown
    }

    pub fn ia_breakdown(&self) -> &TierBreakdown {
        &self.ia_breakdown
    }

    pub fn daily_comparisons(&self) -> &[DailyComparisonRow] {
        &self.daily_comparisons
    }

    pub fn cost_difference(&self) -> f64 {
        self.total_new_cost - self.total_old_cost
    }

    pub fn percentage_change(&self) -> Option<f64> {
        (self.total_old_cost > 0.0)
            .then(|| (self.total_new_cost - self.total_old_cost) / self.total_old_cost * 100.0)
    }

    /// Sum of the per-day `new_cost` values. Kept separate from
    /// [`ComparisonResult::total_new_cost`]; the two are not interchangeable.
    pub fn daily_new_cost_sum(&self) -> f64 {
        self.daily_comparisons.iter().map(|row| row.new_cost()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.daily_comparisons.is_empty()
    }
}
