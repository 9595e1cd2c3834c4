use crate::data_structures::{
    BandCharge, BillingPeriod, StorageClass, TierBreakdown, TierSchedule, TIER_THRESHOLDS_GB,
};
use crate::error::{ensure_volume, Result};
use crate::pricing::PricingCatalog;

pub struct FlatCostCalculator<'a> {
    catalog: &'a PricingCatalog,
}

impl<'a> FlatCostCalculator<'a> {
    pub fn new(catalog: &'a PricingCatalog) -> Self {
        Self { catalog }
    }

    pub fn cost(&self, standard_gb: f64, ia_gb: f64, region: &str) -> Result<f64> {
        ensure_volume("standard_gb", standard_gb)?;
        ensure_volume("ia_gb", ia_gb)?;

        let pricing = self.catalog.lookup(region);
        Ok(standard_gb * pricing.standard_ingestion_rate()
            + ia_gb * pricing.infrequent_ingestion_rate())
    }
}

pub struct TieredCostCalculator<'a> {
    catalog: &'a PricingCatalog,
    billing_period: BillingPeriod,
}

impl<'a> TieredCostCalculator<'a> {
    pub fn new(catalog: &'a PricingCatalog) -> Self {
        Self::with_billing_period(catalog, BillingPeriod::default())
    }

    pub fn with_billing_period(catalog: &'a PricingCatalog, billing_period: BillingPeriod) -> Self {
        Self {
            catalog,
            billing_period,
        }
    }

    pub fn billing_period(&self) -> BillingPeriod {
        self.billing_period
    }

    /// Tiers `daily_gb` as if it were ingested every day of the billing month.
    pub fn cost(
        &self,
        daily_gb: f64,
        region: &str,
        storage_class: StorageClass,
    ) -> Result<TierBreakdown> {
        ensure_volume("daily_gb", daily_gb)?;

        let schedule = self.catalog.lookup(region).tiers(storage_class);
        let monthly_gb = self.billing_period.to_monthly(daily_gb);
        Ok(self.tier(schedule, storage_class, daily_gb, monthly_gb))
    }

    pub fn cost_for_monthly(
        &self,
        monthly_gb: f64,
        region: &str,
        storage_class: StorageClass,
    ) -> Result<TierBreakdown> {
        ensure_volume("monthly_gb", monthly_gb)?;

        let schedule = self.catalog.lookup(region).tiers(storage_class);
        let daily_gb = self.billing_period.to_daily(monthly_gb);
        Ok(self.tier(schedule, storage_class, daily_gb, monthly_gb))
    }

    fn tier(
        &self,
        schedule: &TierSchedule,
        storage_class: StorageClass,
        daily_gb: f64,
        monthly_gb: f64,
    ) -> TierBreakdown {
        let usage = band_usage(monthly_gb);
        let rates = schedule.rates();
        let bands = std::array::from_fn(|i| BandCharge::new(usage[i], rates[i]));

        let breakdown = TierBreakdown::new(
            storage_class,
            daily_gb,
            monthly_gb,
            bands,
            self.billing_period,
        );
        tracing::trace!(
            storage_class = storage_class.name(),
            monthly_gb,
            total_monthly_cost = breakdown.total_monthly_cost(),
            "tiered cost computed"
        );
        breakdown
    }
}

/// Splits `monthly_gb` across the four bands. Each band receives
/// `clamp(monthly_gb - lower_bound, 0, width)`; the last band has no width cap.
/// Volume exactly on a threshold stays in the lower band.
pub fn band_usage(monthly_gb: f64) -> [f64; 4] {
    let [t1, t2, t3] = TIER_THRESHOLDS_GB;
    let lower_bounds = [0.0, t1, t2, t3];
    let widths = [t1, t2 - t1, t3 - t2, f64::INFINITY];

    let mut usage = [0.0; 4];
    for (i, slot) in usage.iter_mut().enumerate() {
        *slot = (monthly_gb - lower_bounds[i]).clamp(0.0, widths[i]);
    }
    usage
}
