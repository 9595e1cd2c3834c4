use crate::calculator::{FlatCostCalculator, TieredCostCalculator};
use crate::data_structures::{
    BillingPeriod, ComparisonResult, DailyComparisonRow, DailyUsageRecord, StorageClass,
};
use crate::error::Result;
use crate::pricing::PricingCatalog;

/// Compares flat and tiered pricing over a run of daily usage records.
pub struct CostAnalyzer<'a> {
    catalog: &'a PricingCatalog,
    flat: FlatCostCalculator<'a>,
    tiered: TieredCostCalculator<'a>,
}

impl<'a> CostAnalyzer<'a> {
    pub fn new(catalog: &'a PricingCatalog) -> Self {
        Self::with_billing_period(catalog, BillingPeriod::default())
    }

    pub fn with_billing_period(catalog: &'a PricingCatalog, billing_period: BillingPeriod) -> Self {
        Self {
            catalog,
            flat: FlatCostCalculator::new(catalog),
            tiered: TieredCostCalculator::with_billing_period(catalog, billing_period),
        }
    }

    /// Period totals tier the summed volume of each storage class once, while each
    /// daily row tiers that day's volume on its own. Records sharing a date are not
    /// merged. Fails on the first record a calculator rejects.
    pub fn analyze(&self, records: &[DailyUsageRecord], region: &str) -> Result<ComparisonResult> {
        if !self.catalog.contains(region) {
            tracing::warn!(
                region,
                fallback = self.catalog.default_region(),
                "no pricing for region, using default region rates"
            );
        }

        let total_standard_gb: f64 = records.iter().map(|r| r.standard_gb()).sum();
        let total_ia_gb: f64 = records.iter().map(|r| r.ia_gb()).sum();

        let total_old_cost = self.flat.cost(total_standard_gb, total_ia_gb, region)?;

        let period = self.tiered.billing_period();
        let standard_breakdown = self.tiered.cost(
            period.to_daily(total_standard_gb),
            region,
            StorageClass::Standard,
        )?;
        let ia_breakdown = self.tiered.cost(
            period.to_daily(total_ia_gb),
            region,
            StorageClass::InfrequentAccess,
        )?;

        let mut sorted: Vec<&DailyUsageRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.date());

        let daily_comparisons = sorted
            .into_iter()
            .map(|record| self.compare_day(record, region))
            .collect::<Result<Vec<_>>>()?;

        let result = ComparisonResult::new(
            region.to_string(),
            total_old_cost,
            total_standard_gb,
            total_ia_gb,
            standard_breakdown,
            ia_breakdown,
            daily_comparisons,
        );

        tracing::info!(
            region,
            days = result.daily_comparisons().len(),
            total_gb = result.total_gb(),
            old_cost = result.total_old_cost(),
            new_cost = result.total_new_cost(),
            "cost analysis complete"
        );
        Ok(result)
    }

    pub fn compare_day(&self, record: &DailyUsageRecord, region: &str) -> Result<DailyComparisonRow> {
        let old_cost = self
            .flat
            .cost(record.standard_gb(), record.ia_gb(), region)?;

        let standard = self
            .tiered
            .cost(record.standard_gb(), region, StorageClass::Standard)?;
        let ia = self
            .tiered
            .cost(record.ia_gb(), region, StorageClass::InfrequentAccess)?;
        let new_cost = standard.total_daily_cost() + ia.total_daily_cost();

        Ok(DailyComparisonRow::new(record, old_cost, new_cost))
    }
}
