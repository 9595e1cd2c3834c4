use crate::data_structures::{RegionPricing, TierSchedule};
use crate::error::{EstimatorError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_REGION: &str = "us-east-1";

const BUILTIN_PRICING: &str = include_str!("../pricing/cloudwatch_pricing.json");

#[derive(Debug, Deserialize)]
struct RegionDocument {
    logs: LogsDocument,
}

#[derive(Debug, Deserialize)]
struct LogsDocument {
    standard_ingestion: f64,
    infrequent_ingestion: f64,
    vended_logs: VendedLogsDocument,
}

#[derive(Debug, Deserialize)]
struct VendedLogsDocument {
    to_cloudwatch_logs_standard: TierSchedule,
    to_cloudwatch_logs_infrequent: TierSchedule,
}

impl From<RegionDocument> for RegionPricing {
    fn from(doc: RegionDocument) -> Self {
        RegionPricing::new(
            doc.logs.standard_ingestion,
            doc.logs.infrequent_ingestion,
            doc.logs.vended_logs.to_cloudwatch_logs_standard,
            doc.logs.vended_logs.to_cloudwatch_logs_infrequent,
        )
    }
}

/// Per-region ingestion rates. Lookups for unknown regions fall back to the
/// default region.
#[derive(Debug, Clone)]
pub struct PricingCatalog {
    regions: HashMap<String, RegionPricing>,
    default_region: String,
    default_pricing: RegionPricing,
}

impl PricingCatalog {
    pub fn new(
        regions: HashMap<String, RegionPricing>,
        default_region: impl Into<String>,
    ) -> Result<Self> {
        let default_region = default_region.into();
        let default_pricing = regions.get(&default_region).cloned().ok_or_else(|| {
            EstimatorError::Config(format!(
                "pricing data has no entry for default region '{}'",
                default_region
            ))
        })?;

        for (region, pricing) in &regions {
            for (field, rate) in pricing.all_rates() {
                if !rate.is_finite() || rate < 0.0 {
                    return Err(EstimatorError::Config(format!(
                        "region '{}' has invalid rate {} for '{}'",
                        region, rate, field
                    )));
                }
            }
        }

        Ok(Self {
            regions,
            default_region,
            default_pricing,
        })
    }

    /// The pricing document shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_PRICING)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let documents: HashMap<String, RegionDocument> = serde_json::from_str(json)
            .map_err(|e| EstimatorError::Config(format!("malformed pricing data: {}", e)))?;

        let regions = documents
            .into_iter()
            .map(|(region, doc)| (region, RegionPricing::from(doc)))
            .collect();

        Self::new(regions, DEFAULT_REGION)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            EstimatorError::Config(format!(
                "failed to read pricing file {}: {}",
                path.display(),
                e
            ))
        })?;

        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            regions = catalog.regions.len(),
            "loaded pricing data"
        );
        Ok(catalog)
    }

    /// Pricing for `region`, or for the default region when `region` is unknown.
    pub fn lookup(&self, region: &str) -> &RegionPricing {
        self.regions.get(region).unwrap_or(&self.default_pricing)
    }

    pub fn contains(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        regions.sort_unstable();
        regions
    }
}
