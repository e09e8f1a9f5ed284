//! Default synthetic record generation.

use std::collections::BTreeMap;

use chrono::{Datelike, Utc};
use rand::Rng;

use super::types::{FieldMap, MetricValue, Synthesizer, METRIC_KEYS};

/// Generates placeholder trade metrics shaped like a live extraction.
///
/// Values are drawn from the thread RNG on every call, so two records for the
/// same subject will differ. Only the shape is deterministic: the emitted key
/// set is always exactly [`METRIC_KEYS`], with export/import as year-keyed
/// series over the three most recent full years.
#[derive(Debug, Default)]
pub struct TradeSynthesizer;

impl TradeSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl Synthesizer for TradeSynthesizer {
    fn synthesize(&self, _subject: &str) -> FieldMap {
        let mut rng = rand::thread_rng();

        let base_revenue = rng.gen_range(100_000..1_100_000) as f64;
        let growth_rate = (rng.gen_range(-10.0..40.0f64) * 10.0).round() / 10.0;
        let market_cap = rng.gen_range(10_000_000..510_000_000) as f64;

        let current_year = Utc::now().year();
        let mut export = BTreeMap::new();
        let mut import = BTreeMap::new();
        for offset in (1..=3).rev() {
            let year = (current_year - offset).to_string();
            // Older years drift further from the base, scaled by the growth rate.
            let drift = 1.0 + (growth_rate / 100.0) * (3 - offset) as f64;
            export.insert(year.clone(), (base_revenue * 0.6 * drift).floor());
            import.insert(year, (base_revenue * 0.4 * drift).floor());
        }

        let mut fields = FieldMap::new();
        fields.insert("revenue".to_string(), MetricValue::Number(base_revenue));
        fields.insert("growth_rate".to_string(), MetricValue::Number(growth_rate));
        fields.insert("market_cap".to_string(), MetricValue::Number(market_cap));
        fields.insert("export".to_string(), MetricValue::Series(export));
        fields.insert("import".to_string(), MetricValue::Series(import));
        fields
    }
}
