//! Fixed test data shaped like real collector payloads.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::collector::{FieldMap, MetricValue, Provenance, Record};

/// A schema-conformant field map with fixed values, as a live extraction
/// would produce.
pub fn trade_fields() -> FieldMap {
    let mut export = BTreeMap::new();
    export.insert("2021".to_string(), 360_000.0);
    export.insert("2022".to_string(), 378_000.0);
    export.insert("2023".to_string(), 396_000.0);

    let mut import = BTreeMap::new();
    import.insert("2021".to_string(), 240_000.0);
    import.insert("2022".to_string(), 246_000.0);
    import.insert("2023".to_string(), 252_000.0);

    let mut fields = FieldMap::new();
    fields.insert("revenue".to_string(), MetricValue::Number(600_000.0));
    fields.insert("growth_rate".to_string(), MetricValue::Number(5.0));
    fields.insert("market_cap".to_string(), MetricValue::Number(250_000_000.0));
    fields.insert("export".to_string(), MetricValue::Series(export));
    fields.insert("import".to_string(), MetricValue::Series(import));
    fields
}

/// A complete record for the given subject.
pub fn record(subject: &str, provenance: Provenance) -> Record {
    Record {
        subject_id: subject.to_string(),
        fields: trade_fields(),
        provenance,
        generated_at: Utc::now(),
    }
}
