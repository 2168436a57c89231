use crate::domain::record::Record;

/// Number of model input columns.
pub const FEATURE_COUNT: usize = 12;

/// Where a feature column is read from inside a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSource {
    pub column: &'static str,
    /// Nested object holding the field, `None` for top-level fields.
    pub container: Option<&'static str>,
    pub field: &'static str,
}

const fn top(column: &'static str, field: &'static str) -> FeatureSource {
    FeatureSource {
        column,
        container: None,
        field,
    }
}

const fn nested(
    column: &'static str,
    container: &'static str,
    field: &'static str,
) -> FeatureSource {
    FeatureSource {
        column,
        container: Some(container),
        field,
    }
}

/// Ordered feature table shared by training, scoring and the persisted model.
/// Any change here is a breaking change for saved models.
pub const FEATURE_SOURCES: [FeatureSource; FEATURE_COUNT] = [
    top("score", "score"),
    nested("rug_risk_score", "rugRisk", "score"),
    nested("rug_holders_pct", "rugRisk", "holdersPct"),
    nested("rug_liquidity_usd", "rugRisk", "liquidityUsd"),
    nested("rug_vol24h_usd", "rugRisk", "vol24hUsd"),
    top("price_impact_pct", "priceImpactPct"),
    nested("volatility_range_pct", "volatility", "rangePct"),
    nested("volatility_chop_pct", "volatility", "chopPct"),
    nested("signal_score", "signal", "score"),
    nested("momentum_score", "momentum", "score"),
    nested("momentum_pct_short", "momentum", "pctShort"),
    nested("momentum_pct_long", "momentum", "pctLong"),
];

/// Ordered list of feature names, derived from [`FEATURE_SOURCES`].
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = {
    let mut names = [""; FEATURE_COUNT];
    let mut i = 0;
    while i < FEATURE_COUNT {
        names[i] = FEATURE_SOURCES[i].column;
        i += 1;
    }
    names
};

/// Owned copy of [`FEATURE_COLUMNS`] for artifacts and reports.
pub fn feature_names() -> Vec<String> {
    FEATURE_COLUMNS.iter().map(|name| name.to_string()).collect()
}

/// Fixed-width projection of a record. Cells stay `None` until imputation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureRow {
    values: [Option<f64>; FEATURE_COUNT],
}

impl FeatureRow {
    pub fn new(values: [Option<f64>; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Option<f64>; FEATURE_COUNT] {
        &self.values
    }

    /// Cell by column name; `None` both for unknown columns and missing values.
    pub fn get(&self, column: &str) -> Option<f64> {
        FEATURE_COLUMNS
            .iter()
            .position(|name| *name == column)
            .and_then(|idx| self.values[idx])
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// Projects a record onto the feature table. Never fails: a missing
/// container or field simply leaves the cell empty.
pub fn flatten_record(record: &Record) -> FeatureRow {
    let mut values = [None; FEATURE_COUNT];
    for (slot, source) in values.iter_mut().zip(FEATURE_SOURCES.iter()) {
        *slot = match source.container {
            Some(container) => record.nested_number(container, source.field),
            None => record.number(source.field),
        };
    }
    FeatureRow { values }
}

/// One row per record, in input order.
pub fn build_feature_rows(records: &[Record]) -> Vec<FeatureRow> {
    records.iter().map(flatten_record).collect()
}
