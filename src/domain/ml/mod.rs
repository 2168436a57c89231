pub mod feature_registry;
pub mod imputation;
pub mod labels;

pub use feature_registry::{
    FEATURE_COLUMNS, FEATURE_COUNT, FEATURE_SOURCES, FeatureRow, build_feature_rows,
    feature_names, flatten_record,
};
pub use imputation::Imputer;
pub use labels::build_labels;
