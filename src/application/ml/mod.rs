pub mod evaluation;
pub mod gradient_boosting;
pub mod model;
pub mod mounts;
pub mod predictor;
pub mod scorer;
pub mod split;
pub mod trainer;

pub use gradient_boosting::{BoostingParams, GradientBoostedClassifier};
pub use model::RugPullModel;
pub use predictor::RiskPredictor;
pub use scorer::{ScoredRecord, score_records};
pub use trainer::{TrainingMetrics, TrainingOptions, TrainingOutcome, train_model};
