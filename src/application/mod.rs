// Training, evaluation and scoring pipelines
pub mod ml;
