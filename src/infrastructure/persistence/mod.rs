mod model_store;

pub use model_store::{load_model, save_model, write_metrics};
