//! Mount checks for the containerised trainer entrypoint.

use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "/trainer/data";
pub const DEFAULT_MODELS_DIR: &str = "/trainer/models";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub path: PathBuf,
    pub exists: bool,
}

impl Mount {
    fn inspect(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            exists: path.exists(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountStatus {
    pub data: Mount,
    pub models: Mount,
}

impl MountStatus {
    pub fn all_present(&self) -> bool {
        self.data.exists && self.models.exists
    }
}

pub fn inspect_mounts(data_dir: &Path, models_dir: &Path) -> MountStatus {
    MountStatus {
        data: Mount::inspect(data_dir),
        models: Mount::inspect(models_dir),
    }
}
