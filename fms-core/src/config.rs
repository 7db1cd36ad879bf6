use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::plan::SlotLayout;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FmsConfig {
    pub system: SystemSection,
    #[serde(default)]
    pub slots: SlotsSection,
    pub navdata: NavdataSection,
    /// Directory the config was loaded from, used to anchor relative paths.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl FmsConfig {
    pub fn resolve_path<P: AsRef<Path>>(&self, candidate: P) -> PathBuf {
        let path = candidate.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn navdata_path(&self) -> PathBuf {
        self.resolve_path(&self.navdata.path)
    }

    pub fn slot_layout(&self) -> SlotLayout {
        SlotLayout::new(self.slots.secondary_count)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemSection {
    pub node_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotsSection {
    pub secondary_count: u8,
}

impl Default for SlotsSection {
    fn default() -> Self {
        Self {
            secondary_count: SlotLayout::DEFAULT_SECONDARY_COUNT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavdataSection {
    pub path: PathBuf,
}

pub fn load_fms_config<P: AsRef<Path>>(path: P) -> Result<FmsConfig> {
    let path = path.as_ref();
    let mut config: FmsConfig = load_toml(path)?;
    if config.navdata.path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: "navdata.path must not be empty".to_string(),
        });
    }
    config.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(config)
}

pub(crate) fn load_toml<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        source,
        path: path.to_path_buf(),
    })
}
