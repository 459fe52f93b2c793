use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tokio::fs::read_to_string;
use tracing::debug;

/// Environment variable naming an optional YAML file that overrides [`Settings`]
pub const CONFIG_ENV: &str = "FIO_SWEEP_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub fio: FioSettings,
    pub plot: PlotSettings,
    /// The x-axis of the plot, traversed in order
    pub io_depths: Vec<NonZeroU32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FioSettings {
    pub program: String,
    pub ioengine: String,
    pub direct: bool,
    pub bs: String,
    pub size: String,
    pub numjobs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotSettings {
    pub program: String,
    /// Scratch script handed to the plotting program, removed after use
    pub script_file: PathBuf,
    pub width: u32,
    pub height: u32,
    pub font: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fio: FioSettings::default(),
            plot: PlotSettings::default(),
            io_depths: (0..9).filter_map(|shift| NonZeroU32::new(1 << shift)).collect(),
        }
    }
}

impl Default for FioSettings {
    fn default() -> Self {
        Self {
            program: "fio".to_owned(),
            ioengine: "libaio".to_owned(),
            direct: true,
            bs: "4k".to_owned(),
            size: "1G".to_owned(),
            numjobs: 1,
        }
    }
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            program: "gnuplot".to_owned(),
            script_file: PathBuf::from("gnuplot_script.gp"),
            width: 800,
            height: 600,
            font: "Verdana,10".to_owned(),
        }
    }
}

impl Settings {
    /// Defaults, overridden by the file named in [`CONFIG_ENV`] when it is set
    pub async fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path).await,
            None => Ok(Self::default()),
        }
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading settings from {}", path.display());
        let contents = read_to_string(path)
            .await
            .context(format!("Reading config file {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let settings: Settings = serde_yml::from_str(contents).context("Parsing config file")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.io_depths.is_empty() {
            bail!("io_depths must not be empty");
        }
        if self.io_depths.windows(2).any(|pair| pair[0] >= pair[1]) {
            bail!("io_depths must be strictly ascending: {:?}", self.io_depths);
        }
        if self.fio.numjobs == 0 {
            bail!("fio.numjobs must be positive");
        }
        Ok(())
    }
}
