use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const CONFIG_FILE: &str = ".diagtrack.toml";

/// Default size ceiling for any input file: 100 MiB.
pub const DEFAULT_MAX_INPUT_SIZE: u64 = 100 * 1024 * 1024;

/// diagtrack configuration (loaded from .diagtrack.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagConfig {
    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub charts: ChartsConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Glob pattern used with --inputs-dir
    #[serde(default = "default_glob")]
    pub glob: String,

    /// Deduplicate merged diagnostics
    #[serde(default = "default_true")]
    pub dedup: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Source filter; "*" reports every tool
    #[serde(default = "default_source")]
    pub source: String,

    /// Code filter (empty = no filter)
    #[serde(default)]
    pub code: String,

    /// Message substring filter (empty = no filter)
    #[serde(default)]
    pub message_contains: String,

    /// Maximum diagnostics reported after filtering (0 = unlimited)
    #[serde(default)]
    pub max_items: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartsConfig {
    #[serde(default = "default_charts_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_top_n")]
    pub top_n: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Inputs larger than this many bytes are rejected unread
    #[serde(default = "default_max_input_size")]
    pub max_input_size: u64,
}

fn default_glob() -> String {
    "*.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_source() -> String {
    "clangd".to_string()
}

fn default_charts_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_top_n() -> i64 {
    20
}

fn default_max_input_size() -> u64 {
    DEFAULT_MAX_INPUT_SIZE
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            glob: default_glob(),
            dedup: true,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            source: default_source(),
            code: String::new(),
            message_contains: String::new(),
            max_items: 0,
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        ChartsConfig {
            out_dir: default_charts_dir(),
            top_n: default_top_n(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }
}

impl DiagConfig {
    /// Load .diagtrack.toml from `start` or its parents, falling back to
    /// defaults when there is none or it does not parse.
    pub fn load(start: &Path) -> Self {
        let Some(config_path) = find_config_file(start) else {
            debug!("No {} found above {}", CONFIG_FILE, start.display());
            return DiagConfig::default();
        };
        debug!("Found config: {}", config_path.display());

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str::<DiagConfig>(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", config_path.display(), e);
                    DiagConfig::default()
                }
            },
            Err(e) => {
                warn!("Could not read {}: {}", config_path.display(), e);
                DiagConfig::default()
            }
        }
    }
}

/// Walk up from `start` to find .diagtrack.toml
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let config = current.join(CONFIG_FILE);
        if config.is_file() {
            return Some(config);
        }
        if !current.pop() {
            return None;
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# diagtrack configuration

[merge]
# Pattern used to pick export files with --inputs-dir
glob = "*.json"

# Set to false to keep duplicate diagnostics
dedup = true

[report]
# Only report diagnostics from this tool ("*" = every tool)
source = "clangd"

# Only report this diagnostic code (empty = all codes)
# code = "unused-includes"

# Only report messages containing this text (case-sensitive)
# message_contains = ""

# Cap on reported diagnostics after filtering (0 = unlimited)
max_items = 0

[charts]
out_dir = "charts"
top_n = 20

[limits]
# Inputs above this size (bytes) are rejected. Default: 100 MiB
# max_input_size = 104857600
"#;

/// Create a default .diagtrack.toml in `dir`. Returns false when one
/// already exists.
pub fn init_config(dir: &Path) -> Result<bool> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        return Ok(false);
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("writing {}", config_path.display()))?;
    Ok(true)
}
