use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use benefits_core::models::employee::Employee;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const DEFAULT_ANALYSIS_URL: &str = "http://localhost:8000";
const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 60;
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HISTORY_TIMEOUT_SECS: u64 = 10;

pub const ENV_ANALYSIS_URL: &str = "BENEFITS_ANALYSIS_URL";
pub const ENV_BUCKET: &str = "BENEFITS_BUCKET";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub analysis_base_url: String,
    /// Added in v1.
    pub analysis_timeout_secs: u64,
    /// Added in v1.
    pub lookup_timeout_secs: u64,
    /// Added in v1.
    pub history_timeout_secs: u64,
    pub storage: StorageBackend,
    /// Where the session snapshot lives. Defaults to the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_dir: Option<PathBuf>,
}

/// Backend for the employee directory and transcript store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    /// In-process directory seeded with `employees`; transcripts are lost
    /// on exit.
    Memory {
        #[serde(default)]
        employees: Vec<Employee>,
    },
    /// A blank `region` falls back to the default AWS region chain.
    S3 {
        #[serde(default)]
        region: String,
        bucket: String,
    },
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            analysis_base_url: DEFAULT_ANALYSIS_URL.to_string(),
            analysis_timeout_secs: DEFAULT_ANALYSIS_TIMEOUT_SECS,
            lookup_timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
            history_timeout_secs: DEFAULT_HISTORY_TIMEOUT_SECS,
            storage: StorageBackend::Memory {
                employees: Vec::new(),
            },
            session_dir: None,
        }
    }
}

impl WidgetConfig {
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn history_timeout(&self) -> Duration {
        Duration::from_secs(self.history_timeout_secs)
    }

    pub fn session_dir(&self) -> eyre::Result<PathBuf> {
        match &self.session_dir {
            Some(dir) => Ok(dir.clone()),
            None => config_dir(),
        }
    }

    /// Apply `BENEFITS_ANALYSIS_URL` and `BENEFITS_BUCKET` from the process
    /// environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`. Blank values are ignored. The bucket
    /// override only applies to the S3 backend.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_ANALYSIS_URL) {
            tracing::debug!(url = %url, "analysis URL overridden from environment");
            self.analysis_base_url = url;
        }

        if let Some(value) = get(ENV_BUCKET) {
            match &mut self.storage {
                StorageBackend::S3 { bucket, .. } => {
                    tracing::debug!(bucket = %value, "bucket overridden from environment");
                    *bucket = value;
                }
                StorageBackend::Memory { .. } => {
                    tracing::warn!("{ENV_BUCKET} is set but storage backend is memory; ignoring");
                }
            }
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.benefits.widget"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn has_config() -> bool {
    config_path().map(|p| p.exists()).unwrap_or(false)
}

pub fn load_config() -> eyre::Result<WidgetConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> eyre::Result<WidgetConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = match json.get("config_version").and_then(|v| v.as_u64()) {
        None => 0,
        Some(v) => u32::try_from(v).map_err(|_| {
            eyre::eyre!(
                "config_version {v} is newer than this build supports ({CURRENT_VERSION}). \
                 Please update the benefits widget."
            )
        })?,
    };

    let migrated = migrate(json, on_disk_version)?;
    let config: WidgetConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update the benefits widget."
        ));
    }

    // v0 → v1: add per-call timeouts
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        for (field, default) in [
            ("analysis_timeout_secs", DEFAULT_ANALYSIS_TIMEOUT_SECS),
            ("lookup_timeout_secs", DEFAULT_LOOKUP_TIMEOUT_SECS),
            ("history_timeout_secs", DEFAULT_HISTORY_TIMEOUT_SECS),
        ] {
            obj.entry(field)
                .or_insert(serde_json::Value::Number(default.into()));
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added timeouts)");
    }

    Ok(json)
}

pub fn save_config(config: &WidgetConfig) -> eyre::Result<()> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &WidgetConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
