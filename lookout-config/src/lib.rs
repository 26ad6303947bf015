//! Loader for Lookout configuration with YAML + environment overlays.
//!
//! Sources are merged in order: an optional `lookout.yaml`, inline snippets,
//! then `LOOKOUT__`-prefixed environment variables using `__` as the nesting
//! separator (`LOOKOUT__SEARCH__TIMEOUT_SECS=5`). String values may contain
//! `${VAR}` placeholders which are expanded after merging. Every key is
//! optional; an empty source set yields [`LookoutConfig::default`].
//!
//! Search credentials are deliberately not part of this schema; see
//! [`credentials`].
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub mod credentials;

pub use credentials::{Credentials, CredentialsError, load_dotenv};
pub use lookout_common::observability::{LogFormat, LogSettings};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Default file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lookout.yaml";

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_VIEWER: &str = "w3m";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LookoutConfig {
    pub search: SearchSettings,
    pub viewer: ViewerSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// External terminal browser used to open a chosen result.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Program name or path; resolved through `PATH` when not absolute.
    pub program: String,
    /// Extra arguments placed before the URL.
    pub args: Vec<String>,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_VIEWER.to_string(),
            args: Vec::new(),
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct LookoutConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: &'static str,
}

impl Default for LookoutConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LookoutConfigLoader {
    /// Start empty; environment overrides are applied last in [`load`](Self::load).
    ///
    /// ```
    /// use lookout_config::{LookoutConfigLoader, DEFAULT_VIEWER};
    ///
    /// let config = LookoutConfigLoader::new()
    ///     .with_yaml_str("search:\n  timeout_secs: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.search.timeout_secs, 3);
    /// assert_eq!(config.viewer.program, DEFAULT_VIEWER);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "LOOKOUT",
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use lookout_config::LookoutConfigLoader;
    ///
    /// unsafe { std::env::set_var("LOOKOUT_DOC_BROWSER", "/opt/bin/lynx"); }
    ///
    /// let config = LookoutConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// viewer:
    ///   program: "${LOOKOUT_DOC_BROWSER}"
    ///   args: ["-dump"]
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.viewer.program, "/opt/bin/lynx");
    /// assert_eq!(config.viewer.args, vec!["-dump".to_string()]);
    ///
    /// unsafe { std::env::remove_var("LOOKOUT_DOC_BROWSER"); }
    /// ```
    pub fn load(self) -> Result<LookoutConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(self.env_prefix)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("viewer.args"),
            )
            .build()?;

        // Convert to serde_json::Value first
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: LookoutConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        tracing::debug!(
            endpoint = %typed.search.endpoint,
            timeout_secs = typed.search.timeout_secs,
            viewer = %typed.viewer.program,
            "config.loaded"
        );
        Ok(typed)
    }
}
