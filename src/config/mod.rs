// src/config/mod.rs
//! Typed run configuration.
//!
//! Files are read as TOML, JSON or YAML (by extension), parsed into an
//! order-preserving `serde_json::Value`, checked against the config contract and
//! only then converted into [`Config`]. Weight defaulting is not done here; see
//! `analyze::weights::ScoreWeights::resolve`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::source_weights::SourceWeights;

/// Env var pointing at an explicit config file.
pub const ENV_PATH: &str = "RFP_CONFIG_PATH";

const FALLBACK_PATHS: [&str; 3] = ["config/rfp.toml", "config/rfp.yml", "config/rfp.json"];

/// Fields that must be present and non-null, with the alias accepted for each.
const REQUIRED: [(&str, Option<&str>); 5] = [
    ("keywords", None),
    ("regions", None),
    ("min_budget", None),
    ("max_age_days", Some("days_window")),
    ("top_n", Some("max_results")),
];

const WEIGHT_KEYS: [&str; 5] = ["keyword", "budget", "recency", "source", "region"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unsupported config format: {0} (expected .toml, .json, .yml or .yaml)")]
    UnsupportedFormat(PathBuf),
    #[error("missing required config field: {0}")]
    MissingField(String),
    #[error("config field '{0}' must not be null")]
    NullField(String),
    #[error("invalid config field '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

/// One configured region: either a bare label or a `{label: description}` pair.
/// The description may be left empty (`- East Asia (EAP):` in YAML).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionSpec {
    Label(String),
    Described(BTreeMap<String, Option<String>>),
}

/// Explicit weight overrides; `None` means "use the default for this signal".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightOverrides {
    #[serde(default)]
    pub keyword: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub recency: Option<f64>,
    #[serde(default)]
    pub source: Option<f64>,
    #[serde(default)]
    pub region: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub keywords: Vec<String>,
    pub min_budget: f64,
    pub max_age_days: u32,
    pub regions: Vec<RegionSpec>,
    #[serde(default)]
    pub source_weights: SourceWeights,
    #[serde(default)]
    pub weights: Option<WeightOverrides>,
    pub top_n: usize,
    #[serde(default)]
    pub strict_region_filter: bool,
    #[serde(default)]
    pub content_dedup: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Format::Toml),
            "json" => Some(Format::Json),
            "yml" | "yaml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

impl Config {
    /// Load from an explicit path; the format follows the file extension.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let format =
            Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.into()))?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.into(),
            source,
        })?;
        let cfg = Self::parse_str(&content, format).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.into(),
                message,
            },
            other => other,
        })?;
        info!(
            target: "config",
            path = %path.display(),
            keywords = cfg.keywords.len(),
            regions = cfg.regions.len(),
            "configuration loaded"
        );
        Ok(cfg)
    }

    /// Resolve the config path and load it:
    /// 1) `$RFP_CONFIG_PATH`
    /// 2) `config/rfp.toml`, `config/rfp.yml`, `config/rfp.json`
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            debug!(target: "config", path = %p, "using {ENV_PATH}");
            return Self::load_from(Path::new(&p));
        }
        for candidate in FALLBACK_PATHS {
            let p = PathBuf::from(candidate);
            if p.exists() {
                return Self::load_from(&p);
            }
        }
        Err(ConfigError::Io {
            path: PathBuf::from(FALLBACK_PATHS[0]),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no config file found"),
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Self::parse_str(s, Format::Toml)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Self::parse_str(s, Format::Json)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Self::parse_str(s, Format::Yaml)
    }

    fn parse_str(s: &str, format: Format) -> Result<Self, ConfigError> {
        let parse_err = |message: String| ConfigError::Parse {
            path: PathBuf::new(),
            message,
        };
        let value: Value = match format {
            Format::Toml => toml::from_str(s).map_err(|e| parse_err(e.to_string()))?,
            Format::Json => serde_json::from_str(s).map_err(|e| parse_err(e.to_string()))?,
            Format::Yaml => serde_yaml::from_str(s).map_err(|e| parse_err(e.to_string()))?,
        };
        Self::from_value(value)
    }

    /// Validate a loosely-typed document and convert it.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let Value::Object(mut map) = value else {
            return Err(ConfigError::Invalid {
                field: "config".into(),
                reason: "top level must be a mapping".into(),
            });
        };

        for (field, alias) in REQUIRED {
            if let Some(alias) = alias {
                fold_alias(&mut map, field, alias);
            }
            match map.get(field) {
                None => return Err(ConfigError::MissingField(field.into())),
                Some(Value::Null) => return Err(ConfigError::NullField(field.into())),
                Some(_) => {}
            }
        }

        match map.get("weights") {
            None => {}
            Some(Value::Null) => return Err(ConfigError::NullField("weights".into())),
            Some(Value::Object(w)) => {
                for key in WEIGHT_KEYS {
                    if matches!(w.get(key), Some(Value::Null)) {
                        return Err(ConfigError::NullField(format!("weights.{key}")));
                    }
                }
            }
            Some(_) => {
                return Err(ConfigError::Invalid {
                    field: "weights".into(),
                    reason: "must be a mapping".into(),
                })
            }
        }
        check_regions(&map)?;
        if matches!(map.get("source_weights"), Some(Value::Null)) {
            map.remove("source_weights");
        }

        let cfg: Config =
            serde_json::from_value(Value::Object(map)).map_err(|e| ConfigError::Invalid {
                field: "config".into(),
                reason: e.to_string(),
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_budget.is_finite() || self.min_budget < 0.0 {
            return Err(invalid("min_budget", "must be a finite number >= 0"));
        }
        if self.max_age_days == 0 {
            return Err(invalid("max_age_days", "must be > 0"));
        }
        if let Some(w) = &self.weights {
            for (key, v) in [
                ("keyword", w.keyword),
                ("budget", w.budget),
                ("recency", w.recency),
                ("source", w.source),
                ("region", w.region),
            ] {
                if let Some(v) = v {
                    if !v.is_finite() || v < 0.0 {
                        return Err(invalid(&format!("weights.{key}"), "must be a finite number >= 0"));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Each region must be a string or a mapping of label to text (or nothing).
fn check_regions(map: &Map<String, Value>) -> Result<(), ConfigError> {
    let Some(regions) = map.get("regions") else {
        return Ok(());
    };
    let Value::Array(items) = regions else {
        return Err(invalid("regions", "must be a list"));
    };
    for (i, item) in items.iter().enumerate() {
        let ok = match item {
            Value::String(_) => true,
            Value::Object(m) => m.values().all(|v| v.is_string() || v.is_null()),
            _ => false,
        };
        if !ok {
            return Err(invalid(
                &format!("regions[{i}]"),
                "expected a label or a {label: description} mapping",
            ));
        }
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Move `alias` onto `canonical` unless the canonical key carries a value.
fn fold_alias(map: &mut Map<String, Value>, canonical: &str, alias: &str) {
    let aliased = map.remove(alias);
    let canonical_set = map.get(canonical).is_some_and(|v| !v.is_null());
    if canonical_set {
        return;
    }
    if let Some(v) = aliased {
        map.insert(canonical.to_string(), v);
    }
}
