use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub keys: KeysConfig,
}

/// Where the generated payload files live and what they are called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_root")]
    pub root: PathBuf,
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,
    #[serde(default = "default_comments_file")]
    pub comments_file: String,
    #[serde(default = "default_xml_links_file")]
    pub xml_links_file: String,
    #[serde(default = "default_translation_links_file")]
    pub translation_links_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Corpus size at which the scan switches to batched, yielding mode.
    #[serde(default = "default_async_threshold")]
    pub async_threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysConfig {
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: String,
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
}

fn default_data_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_catalog_file() -> String {
    "docs_index.json".to_string()
}

fn default_comments_file() -> String {
    "comments.json".to_string()
}

fn default_xml_links_file() -> String {
    "xml_class_links.json".to_string()
}

fn default_translation_links_file() -> String {
    "translation_links.json".to_string()
}

fn default_result_limit() -> usize {
    100
}

fn default_batch_size() -> usize {
    50
}

fn default_async_threshold() -> usize {
    400
}

fn default_comment_prefix() -> String {
    "Assembly-CSharp.Version".to_string()
}

fn default_namespace() -> String {
    "Global".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: default_data_root(),
            catalog_file: default_catalog_file(),
            comments_file: default_comments_file(),
            xml_links_file: default_xml_links_file(),
            translation_links_file: default_translation_links_file(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            batch_size: default_batch_size(),
            async_threshold: default_async_threshold(),
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            comment_prefix: default_comment_prefix(),
            default_namespace: default_namespace(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            search: SearchConfig::default(),
            keys: KeysConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    pub fn from_data_root<P: AsRef<std::path::Path>>(root: P) -> Self {
        let mut config = Self::default();
        config.data.root = root.as_ref().to_path_buf();
        config
    }
}
