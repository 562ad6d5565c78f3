use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;

pub use logging::setup_logging;

pub type AppConfig = AnalysisConfig;

pub const CONFIG_PREFIX: &str = "ANALYSIS_SERVICE";
const DEFAULT_CONFIG_PATH: &str = "config/analysis.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid environment override: {0}")]
    Env(#[source] envy::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub cleanup: CleanupConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_generation_temperature")]
    pub temperature: f32,
    #[serde(default = "default_generation_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_generation_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,
    #[serde(default = "default_capture_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_capture_public_path")]
    pub public_path: String,
    #[serde(default = "default_capture_max_width")]
    pub max_width: u32,
    #[serde(default = "default_capture_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "default_capture_concurrency")]
    pub concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cleanup_delay_ms")]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    #[default]
    Memory,
    JsonDir,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub kind: StorageKind,
    #[serde(default = "default_storage_directory")]
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_full_analysis_markers")]
    pub full_analysis_markers: u32,
    #[serde(default = "default_paragraph_markers")]
    pub paragraph_markers: u32,
    #[serde(default = "default_frame_count")]
    pub frame_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub items: Vec<CatalogItemConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItemConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub transcript: Option<String>,
    pub media_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_generation_base_url(),
            api_key: None,
            model: default_generation_model(),
            temperature: default_generation_temperature(),
            max_tokens: default_generation_max_tokens(),
            request_timeout_ms: default_generation_timeout_ms(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            output_dir: default_capture_output_dir(),
            public_path: default_capture_public_path(),
            max_width: default_capture_max_width(),
            jpeg_quality: default_capture_quality(),
            concurrency: default_capture_concurrency(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: default_cleanup_delay_ms(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::default(),
            directory: default_storage_directory(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            full_analysis_markers: default_full_analysis_markers(),
            paragraph_markers: default_paragraph_markers(),
            frame_count: default_frame_count(),
        }
    }
}

/// Loads the service configuration.
///
/// The TOML file named by `ANALYSIS_SERVICE_CONFIG` (or `config/analysis.toml`
/// when present) is read first, then `ANALYSIS_SERVICE_*` variables override it.
pub fn load_config() -> Result<AnalysisConfig, ConfigError> {
    let path = std::env::var(format!("{CONFIG_PREFIX}_CONFIG"))
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            fallback.exists().then_some(fallback)
        });

    let mut config = match path {
        Some(path) => load_config_file(&path)?,
        None => AnalysisConfig::default(),
    };
    apply_env_overrides(&mut config, std::env::vars())?;
    Ok(config)
}

pub fn load_config_file(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Flat view of every scalar setting as `ANALYSIS_SERVICE_<SECTION>_<FIELD>`.
/// Catalog items are file-only.
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    host: Option<String>,
    port: Option<u16>,
    log_level: Option<String>,
    log_json: Option<bool>,
    generation_base_url: Option<String>,
    generation_api_key: Option<String>,
    generation_model: Option<String>,
    generation_temperature: Option<f32>,
    generation_max_tokens: Option<u32>,
    generation_request_timeout_ms: Option<u64>,
    capture_ffmpeg_path: Option<String>,
    capture_ffprobe_path: Option<String>,
    capture_output_dir: Option<PathBuf>,
    capture_public_path: Option<String>,
    capture_max_width: Option<u32>,
    capture_jpeg_quality: Option<u8>,
    capture_concurrency: Option<usize>,
    cleanup_enabled: Option<bool>,
    cleanup_delay_ms: Option<u64>,
    storage_kind: Option<StorageKind>,
    storage_directory: Option<PathBuf>,
    defaults_full_analysis_markers: Option<u32>,
    defaults_paragraph_markers: Option<u32>,
    defaults_frame_count: Option<u32>,
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl EnvOverrides {
    fn apply(self, config: &mut AnalysisConfig) {
        set(&mut config.server.host, self.host);
        set(&mut config.server.port, self.port);
        set(&mut config.logging.level, self.log_level);
        set(&mut config.logging.json, self.log_json);

        let generation = &mut config.service.generation;
        set(&mut generation.base_url, self.generation_base_url);
        set(&mut generation.model, self.generation_model);
        set(&mut generation.temperature, self.generation_temperature);
        set(&mut generation.max_tokens, self.generation_max_tokens);
        set(&mut generation.request_timeout_ms, self.generation_request_timeout_ms);
        if let Some(api_key) = self.generation_api_key.filter(|key| !key.is_empty()) {
            generation.api_key = Some(api_key);
        }

        let capture = &mut config.service.capture;
        set(&mut capture.ffmpeg_path, self.capture_ffmpeg_path);
        set(&mut capture.ffprobe_path, self.capture_ffprobe_path);
        set(&mut capture.output_dir, self.capture_output_dir);
        set(&mut capture.public_path, self.capture_public_path);
        set(&mut capture.max_width, self.capture_max_width);
        set(&mut capture.jpeg_quality, self.capture_jpeg_quality);
        set(&mut capture.concurrency, self.capture_concurrency);

        set(&mut config.service.cleanup.enabled, self.cleanup_enabled);
        set(&mut config.service.cleanup.delay_ms, self.cleanup_delay_ms);
        set(&mut config.service.storage.kind, self.storage_kind);
        set(&mut config.service.storage.directory, self.storage_directory);

        let defaults = &mut config.service.defaults;
        set(&mut defaults.full_analysis_markers, self.defaults_full_analysis_markers);
        set(&mut defaults.paragraph_markers, self.defaults_paragraph_markers);
        set(&mut defaults.frame_count, self.defaults_frame_count);
    }
}

/// Applies `ANALYSIS_SERVICE_*` variables on top of `config`.
///
/// `OPENAI_API_KEY` fills the generation key when no prefixed key is set.
pub fn apply_env_overrides<I>(config: &mut AnalysisConfig, vars: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: Vec<(String, String)> = vars.into_iter().collect();
    let openai_key = vars
        .iter()
        .find(|(key, value)| key == "OPENAI_API_KEY" && !value.is_empty())
        .map(|(_, value)| value.clone());

    let mut overrides: EnvOverrides = envy::prefixed(format!("{CONFIG_PREFIX}_"))
        .from_iter(vars)
        .map_err(ConfigError::Env)?;
    if overrides.generation_api_key.as_deref().map_or(true, str::is_empty) {
        overrides.generation_api_key = openai_key;
    }

    overrides.apply(config);
    Ok(())
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_generation_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_generation_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_generation_temperature() -> f32 {
    0.7
}

fn default_generation_max_tokens() -> u32 {
    1_000
}

fn default_generation_timeout_ms() -> u64 {
    60_000
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_capture_output_dir() -> PathBuf {
    PathBuf::from("uploads/images")
}

fn default_capture_public_path() -> String {
    "/uploads/images".to_string()
}

fn default_capture_max_width() -> u32 {
    800
}

fn default_capture_quality() -> u8 {
    2
}

fn default_capture_concurrency() -> usize {
    4
}

fn default_cleanup_delay_ms() -> u64 {
    5_000
}

fn default_storage_directory() -> PathBuf {
    PathBuf::from("data/analysis")
}

fn default_full_analysis_markers() -> u32 {
    8
}

fn default_paragraph_markers() -> u32 {
    5
}

fn default_frame_count() -> u32 {
    10
}
