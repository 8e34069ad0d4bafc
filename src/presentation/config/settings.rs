use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Set by the hosting platform; switches the record log to its persistent disk.
const PLATFORM_FLAG_VAR: &str = "RENDER";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub transcription: TranscriptionSettings,
    pub storage: StorageSettings,
    pub normalizer: NormalizerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub provider: Provider,
    pub base_url: String,
    pub api_key: String,
    #[serde(default)]
    pub api_version: Option<String>,
    pub chat_model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: Provider,
    #[serde(default)]
    pub base_url: Option<String>,
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub azure_deployment: Option<String>,
    pub azure_api_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub records_path: PathBuf,
    pub platform_records_path: PathBuf,
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizerSettings {
    pub fill_partial_groups: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub enable_json: bool,
}

impl Settings {
    /// Layers built-in defaults, `appsettings.{environment}.toml` (optional)
    /// and `APP__SECTION__KEY` environment variables, in that order.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let file_name = format!("appsettings.{}", environment.as_str());
        let configuration = Self::defaults()?
            .add_source(File::with_name(&file_name).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = configuration.try_deserialize()?;
        settings.apply_openai_key(std::env::var(OPENAI_API_KEY_VAR).ok());
        Ok(settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.max_upload_mb", 25)?
            .set_default("llm.provider", "openai")?
            .set_default("llm.base_url", "https://api.openai.com/v1")?
            .set_default("llm.api_key", "")?
            .set_default("llm.chat_model", "gpt-4")?
            .set_default("llm.max_tokens", 500)?
            .set_default("llm.temperature", 0.1)?
            .set_default("transcription.provider", "openai")?
            .set_default("transcription.api_key", "")?
            .set_default("transcription.model", "whisper-1")?
            .set_default("transcription.azure_api_version", "2024-02-01")?
            .set_default("storage.records_path", "prescriptions_dataset.json")?
            .set_default(
                "storage.platform_records_path",
                "/data/prescriptions_dataset.json",
            )?
            .set_default("normalizer.fill_partial_groups", false)?
            .set_default("logging.enable_json", false)
    }

    /// A single provider key commonly serves both remote services.
    pub fn apply_openai_key(&mut self, key: Option<String>) {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return;
        };
        if self.llm.api_key.is_empty() {
            self.llm.api_key = key.clone();
        }
        if self.transcription.api_key.is_empty() {
            self.transcription.api_key = key;
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb * 1024 * 1024
    }
}

impl StorageSettings {
    pub fn records_path_for(&self, on_platform: bool) -> &Path {
        if on_platform {
            &self.platform_records_path
        } else {
            &self.records_path
        }
    }

    pub fn on_platform() -> bool {
        std::env::var_os(PLATFORM_FLAG_VAR).is_some()
    }
}
