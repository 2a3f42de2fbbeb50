//! Configuration management for the Mini RAG assistant.
//!
//! This module handles loading and merging configuration from multiple sources,
//! lowest precedence first:
//! - Built-in defaults
//! - Config file (`.minirag/config.yaml` or an explicit path)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration is workspace-centric: the document folder is resolved
//! relative to the workspace unless given as an absolute path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;

/// Retrieval strategies understood by the query pipeline.
pub const KNOWN_STRATEGIES: [&str; 3] = ["lexical", "embedding", "hybrid"];

/// Answer generators understood by the query pipeline.
pub const KNOWN_ANSWER_PROVIDERS: [&str; 2] = ["ollama", "extractive"];

/// Embedding providers understood by the embedding ranker.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["trigram", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains `.minirag/` and usually `data/`)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Document folder, relative to the workspace unless absolute
    pub data_dir: PathBuf,

    /// Log level override
    pub log_level: Option<String>,

    /// Log line format
    pub log_format: String,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    pub server: ServerConfig,

    pub retrieval: RetrievalConfig,

    pub answer: AnswerConfig,

    pub ui: UiConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Number of queries allowed to run against the retriever at once
    pub max_concurrent_queries: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_concurrent_queries: 1,
        }
    }
}

/// Chunking and ranking settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    /// "lexical", "embedding" or "hybrid"
    pub strategy: String,

    /// Maximum number of chunks returned per query
    pub top_k: usize,

    /// Chunk window in characters
    pub chunk_size: usize,

    /// Overlap between consecutive windows in characters
    pub chunk_overlap: usize,

    /// Chunks scoring below this are never returned
    pub min_score: f32,

    /// Lexical share of the hybrid score (0.0 - 1.0)
    pub hybrid_weight: f32,

    pub embedding: EmbeddingSettings,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            strategy: "hybrid".to_string(),
            top_k: 3,
            chunk_size: 500,
            chunk_overlap: 50,
            min_score: 0.05,
            hybrid_weight: 0.6,
            embedding: EmbeddingSettings::default(),
        }
    }
}

/// Embedding provider settings for the embedding and hybrid strategies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// "trigram" (local, offline) or "ollama"
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
        }
    }
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnswerConfig {
    /// "ollama" (LLM synthesis) or "extractive" (sentence selection)
    pub provider: String,
    pub endpoint: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// HTTP timeout for a single completion
    pub timeout_secs: u64,
    /// Answer extractively when the LLM call fails
    pub fallback_to_extractive: bool,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(), // Local-first default
            endpoint: None,
            model: "llama3.2".to_string(),
            temperature: 0.3,
            max_tokens: 1000,
            timeout_secs: 120,
            fallback_to_extractive: true,
        }
    }
}

/// Page text and rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub subtitle: String,
    pub placeholder: String,
    /// Render the answer as raw HTML instead of escaped text
    pub raw_answer_markup: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Mini RAG \u{2013} Construction QA Assistant".to_string(),
            subtitle: "Ask any question based on the internal construction policy documents."
                .to_string(),
            placeholder: "e.g., What factors affect construction delays?".to_string(),
            raw_answer_markup: false,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    workspace: Option<WorkspaceConfig>,
    data_dir: Option<String>,
    server: Option<ServerConfig>,
    retrieval: Option<RetrievalConfig>,
    answer: Option<AnswerConfig>,
    ui: Option<UiConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    format: Option<String>,
    color: Option<bool>,
}

/// Command-line overrides, applied last.
///
/// Workspace and config file are not here: they select the YAML file and go
/// through [`AppConfig::load_from`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub strategy: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            data_dir: PathBuf::from("data"),
            log_level: None,
            log_format: "text".to_string(),
            verbose: false,
            no_color: false,
            server: ServerConfig::default(),
            retrieval: RetrievalConfig::default(),
            answer: AnswerConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and environment variables.
    ///
    /// Environment variables:
    /// - `MINIRAG_WORKSPACE`: Override workspace path
    /// - `MINIRAG_CONFIG`: Path to config file
    /// - `MINIRAG_DATA_DIR`: Document folder
    /// - `MINIRAG_HOST` / `MINIRAG_PORT`: Server bind address
    /// - `MINIRAG_STRATEGY`: Retrieval strategy
    /// - `MINIRAG_PROVIDER` / `MINIRAG_MODEL`: Answer generator and model
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use minirag_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Documents: {:?}", config.data_path());
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration for an explicit workspace and/or config file.
    ///
    /// Paths given here win over `MINIRAG_WORKSPACE` and `MINIRAG_CONFIG`,
    /// and decide which YAML file is merged.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        Self::load_from_with(workspace, config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration using `env` to look up variables.
    pub fn load_with<F>(env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load_from_with(None, None, env)
    }

    fn load_from_with<F>(
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        env: F,
    ) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| env("MINIRAG_WORKSPACE").map(PathBuf::from)) {
            config.workspace = workspace;
        }

        config.config_file = config_file.or_else(|| env("MINIRAG_CONFIG").map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.config_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        config.apply_env(env);

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(data_dir) = env("MINIRAG_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Some(host) = env("MINIRAG_HOST") {
            self.server.host = host;
        }

        if let Some(port) = env("MINIRAG_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid MINIRAG_PORT value: {}", port),
            }
        }

        if let Some(strategy) = env("MINIRAG_STRATEGY") {
            self.retrieval.strategy = strategy;
        }

        if let Some(provider) = env("MINIRAG_PROVIDER") {
            self.answer.provider = provider;
        }

        if let Some(model) = env("MINIRAG_MODEL") {
            self.answer.model = model;
        }

        if let Some(level) = env("RUST_LOG") {
            self.log_level = Some(level);
        }

        if env("NO_COLOR").is_some() {
            self.no_color = true;
        }
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        // An empty file deserializes to null
        let config_file: ConfigFile = serde_yaml::from_str::<Option<ConfigFile>>(contents)?
            .unwrap_or_default();

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(data_dir) = config_file.data_dir {
            result.data_dir = PathBuf::from(data_dir);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(server) = config_file.server {
            result.server = server;
        }
        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }
        if let Some(answer) = config_file.answer {
            result.answer = answer;
        }
        if let Some(ui) = config_file.ui {
            result.ui = ui;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags take precedence over the config file and environment variables.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = data_dir;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        if let Some(host) = overrides.host {
            self.server.host = host;
        }

        if let Some(port) = overrides.port {
            self.server.port = port;
        }

        if let Some(strategy) = overrides.strategy {
            self.retrieval.strategy = strategy;
        }

        if let Some(provider) = overrides.provider {
            self.answer.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.answer.model = model;
        }

        self
    }

    /// Get the path to the `.minirag` directory.
    pub fn config_dir(&self) -> PathBuf {
        self.workspace.join(".minirag")
    }

    /// Resolve the document folder against the workspace.
    pub fn data_path(&self) -> PathBuf {
        if self.data_dir.is_absolute() {
            self.data_dir.clone()
        } else {
            self.workspace.join(&self.data_dir)
        }
    }

    /// Parsed log line format.
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.log_format).unwrap_or_default()
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> AppResult<()> {
        let retrieval = &self.retrieval;

        if !KNOWN_STRATEGIES.contains(&retrieval.strategy.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown retrieval strategy: {}. Supported: {}",
                retrieval.strategy,
                KNOWN_STRATEGIES.join(", ")
            )));
        }

        if !KNOWN_ANSWER_PROVIDERS.contains(&self.answer.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown answer provider: {}. Supported: {}",
                self.answer.provider,
                KNOWN_ANSWER_PROVIDERS.join(", ")
            )));
        }

        if retrieval.strategy != "lexical"
            && !KNOWN_EMBEDDING_PROVIDERS.contains(&retrieval.embedding.provider.as_str())
        {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                retrieval.embedding.provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if retrieval.top_k == 0 {
            return Err(AppError::Config("retrieval.top_k must be at least 1".to_string()));
        }

        if retrieval.chunk_size == 0 || retrieval.chunk_overlap >= retrieval.chunk_size {
            return Err(AppError::Config(format!(
                "retrieval.chunk_overlap ({}) must be smaller than a non-zero chunk_size ({})",
                retrieval.chunk_overlap, retrieval.chunk_size
            )));
        }

        if !(0.0..=1.0).contains(&retrieval.hybrid_weight) {
            return Err(AppError::Config(format!(
                "retrieval.hybrid_weight must be within 0.0-1.0, got {}",
                retrieval.hybrid_weight
            )));
        }

        if !(0.0..=1.0).contains(&retrieval.min_score) {
            return Err(AppError::Config(format!(
                "retrieval.min_score must be within 0.0-1.0, got {}",
                retrieval.min_score
            )));
        }

        if retrieval.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "retrieval.embedding.dimensions must be at least 1".to_string(),
            ));
        }

        if self.server.max_concurrent_queries == 0 {
            return Err(AppError::Config(
                "server.max_concurrent_queries must be at least 1".to_string(),
            ));
        }

        if LogFormat::parse(&self.log_format).is_none() {
            return Err(AppError::Config(format!(
                "Unknown log format: {}. Supported: text, json",
                self.log_format
            )));
        }

        Ok(())
    }
}
