//! # Analyzer Configuration Module
//!
//! Bundles the configuration of every stage the analyzer drives. The pipeline
//! never reads process state itself; the caller builds this value (the binary
//! does so from the environment) and hands it over.

use crate::fetcher::FetcherConfig;
use crate::inference::InferenceConfig;

/// Configuration for a complete analysis
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    /// Page fetch settings
    pub fetcher: FetcherConfig,

    /// Inference settings; without a credential only the rule-based tagger runs
    pub inference: InferenceConfig,
}

/// Builder for AnalyzerConfig
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
        }
    }

    /// Set the fetcher configuration
    pub fn fetcher(mut self, fetcher: FetcherConfig) -> Self {
        self.config.fetcher = fetcher;
        self
    }

    /// Set the inference configuration
    pub fn inference(mut self, inference: InferenceConfig) -> Self {
        self.config.inference = inference;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AnalyzerConfig {
        self.config
    }
}

impl AnalyzerConfig {
    /// Create a new builder
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::new()
    }

    /// Defaults plus the inference credential from the environment
    pub fn from_env() -> Self {
        Self::builder().inference(InferenceConfig::from_env()).build()
    }
}
