use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Processor handlers – closed set, resolved while the config is built
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown processor handler '{0}'")]
    UnknownHandler(String),
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The upload handlers an installation can assign. Handler names in config
/// documents resolve against this set exactly once, at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorKind {
    /// Delimited text with auto-detected separator.
    Delimited,
    /// Records-oriented JSON (top-level array of objects).
    Json,
}

impl FromStr for ProcessorKind {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, ConfigError> {
        match name {
            "delimited" | "csv" => Ok(ProcessorKind::Delimited),
            "json" => Ok(ProcessorKind::Json),
            other => Err(ConfigError::UnknownHandler(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder → Config : init → ready → immutable
// ---------------------------------------------------------------------------

/// Collects processor assignments before validation.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigBuilder {
    #[serde(default)]
    processors: Vec<ProcessorEntry>,
}

#[derive(Debug, Deserialize)]
struct ProcessorEntry {
    prefix: String,
    handler: String,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route uploads whose filename starts with `prefix` to the named handler.
    pub fn processor(mut self, prefix: impl Into<String>, handler: impl Into<String>) -> Self {
        self.processors.push(ProcessorEntry {
            prefix: prefix.into(),
            handler: handler.into(),
        });
        self
    }

    /// Resolve every handler name against the closed set and freeze.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut processors = Vec::with_capacity(self.processors.len());
        for entry in self.processors {
            processors.push((entry.prefix, entry.handler.parse()?));
        }
        Ok(Config { processors })
    }
}

/// Immutable runtime configuration, constructed once at startup and handed
/// to consumers explicitly.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Ordered filename-prefix → handler table.
    processors: Vec<(String, ProcessorKind)>,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Build from a JSON document:
    ///
    /// ```json
    /// { "processors": [{ "prefix": "instance", "handler": "delimited" }] }
    /// ```
    pub fn from_json(text: &str) -> Result<Config, ConfigError> {
        let builder: ConfigBuilder = serde_json::from_str(text)?;
        builder.build()
    }

    /// First prefix entry matching the filename, in insertion order.
    pub fn resolve_processor(&self, filename: &str) -> Option<ProcessorKind> {
        self.processors
            .iter()
            .find(|(prefix, _)| filename.starts_with(prefix.as_str()))
            .map(|(_, kind)| *kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_resolves_handler_names() {
        let config = Config::builder()
            .processor("instance", "delimited")
            .processor("execution", "json")
            .build()
            .unwrap();

        assert_eq!(
            config.resolve_processor("instance_routes.csv"),
            Some(ProcessorKind::Delimited)
        );
        assert_eq!(
            config.resolve_processor("execution_42.json"),
            Some(ProcessorKind::Json)
        );
        assert_eq!(config.resolve_processor("solution_1.xml"), None);
    }

    #[test]
    fn test_unknown_handler_fails_at_build_time() {
        let err = Config::builder()
            .processor("instance", "xml")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownHandler(name) if name == "xml"));
    }

    #[test]
    fn test_first_matching_prefix_wins() {
        let config = Config::builder()
            .processor("inst", "json")
            .processor("instance", "delimited")
            .build()
            .unwrap();
        assert_eq!(
            config.resolve_processor("instance_a.csv"),
            Some(ProcessorKind::Json)
        );
    }

    #[test]
    fn test_from_json_document() {
        let config = Config::from_json(
            r#"{ "processors": [{ "prefix": "solution", "handler": "csv" }] }"#,
        )
        .unwrap();
        assert_eq!(
            config.resolve_processor("solution_best.dat"),
            Some(ProcessorKind::Delimited)
        );

        assert!(Config::from_json("{ nope }").is_err());
    }

    #[test]
    fn test_default_config_has_no_prefix_routes() {
        assert_eq!(Config::default().resolve_processor("anything.csv"), None);
    }
}
