//! Configuration file loading for mdfix.
//!
//! Discovers and loads `mdfix.toml` from the working directory and merges it with
//! CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

use mdfix_engine::RunOptions;
use mdfix_rules::{BulletMarker, DEFAULT_MAX_PASSES, EmphasisStyle, StyleConfig};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "mdfix.toml";

/// Top-level configuration from mdfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MdfixConfig {
    /// Canonical style knobs (bullet marker, emphasis delimiter, ...).
    pub style: StyleConfig,

    /// What the walker visits.
    pub corpus: CorpusConfig,

    /// Run behavior.
    pub run: RunConfig,
}

/// Corpus section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// File extensions treated as Markdown. Defaults to `["md"]`.
    pub extensions: Option<Vec<String>>,

    /// Directory names pruned during traversal. Defaults to
    /// `.git`, `node_modules`, `target`, `vendor`.
    pub exclude: Option<Vec<String>>,
}

/// Run section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Bound on normalization passes per file.
    pub max_passes: Option<usize>,
}

/// Discover the mdfix.toml config file in `root`.
///
/// Returns `None` if no config file is found.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a mdfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<MdfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<MdfixConfig> {
    let config: MdfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `root`, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<MdfixConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(MdfixConfig::default()),
    }
}

/// CLI-side overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bullet: Option<BulletMarker>,
    pub emphasis: Option<EmphasisStyle>,
    pub max_passes: Option<usize>,
    /// Replaces the configured extension set when non-empty.
    pub extensions: Vec<String>,
    /// Replaces the configured exclude set when non-empty.
    pub exclude: Vec<String>,
    pub dry_run: bool,
    pub emit_diff: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: MdfixConfig,
}

impl ConfigMerger {
    pub fn new(config: MdfixConfig) -> Self {
        Self { config }
    }

    /// Fold CLI overrides into the file config, CLI winning on conflicts.
    pub fn merge(self, cli: CliOverrides) -> RunOptions {
        let defaults = RunOptions::default();
        let mut style = self.config.style;
        if let Some(bullet) = cli.bullet {
            style.bullet = bullet;
        }
        if let Some(emphasis) = cli.emphasis {
            style.emphasis = emphasis;
        }

        let extensions = if !cli.extensions.is_empty() {
            cli.extensions
        } else {
            self.config
                .corpus
                .extensions
                .unwrap_or(defaults.extensions)
        };
        let exclude = if !cli.exclude.is_empty() {
            cli.exclude
        } else {
            self.config.corpus.exclude.unwrap_or(defaults.exclude)
        };
        let max_passes = cli
            .max_passes
            .or(self.config.run.max_passes)
            .unwrap_or(DEFAULT_MAX_PASSES);

        RunOptions {
            style,
            max_passes,
            dry_run: cli.dry_run,
            emit_diff: cli.emit_diff,
            extensions,
            exclude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_parses_to_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.style.bullet, BulletMarker::Dash);
        assert!(config.corpus.extensions.is_none());
        assert!(config.run.max_passes.is_none());
    }

    #[test]
    fn full_config_parses() {
        let config = parse_config(
            r#"
[style]
bullet = "asterisk"
emphasis = "underscore"

[corpus]
extensions = ["md", "markdown"]
exclude = ["_build"]

[run]
max_passes = 5
"#,
        )
        .unwrap();
        assert_eq!(config.style.bullet, BulletMarker::Asterisk);
        assert_eq!(config.style.emphasis, EmphasisStyle::Underscore);
        assert_eq!(
            config.corpus.extensions.as_deref(),
            Some(["md".to_string(), "markdown".to_string()].as_slice())
        );
        assert_eq!(config.run.max_passes, Some(5));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(parse_config("[style\nbullet = ").is_err());
    }

    #[test]
    fn unknown_bullet_value_is_an_error() {
        assert!(parse_config("[style]\nbullet = \"dot\"\n").is_err());
    }

    #[test]
    fn cli_overrides_win_over_file_values() {
        let config = parse_config("[style]\nbullet = \"plus\"\n\n[run]\nmax_passes = 7\n").unwrap();
        let options = ConfigMerger::new(config).merge(CliOverrides {
            bullet: Some(BulletMarker::Dash),
            max_passes: Some(2),
            ..CliOverrides::default()
        });
        assert_eq!(options.style.bullet, BulletMarker::Dash);
        assert_eq!(options.max_passes, 2);
    }

    #[test]
    fn file_values_used_when_cli_is_silent() {
        let config = parse_config("[corpus]\nexclude = [\"_site\"]\n").unwrap();
        let options = ConfigMerger::new(config).merge(CliOverrides::default());
        assert_eq!(options.exclude, ["_site".to_string()]);
        assert_eq!(options.max_passes, DEFAULT_MAX_PASSES);
    }
}
