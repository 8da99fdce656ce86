//! Run configuration.
//!
//! Values are resolved in order: CLI arguments, `gif2video.toml`, built-in
//! defaults. The config file is optional and flat:
//!
//! ```toml
//! input = "index.html"
//! output = "index.html.new"
//! default_loading = "lazy"
//! ```
//!
//! | Key               | Default        |
//! |-------------------|----------------|
//! | `input`           | `index.html`   |
//! | `output`          | `<input>.new`  |
//! | `default_loading` | `lazy`         |

mod error;

pub use error::ConfigError;

use crate::{cli::Cli, debug, log, rewrite::DEFAULT_LOADING};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// HTML file read when no input is given.
pub const DEFAULT_INPUT: &str = "index.html";

/// Appended to the input path to form the default output path.
pub const OUTPUT_SUFFIX: &str = ".new";

/// Config file picked up from the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "gif2video.toml";

// ============================================================================
// config file
// ============================================================================

/// Contents of `gif2video.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub default_loading: Option<String>,
}

impl FileConfig {
    /// Parse TOML content, collecting any unknown keys.
    pub fn parse(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Load from a file, warning about unknown keys.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse(&content)?;
        for field in &ignored {
            log!("config"; "ignoring unknown field `{}` in {}", field, path.display());
        }

        Ok(config)
    }
}

// ============================================================================
// resolved configuration
// ============================================================================

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTML file to read
    pub input: PathBuf,
    /// File the rewritten HTML is written to; never equal to `input`
    pub output: PathBuf,
    /// `loading`/`preload` value for images without a `loading` attribute
    pub default_loading: String,
}

impl Default for Config {
    fn default() -> Self {
        let input = PathBuf::from(DEFAULT_INPUT);
        Self {
            output: default_output(&input),
            input,
            default_loading: DEFAULT_LOADING.to_string(),
        }
    }
}

impl Config {
    /// Resolve configuration from CLI arguments and the optional config file.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => Some(path.as_path()),
            None => Some(Path::new(CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let file_config = match file {
            Some(path) => {
                if cli.config.is_none() {
                    log!("config"; "using {}", path.display());
                } else {
                    debug!("config"; "loading {}", path.display());
                }
                FileConfig::from_path(path)
                    .with_context(|| format!("failed to load config `{}`", path.display()))?
            }
            None => FileConfig::default(),
        };

        let config = Self::from_parts(cli, file_config);
        config.validate()?;

        debug!(
            "config";
            "input={} output={} default_loading={}",
            config.input.display(),
            config.output.display(),
            config.default_loading
        );
        Ok(config)
    }

    /// Merge CLI arguments over file values over defaults.
    fn from_parts(cli: &Cli, file: FileConfig) -> Self {
        let input = cli
            .input
            .clone()
            .or(file.input)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
        let output = cli
            .output
            .clone()
            .or(file.output)
            .unwrap_or_else(|| default_output(&input));
        let default_loading = cli
            .default_loading
            .clone()
            .or(file.default_loading)
            .unwrap_or_else(|| DEFAULT_LOADING.to_string());

        Self {
            input,
            output,
            default_loading,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_loading.is_empty() {
            return Err(ConfigError::Validation(
                "default_loading must not be empty".into(),
            ));
        }
        if self.default_loading.contains('"') {
            return Err(ConfigError::Validation(format!(
                "default_loading `{}` must not contain `\"`",
                self.default_loading
            )));
        }
        if same_file(&self.input, &self.output) {
            return Err(ConfigError::Validation(format!(
                "output `{}` would overwrite the input file",
                self.output.display()
            )));
        }
        Ok(())
    }
}

/// Whether `a` and `b` name the same file.
///
/// Existing paths are compared after resolving symlinks and `.`/`..`. A path
/// that does not exist yet is resolved through its parent directory.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(path) = path.canonicalize() {
        return Some(path);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|dir| dir.join(name))
}

/// `<input>.new`
pub fn default_output(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gif2video").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_parts(&cli(&[]), FileConfig::default());
        assert_eq!(config, Config::default());
        assert_eq!(config.input, PathBuf::from("index.html"));
        assert_eq!(config.output, PathBuf::from("index.html.new"));
        assert_eq!(config.default_loading, "lazy");
    }

    #[test]
    fn test_output_follows_input() {
        let config = Config::from_parts(&cli(&["site/page.html"]), FileConfig::default());
        assert_eq!(config.output, PathBuf::from("site/page.html.new"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            input: Some("a.html".into()),
            output: Some("b.html".into()),
            default_loading: Some("eager".into()),
        };
        let config = Config::from_parts(&cli(&["c.html", "-l", "auto"]), file);
        assert_eq!(config.input, PathBuf::from("c.html"));
        assert_eq!(config.output, PathBuf::from("b.html"));
        assert_eq!(config.default_loading, "auto");
    }

    #[test]
    fn test_parse_file_config() {
        let (config, ignored) = FileConfig::parse(
            r#"
            input = "docs/index.html"
            default_loading = "eager"
            "#,
        )
        .unwrap();
        assert_eq!(config.input, Some(PathBuf::from("docs/index.html")));
        assert_eq!(config.output, None);
        assert_eq!(config.default_loading.as_deref(), Some("eager"));
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_parse_collects_unknown_fields() {
        let (_, ignored) = FileConfig::parse("inptu = \"x.html\"\n").unwrap();
        assert_eq!(ignored, vec!["inptu".to_string()]);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = FileConfig::parse("input = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_path_missing() {
        let dir = TempDir::new().unwrap();
        let err = FileConfig::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_load_explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "output = \"out.html\"\ndefault_loading = \"eager\"\n").unwrap();

        let config = Config::load(&cli(&["-C", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.input, PathBuf::from("index.html"));
        assert_eq!(config.output, PathBuf::from("out.html"));
        assert_eq!(config.default_loading, "eager");
    }

    #[test]
    fn test_load_missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(Config::load(&cli(&["-C", path.to_str().unwrap()])).is_err());
    }

    #[test]
    fn test_validate_rejects_overwrite() {
        let config = Config::from_parts(&cli(&["a.html", "-o", "a.html"]), FileConfig::default());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_same_file_through_aliases() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<p></p>").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        assert!(same_file(&page, &dir.path().join(".").join("page.html")));
        assert!(same_file(&page, &dir.path().join("sub").join("..").join("page.html")));
        assert!(!same_file(&page, &dir.path().join("page.html.new")));
        assert!(!same_file(&page, &dir.path().join("sub").join("page.html")));
    }

    #[cfg(unix)]
    #[test]
    fn test_same_file_through_symlink() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.html");
        let link = dir.path().join("link.html");
        fs::write(&page, "<p></p>").unwrap();
        std::os::unix::fs::symlink(&page, &link).unwrap();

        assert!(same_file(&page, &link));
    }

    #[test]
    fn test_validate_rejects_aliased_overwrite() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<p></p>").unwrap();

        let config = Config {
            output: dir.path().join(".").join("page.html"),
            input: page,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_loading() {
        for value in ["", "la\"zy"] {
            let config = Config {
                default_loading: value.to_string(),
                ..Config::default()
            };
            assert!(config.validate().is_err(), "{value:?}");
        }
    }
}
