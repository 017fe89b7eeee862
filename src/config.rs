use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConvertError;

/// Options that shape the generated HTML.
///
/// A `Config` is read-only for the duration of one conversion. Callers may
/// change it between conversions with [`Config::set_option`] or the builder.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Omit the newline that fenced code blocks otherwise emit before `</code>`.
    #[serde(alias = "omit_extra_wl_in_code_blocks", alias = "omitExtraWLInCodeBlocks")]
    pub omit_extra_wl_in_code_blocks: bool,
}

impl Config {
    /// Set an option by name, the way a host environment passes loosely typed
    /// settings. The last write to a key wins.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<(), ConvertError> {
        match key {
            "omitExtraWLInCodeBlocks"
            | "omit_extra_wl_in_code_blocks"
            | "omit-extra-wl-in-code-blocks" => {
                self.omit_extra_wl_in_code_blocks = parse_bool(key, value)?;
                Ok(())
            }
            _ => Err(ConvertError::UnknownOption(key.to_string())),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConvertError> {
    match value.trim() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ConvertError::InvalidOptionValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn omit_extra_wl_in_code_blocks(mut self, omit: bool) -> Self {
        self.config.omit_extra_wl_in_code_blocks = omit;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// File names searched for next to the document and in its parents.
const PROJECT_CONFIG_NAMES: &[&str] = &[".gamut.toml", "gamut.toml"];

fn read_config(path: &Path) -> io::Result<Config> {
    let source = fs::read_to_string(path)?;
    toml::from_str::<Config>(&source).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid config {}: {e}", path.display()),
        )
    })
}

/// Project config files, nearest directory first.
fn project_config_paths(start_dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    start_dir.ancestors().flat_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(move |name| dir.join(name))
    })
}

/// Per-user config files: `$XDG_CONFIG_HOME/gamut/config.toml`, then
/// `~/.config/gamut/config.toml`.
fn user_config_paths() -> Vec<PathBuf> {
    let xdg = env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"));
    xdg.into_iter()
        .chain(home)
        .map(|base| base.join("gamut").join("config.toml"))
        .collect()
}

/// Resolve the configuration for a document converted from `start_dir`.
///
/// An explicit path must exist and parse. Otherwise the first readable file
/// among the project files (walking up from `start_dir`) and then the user
/// files wins; unreadable or invalid discovered files are skipped with a
/// warning. Without any file the defaults apply. Returns the config and the
/// file it came from.
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let config = read_config(path)?;
        log::debug!("Using explicit config {}", path.display());
        return Ok((config, Some(path.to_path_buf())));
    }

    let discovered = project_config_paths(start_dir).chain(user_config_paths());
    for path in discovered.filter(|path| path.is_file()) {
        match read_config(&path) {
            Ok(config) => {
                log::debug!("Discovered config {}", path.display());
                return Ok((config, Some(path)));
            }
            Err(e) => log::warn!("Skipping config {}: {}", path.display(), e),
        }
    }

    log::debug!("No gamut config found, using defaults");
    Ok((Config::default(), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keeps_trailing_newline() {
        assert!(!Config::default().omit_extra_wl_in_code_blocks);
    }

    #[test]
    fn test_toml_accepts_all_spellings() {
        for key in [
            "omit-extra-wl-in-code-blocks",
            "omit_extra_wl_in_code_blocks",
            "omitExtraWLInCodeBlocks",
        ] {
            let cfg: Config = toml::from_str(&format!("{key} = true")).unwrap();
            assert!(cfg.omit_extra_wl_in_code_blocks, "key {key}");
        }
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_set_option_last_write_wins() {
        let mut cfg = Config::default();
        cfg.set_option("omitExtraWLInCodeBlocks", "true").unwrap();
        assert!(cfg.omit_extra_wl_in_code_blocks);
        cfg.set_option("omit_extra_wl_in_code_blocks", "false").unwrap();
        assert!(!cfg.omit_extra_wl_in_code_blocks);
    }

    #[test]
    fn test_set_option_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert_eq!(
            cfg.set_option("tables", "true"),
            Err(ConvertError::UnknownOption("tables".to_string()))
        );
    }

    #[test]
    fn test_set_option_rejects_bad_value() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_option("omitExtraWLInCodeBlocks", "sometimes"),
            Err(ConvertError::InvalidOptionValue { .. })
        ));
    }

    #[test]
    fn test_builder() {
        let cfg = ConfigBuilder::default()
            .omit_extra_wl_in_code_blocks(true)
            .build();
        assert!(cfg.omit_extra_wl_in_code_blocks);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "omitExtraWLInCodeBlocks = true\n").unwrap();

        let (cfg, found) = load(Some(&path), dir.path()).unwrap();
        assert!(cfg.omit_extra_wl_in_code_blocks);
        assert_eq!(found.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_invalid_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "omitExtraWLInCodeBlocks = \"nope\"\n").unwrap();

        let err = load(Some(&path), dir.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_walks_up_and_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs").join("guide");
        fs::create_dir_all(&nested).unwrap();
        let project = dir.path().join("gamut.toml");
        fs::write(&project, "omit-extra-wl-in-code-blocks = true\n").unwrap();
        fs::write(nested.join(".gamut.toml"), "omit-extra-wl-in-code-blocks = 3\n").unwrap();

        let (cfg, found) = load(None, &nested).unwrap();
        assert!(cfg.omit_extra_wl_in_code_blocks);
        assert_eq!(found, Some(project));
    }

    #[test]
    fn test_project_paths_prefer_hidden_name_and_nearest_dir() {
        let paths: Vec<_> = project_config_paths(Path::new("/a/b")).take(4).collect();
        assert_eq!(
            paths,
            [
                PathBuf::from("/a/b/.gamut.toml"),
                PathBuf::from("/a/b/gamut.toml"),
                PathBuf::from("/a/.gamut.toml"),
                PathBuf::from("/a/gamut.toml"),
            ]
        );
    }
}
