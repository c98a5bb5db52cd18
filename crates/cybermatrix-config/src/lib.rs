//! Configuration file loading for cybermatrix.
//!
//! Settings are read from `config.toml` in the platform config directory
//! (for example `~/.config/cybermatrix/config.toml` on Linux). Every key is
//! optional and unknown keys are ignored.

use std::path::{Path, PathBuf};

use cybermatrix_core::PartialSettings;
use directories::ProjectDirs;

/// Result alias carrying [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

const CONFIG_FILE: &str = "config.toml";

/// Default location of the config file, if the platform has one.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cybermatrix").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Parse partial settings from TOML text.
pub fn from_toml(text: &str) -> Result<PartialSettings> {
    Ok(toml::from_str(text)?)
}

/// Read partial settings from `path`.
pub fn load_file(path: &Path) -> Result<PartialSettings> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_toml(&text)
}

/// Load settings from an explicit path, or from the default location.
///
/// A missing file at the default location yields empty settings; a missing
/// explicit path is an error.
pub fn load(explicit: Option<&Path>) -> Result<PartialSettings> {
    if let Some(path) = explicit {
        return load_file(path);
    }
    match default_path() {
        Some(path) if path.exists() => load_file(&path),
        _ => Ok(PartialSettings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml() {
        let partial = from_toml(
            r##"
            particle_distance = 80.0
            show_grid = false
            matrix_chars = ["0", "1"]
            particle_color = "#ff00ff"
            "##,
        )
        .unwrap();
        assert_eq!(partial.particle_distance, Some(80.0));
        assert_eq!(partial.show_grid, Some(false));
        assert_eq!(partial.matrix_chars, Some(vec!['0', '1']));
        assert_eq!(partial.particle_color.as_deref(), Some("#ff00ff"));
        assert_eq!(partial.mouse_radius, None);
    }

    #[test]
    fn test_empty_and_unknown_keys() {
        assert_eq!(from_toml("").unwrap(), PartialSettings::default());
        let partial = from_toml("target = \"body\"\nzoom = 3").unwrap();
        assert_eq!(partial, PartialSettings::default());
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = from_toml("show_grid = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let path = std::env::temp_dir().join("cybermatrix-does-not-exist.toml");
        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("cybermatrix-does-not-exist.toml"));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("cybermatrix-{}.toml", std::process::id()));
        std::fs::write(&path, "grid_size = 25.0\n").unwrap();
        let partial = load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(partial.grid_size, Some(25.0));
    }
}
