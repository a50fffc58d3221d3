use std::fs;
use std::path::PathBuf;

use cross_xdg::BaseDirs;
use serde::Deserialize;

use crate::engine::{DEFAULT_CELLS, DEFAULT_CELL_WIDTH};

/// Tape settings handed to [`Engine::new`](crate::Engine::new).
///
/// The width is kept as raw bytes; the engine validates it so every source
/// (flag, env, file) fails the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub cells: u32,
    pub cell_width: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cells: DEFAULT_CELLS,
            cell_width: DEFAULT_CELL_WIDTH,
        }
    }
}

/// Contents of `bf.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub engine: EngineSection,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct EngineSection {
    pub cells: Option<u32>,
    pub cell_width: Option<u32>,
}

/// Values given on the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub cells: Option<u32>,
    pub cell_width: Option<u32>,
}

pub fn parse_file_config(content: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Location of `bf.toml` in the XDG config home.
pub fn config_path() -> Option<PathBuf> {
    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

/// Load `bf.toml`. A missing file is silent; a broken one is logged and skipped.
pub fn load_file_config() -> FileConfig {
    let Some(path) = config_path() else {
        return FileConfig::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return FileConfig::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
            return FileConfig::default();
        }
    };
    match parse_file_config(&content) {
        Ok(cfg) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            cfg
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            FileConfig::default()
        }
    }
}

/// Resolve each field: flags -> env -> config file -> defaults.
///
/// `env` looks up a variable by name; values that do not parse are ignored.
pub fn resolve<E>(overrides: Overrides, env: E, file: &FileConfig) -> EngineConfig
where
    E: Fn(&str) -> Option<String>,
{
    let from_env = |key: &str| env(key).and_then(|s| s.trim().parse::<u32>().ok());
    let defaults = EngineConfig::default();

    EngineConfig {
        cells: overrides
            .cells
            .or_else(|| from_env("BF_CELLS"))
            .or(file.engine.cells)
            .unwrap_or(defaults.cells),
        cell_width: overrides
            .cell_width
            .or_else(|| from_env("BF_CELL_WIDTH"))
            .or(file.engine.cell_width)
            .unwrap_or(defaults.cell_width),
    }
}

/// [`resolve`] against the process environment and the user's `bf.toml`.
pub fn load(overrides: Overrides) -> EngineConfig {
    let file = load_file_config();
    resolve(overrides, |key| std::env::var(key).ok(), &file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_engine_section() {
        let cfg = parse_file_config("[engine]\ncells = 300\ncell_width = 4\n").unwrap();
        assert_eq!(cfg.engine.cells, Some(300));
        assert_eq!(cfg.engine.cell_width, Some(4));
    }

    #[test]
    fn empty_file_and_unrelated_sections_parse_to_defaults() {
        assert_eq!(parse_file_config("").unwrap(), FileConfig::default());
        let cfg = parse_file_config("[colors]\nstatus_text = \"red\"\n").unwrap();
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse_file_config("[engine]\ncells = \"many\"\n").is_err());
        assert!(parse_file_config("[engine\n").is_err());
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = resolve(Overrides::default(), env_of(&[]), &FileConfig::default());
        assert_eq!(cfg, EngineConfig { cells: 65536, cell_width: 1 });
    }

    #[test]
    fn file_beats_defaults_env_beats_file_flags_beat_env() {
        let file = parse_file_config("[engine]\ncells = 10\ncell_width = 2\n").unwrap();
        let cfg = resolve(Overrides::default(), env_of(&[]), &file);
        assert_eq!(cfg, EngineConfig { cells: 10, cell_width: 2 });

        let env = env_of(&[("BF_CELLS", "20"), ("BF_CELL_WIDTH", "4")]);
        let cfg = resolve(Overrides::default(), &env, &file);
        assert_eq!(cfg, EngineConfig { cells: 20, cell_width: 4 });

        let flags = Overrides { cells: Some(30), cell_width: Some(8) };
        let cfg = resolve(flags, &env, &file);
        assert_eq!(cfg, EngineConfig { cells: 30, cell_width: 8 });
    }

    #[test]
    fn unparsable_env_values_fall_through() {
        let file = parse_file_config("[engine]\ncells = 10\n").unwrap();
        let env = env_of(&[("BF_CELLS", "lots"), ("BF_CELL_WIDTH", "-1")]);
        let cfg = resolve(Overrides::default(), env, &file);
        assert_eq!(cfg, EngineConfig { cells: 10, cell_width: 1 });
    }

    #[test]
    fn invalid_width_is_passed_through_for_the_engine_to_reject() {
        let flags = Overrides { cells: None, cell_width: Some(3) };
        let cfg = resolve(flags, env_of(&[]), &FileConfig::default());
        assert_eq!(cfg.cell_width, 3);
    }
}
