//! Configuration file parsing for `routegraph.toml`.
//!
//! Searches current directory then ancestors, falling back to
//! `~/.config/routegraph/routegraph.toml` if no project-level file is found.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use routegraph_core::loader::DEFAULT_EXTENSION;
use routegraph_core::Weighting;

pub const CONFIG_FILE: &str = "routegraph.toml";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RoutegraphConfig {
    #[serde(default)]
    pub sources: SourceSection,
    #[serde(default)]
    pub loader: LoaderSection,
    #[serde(default)]
    pub query: QuerySection,
}

/// Default description files, relative to the config file's directory.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SourceSection {
    pub times: Option<PathBuf>,
    pub costs: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoaderSection {
    /// Accepted description file extensions, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![DEFAULT_EXTENSION.to_string()]
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct QuerySection {
    /// Graph used when a command is not given `--by`.
    #[serde(default)]
    pub default_weighting: Weighting,
}

impl RoutegraphConfig {
    /// Find `routegraph.toml` (current dir, then parents, then the global
    /// location) and return it with the path it was read from.
    ///
    /// `Ok(None)` when no file exists; a file that exists but cannot be read
    /// or parsed is an error.
    pub fn load_with_path() -> Result<Option<(PathBuf, Self)>, String> {
        let cwd = std::env::current_dir().map_err(|e| format!("cannot read current directory: {}", e))?;
        Self::find_and_load(&cwd, dirs_or_home().as_deref())
    }

    /// Load config from a specific file path. Relative source paths are
    /// resolved against the file's directory.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
        let cfg: Self = toml::from_str(&content)
            .map_err(|e| format!("invalid toml in '{}': {}", path.display(), e))?;
        Ok(cfg.relative_to(path.parent().unwrap_or_else(|| Path::new("."))))
    }

    fn find_and_load(start: &Path, home: Option<&Path>) -> Result<Option<(PathBuf, Self)>, String> {
        let project = start.ancestors().map(|dir| dir.join(CONFIG_FILE));
        let global = home.map(|h| h.join(".config").join("routegraph").join(CONFIG_FILE));
        for config_path in project.chain(global) {
            if config_path.exists() {
                let cfg = Self::load_from(&config_path)?;
                return Ok(Some((config_path, cfg)));
            }
        }
        Ok(None)
    }

    /// Parse a TOML string directly.
    pub fn from_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    fn relative_to(mut self, base: &Path) -> Self {
        for slot in [&mut self.sources.times, &mut self.sources.costs] {
            if let Some(p) = slot.as_mut() {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
        self
    }

    /// Generate a default `routegraph.toml` template.
    pub fn default_template() -> &'static str {
        r#"# Routegraph configuration

# Route descriptions loaded when --times / --costs are not given.
[sources]
# times = "data/airportsTime.gv"
# costs = "data/airports.gv"

[loader]
extensions = ["gv"]

[query]
# "time" or "cost"
default_weighting = "time"
"#
    }
}

fn dirs_or_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_returns_default() {
        let cfg = RoutegraphConfig::from_str("").expect("empty toml is valid");
        assert!(cfg.sources.times.is_none());
        assert!(cfg.sources.costs.is_none());
        assert_eq!(cfg.loader.extensions, vec!["gv"]);
        assert_eq!(cfg.query.default_weighting, Weighting::Time);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[sources]
times = "data/airportsTime.gv"
costs = "/srv/routes/airports.gv"

[loader]
extensions = ["gv", "dot"]

[query]
default_weighting = "cost"
"#;
        let cfg = RoutegraphConfig::from_str(toml_str).expect("should parse");
        assert_eq!(cfg.sources.times, Some(PathBuf::from("data/airportsTime.gv")));
        assert_eq!(cfg.loader.extensions, vec!["gv", "dot"]);
        assert_eq!(cfg.query.default_weighting, Weighting::Cost);
    }

    #[test]
    fn empty_loader_section_keeps_default_extension() {
        let cfg = RoutegraphConfig::from_str("[loader]\n").expect("should parse");
        assert_eq!(cfg.loader.extensions, vec!["gv"]);
    }

    #[test]
    fn unknown_weighting_is_rejected() {
        let result = RoutegraphConfig::from_str("[query]\ndefault_weighting = \"distance\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_toml_returns_error() {
        assert!(RoutegraphConfig::from_str("[broken").is_err());
    }

    #[test]
    fn default_template_round_trips() {
        let result = RoutegraphConfig::from_str(RoutegraphConfig::default_template());
        assert!(result.is_ok(), "default template must be valid toml");
    }

    #[test]
    fn relative_sources_resolve_against_config_dir() {
        let toml_str = r#"
[sources]
times = "data/airportsTime.gv"
costs = "/srv/routes/airports.gv"
"#;
        let cfg = RoutegraphConfig::from_str(toml_str)
            .unwrap()
            .relative_to(Path::new("/home/ops/project"));
        assert_eq!(
            cfg.sources.times,
            Some(PathBuf::from("/home/ops/project/data/airportsTime.gv"))
        );
        assert_eq!(cfg.sources.costs, Some(PathBuf::from("/srv/routes/airports.gv")));
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join(format!("routegraph-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, "[sources]\ntimes = \"t.gv\"\n").unwrap();
        let cfg = RoutegraphConfig::load_from(&path).expect("should load");
        assert_eq!(cfg.sources.times, Some(dir.join("t.gv")));

        let missing = RoutegraphConfig::load_from(&dir.join("nope.toml"));
        assert!(missing.unwrap_err().contains("cannot read"));
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("routegraph-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn discovery_reports_invalid_config() {
        let dir = scratch_dir("invalid-config");
        std::fs::write(dir.join(CONFIG_FILE), "[query]\ndefault_weighting = \"distance\"\n").unwrap();
        let nested = dir.join("nested");
        std::fs::create_dir_all(&nested).unwrap();

        let err = RoutegraphConfig::find_and_load(&nested, None).unwrap_err();
        assert!(err.contains("invalid toml"), "{}", err);
    }

    #[test]
    fn discovery_walks_up_then_falls_back_to_home() {
        let dir = scratch_dir("discovery");
        let project = dir.join("project");
        let nested = project.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        let home = dir.join("home");
        let global_dir = home.join(".config").join("routegraph");
        std::fs::create_dir_all(&global_dir).unwrap();
        std::fs::write(global_dir.join(CONFIG_FILE), "[query]\ndefault_weighting = \"cost\"\n").unwrap();

        let (path, cfg) = RoutegraphConfig::find_and_load(&nested, Some(&home))
            .unwrap()
            .expect("global config");
        assert_eq!(path, global_dir.join(CONFIG_FILE));
        assert_eq!(cfg.query.default_weighting, Weighting::Cost);

        std::fs::write(project.join(CONFIG_FILE), "[loader]\nextensions = [\"dot\"]\n").unwrap();
        let (path, cfg) = RoutegraphConfig::find_and_load(&nested, Some(&home))
            .unwrap()
            .expect("project config");
        assert_eq!(path, project.join(CONFIG_FILE));
        assert_eq!(cfg.loader.extensions, vec!["dot"]);

        let empty = dir.join("empty");
        std::fs::create_dir_all(&empty).unwrap();
        assert!(RoutegraphConfig::find_and_load(&empty, None).unwrap().is_none());
    }
}
