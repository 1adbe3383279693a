//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Prefix of environment variable overrides, e.g.
/// `DRAFTSMITH_EXECUTION__CALL_TIMEOUT_SECS=30`.
pub const ENV_PREFIX: &str = "DRAFTSMITH_";

const PROJECT_FILES: [&str; 2] = ["draftsmith.toml", ".draftsmith.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `DRAFTSMITH_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./draftsmith.toml` or `./.draftsmith.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/draftsmith/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::load_from(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
    }

    fn load_from(
        global: Option<&Path>,
        project: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }
        Self::figment(global, project, explicit)
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project, explicit].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/draftsmith/config.toml` (or the platform
    /// equivalent).
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("draftsmith").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] {}*", ENV_PREFIX);

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./draftsmith.toml or ./.draftsmith.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }

    /// Effective configuration as TOML, with direct API keys redacted
    pub fn render(config: &FileConfig) -> Result<String, toml::ser::Error> {
        let mut shown = config.clone();
        let providers = &mut shown.providers;
        for endpoint in [
            &mut providers.openai,
            &mut providers.anthropic,
            &mut providers.gemini,
            &mut providers.perplexity,
        ] {
            if endpoint.api_key.is_some() {
                endpoint.api_key = Some("<redacted>".to_string());
            }
        }
        toml::to_string_pretty(&shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileOutputFormat;
    use std::io::Write;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.execution.call_timeout_secs, 120);
        assert_eq!(config.output.format, FileOutputFormat::Markdown);
    }

    #[test]
    fn test_render_effective_config() {
        let rendered = ConfigLoader::render(&ConfigLoader::load_defaults()).unwrap();
        assert!(rendered.contains("[execution]"));
        assert!(rendered.contains("call_timeout_secs = 120"));
        assert!(rendered.contains("default_output_weight = 1.0"));

        let mut config = ConfigLoader::load_defaults();
        config.providers.openai.api_key = Some("sk-secret".to_string());
        let rendered = ConfigLoader::render(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("draftsmith"));
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(
            dir.path(),
            "global.toml",
            "[execution]\ncall_timeout_secs = 10\nevent_channel_capacity = 5\n",
        );
        let project = write(dir.path(), "project.toml", "[execution]\ncall_timeout_secs = 20\n");
        let explicit = write(dir.path(), "explicit.toml", "[output]\nformat = \"json\"\n");

        let config =
            ConfigLoader::load_from(Some(&global), Some(&project), Some(&explicit)).unwrap();
        assert_eq!(config.execution.call_timeout_secs, 20);
        assert_eq!(config.execution.event_channel_capacity, 5);
        assert_eq!(config.output.format, FileOutputFormat::Json);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = ConfigLoader::load_from(None, None, Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_tiers_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "tiers.toml",
            "[tiers]\nsearch = [\"pplx-online-mini\"]\n",
        );
        let config = ConfigLoader::load_from(None, None, Some(&path)).unwrap();
        assert_eq!(config.tiers.0["search"], vec!["pplx-online-mini".to_string()]);
    }
}
