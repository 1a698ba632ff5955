use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    /// Load `~/.gsmcheck/config.toml`, writing the defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(&home.join(".gsmcheck"))
    }

    /// Same as [`Config::load_or_init`] with an explicit config directory.
    pub fn load_or_init_in(dir: &Path) -> Result<Self> {
        let config_path = dir.join("config.toml");

        if !dir.exists() {
            fs::create_dir_all(dir).context("Failed to create .gsmcheck directory")?;
        }

        let config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = config_path;
            config
        } else {
            let config = Self {
                config_path,
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_writes_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".gsmcheck");

        let config = Config::load_or_init_in(&dir).unwrap();
        assert!(config.config_path.exists());
        assert_eq!(config.gateway.port, 3000);

        let written = fs::read_to_string(dir.join("config.toml")).unwrap();
        assert!(written.contains("default_provider = \"openai\""));
        assert!(written.contains("[reliability]"));
    }

    #[test]
    fn existing_file_is_loaded() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "default_temperature = 0.3\ndefault_model = \"gpt-4o-mini\"\n\n[gateway]\nport = 8081\n",
        )
        .unwrap();

        let config = Config::load_or_init_in(tmp.path()).unwrap();
        assert_eq!(config.model_name(), "gpt-4o-mini");
        assert_eq!(config.gateway.port, 8081);
        assert!((config.default_temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.config_path, tmp.path().join("config.toml"));
    }

    #[test]
    fn invalid_file_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("config.toml"), "default_temperature = 9.0\n").unwrap();
        let err = Config::load_or_init_in(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("temperature"));

        fs::write(tmp.path().join("config.toml"), "default_temperature = [\n").unwrap();
        let err = Config::load_or_init_in(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
