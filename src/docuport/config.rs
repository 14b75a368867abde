use crate::error::{DocuportError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// CLI connection defaults, stored in the user config directory. Credentials
/// themselves never land here; the password or token comes from the
/// environment or a flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DocuportConfig {
    /// Base URL of the repository service.
    #[serde(default)]
    pub server_url: String,

    /// Organization to authenticate against.
    #[serde(default)]
    pub organization: String,

    /// User name for credential login.
    #[serde(default)]
    pub user_name: String,
}

impl DocuportConfig {
    /// Load config from the given directory, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DocuportError::Io)?;
        let config: DocuportConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory.
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(DocuportError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).map_err(DocuportError::Io)?;
        Ok(())
    }
}
