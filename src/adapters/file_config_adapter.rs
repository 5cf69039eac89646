//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// No sections at all; every lookup comes back absent.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn present(&self, section: &str, key: &str) -> bool {
        self.config
            .get(section, key)
            .is_some_and(|v| !v.trim().is_empty())
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_uint(&self, section: &str, key: &str) -> Result<Option<u64>, String> {
        if !self.present(section, key) {
            return Ok(None);
        }
        self.config.getuint(section, key)
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, String> {
        if !self.present(section, key) {
            return Ok(None);
        }
        self.config.getboolcoerce(section, key)
    }

    fn sections(&self) -> Vec<String> {
        self.config.sections()
    }
}
