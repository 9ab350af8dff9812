//! INI file configuration adapter.
//!
//! Keys are case sensitive so `[feeds]` can carry upper-case symbols.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new_cs();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new_cs();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn section_entries(&self, section: &str) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .config
            .get_map_ref()
            .get(section)
            .map(|keys| {
                keys.iter()
                    .map(|(k, v)| (k.clone(), v.clone().unwrap_or_default()))
                    .collect()
            })
            .unwrap_or_default();
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[ledger]
owner_account = treasury
admin_account = admin
fee_bps = 10

[feeds]
AU = xau-usd
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("ledger", "owner_account"),
            Some("treasury".to_string())
        );
        assert_eq!(adapter.get_string("feeds", "AU"), Some("xau-usd".to_string()));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let adapter = FileConfigAdapter::from_string("[feeds]\nAU = xau\n").unwrap();
        assert_eq!(adapter.get_string("feeds", "au"), None);
        assert!(adapter.get_string("feeds", "AU").is_some());
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[ledger]\nfee_bps = 10\n").unwrap();
        assert_eq!(adapter.get_string("ledger", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn section_entries_sorted() {
        let adapter =
            FileConfigAdapter::from_string("[feeds]\nPT = xpt\nAU = xau\nAG = xag\n").unwrap();
        let entries = adapter.section_entries("feeds");
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["AG", "AU", "PT"]);
        assert!(adapter.section_entries("missing").is_empty());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[ledger]\nadmin_account = admin\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("ledger", "admin_account"),
            Some("admin".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/ledger.ini");
        assert!(result.is_err());
    }
}
