use crate::config::Config;
use crate::detection::indicators::IndicatorTables;
use anyhow::Result;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the application config, falling back to defaults when the file
    /// does not exist. A file that exists but fails to parse is an error.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        if path.exists() {
            Config::from_file(path)
        } else {
            log::warn!(
                "Configuration file '{}' not found, using default configuration",
                path.display()
            );
            Ok(Config::default())
        }
    }

    /// Indicator tables named by the config, or the built-in tables.
    pub fn load_indicators(config: &Config) -> Result<IndicatorTables> {
        match &config.indicators_file {
            Some(path) => {
                let tables = IndicatorTables::load_from_file(path)?;
                log::info!(
                    "Loaded indicator tables from {}: {} keywords, {} TLDs, {} urgent phrases, {} personal-info terms, {} disposable domains",
                    path,
                    tables.suspicious_keywords.len(),
                    tables.suspicious_tlds.len(),
                    tables.urgent_phrases.len(),
                    tables.personal_info_terms.len(),
                    tables.disposable_domains.len()
                );
                Ok(tables)
            }
            None => {
                log::debug!("No indicators_file configured, using built-in tables");
                Ok(IndicatorTables::default())
            }
        }
    }
}
