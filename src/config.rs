//! Club configuration loaded from TOML.
//!
//! ```toml
//! verein_name = "TSV Musterstadt e.V."
//! verein_iban = "DE89370400440532013000"
//! verein_bic = "COBADEFFXXX"
//! verein_creditor_id = "DE98ZZZ09999999999"
//! sepa_description = "Mitgliedsbeitrag"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Description, EinzugError, MonthNames, OrganizationProfile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VereinConfig {
    pub verein_name: String,
    pub verein_iban: String,
    pub verein_bic: String,
    pub verein_creditor_id: String,
    /// Phrase placed before month and year in the remittance text.
    pub sepa_description: String,
    /// Optional replacement for the German month names (12 entries).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monatsnamen: Option<Vec<String>>,
}

impl VereinConfig {
    /// Load and check a config file.
    pub fn load(path: &Path) -> Result<Self, EinzugError> {
        if !path.is_file() {
            return Err(EinzugError::MissingConfigFile(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, EinzugError> {
        let config: Self =
            toml::from_str(text).map_err(|e| EinzugError::Config(e.message().to_string()))?;
        config.month_names()?;
        Ok(config)
    }

    pub fn profile(&self) -> OrganizationProfile {
        OrganizationProfile::new(
            self.verein_name.clone(),
            &self.verein_iban,
            &self.verein_bic,
            &self.verein_creditor_id,
        )
    }

    pub fn description(&self) -> Result<Description, EinzugError> {
        Ok(Description::new(self.sepa_description.clone(), self.month_names()?))
    }

    fn month_names(&self) -> Result<MonthNames, EinzugError> {
        match &self.monatsnamen {
            None => Ok(MonthNames::german()),
            Some(names) => MonthNames::try_from(names.clone()).map_err(|len| {
                EinzugError::Config(format!("monatsnamen must list 12 months, got {len}"))
            }),
        }
    }
}
