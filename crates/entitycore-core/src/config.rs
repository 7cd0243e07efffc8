use crate::error::{Error, Result};
use crate::types::DeploymentEnvironment;

const DEFAULT_STAGING_API_URL: &str = "https://staging.openbraininstitute.org/api/entitycore";
const DEFAULT_PRODUCTION_API_URL: &str = "https://www.openbraininstitute.org/api/entitycore";

/// Library-wide settings, overridable through `ENTITYCORE_*` environment
/// variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Pagination page size, or `None` to use the server default.
    pub page_size: Option<u64>,
    pub staging_api_url: String,
    pub production_api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: None,
            staging_api_url: DEFAULT_STAGING_API_URL.to_string(),
            production_api_url: DEFAULT_PRODUCTION_API_URL.to_string(),
        }
    }
}

impl Settings {
    /// Build settings from the process environment.
    ///
    /// Recognized variables: `ENTITYCORE_PAGE_SIZE`,
    /// `ENTITYCORE_STAGING_API_URL`, `ENTITYCORE_PRODUCTION_API_URL`.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();

        if let Ok(raw) = std::env::var("ENTITYCORE_PAGE_SIZE") {
            let page_size: u64 = raw.parse().map_err(|_| {
                Error::Config(format!("ENTITYCORE_PAGE_SIZE is not a valid integer: {raw:?}"))
            })?;
            if page_size == 0 {
                return Err(Error::Config(
                    "ENTITYCORE_PAGE_SIZE must be strictly positive".to_string(),
                ));
            }
            settings.page_size = Some(page_size);
        }
        if let Ok(url) = std::env::var("ENTITYCORE_STAGING_API_URL") {
            settings.staging_api_url = url;
        }
        if let Ok(url) = std::env::var("ENTITYCORE_PRODUCTION_API_URL") {
            settings.production_api_url = url;
        }

        Ok(settings)
    }

    /// API base URL for a deployment environment.
    pub fn api_url(&self, environment: DeploymentEnvironment) -> &str {
        match environment {
            DeploymentEnvironment::Staging => &self.staging_api_url,
            DeploymentEnvironment::Production => &self.production_api_url,
        }
    }
}
