use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a catalog entity or asset.
pub type Id = uuid::Uuid;

/// Bearer credential string.
pub type Token = String;

/// Tenancy scope sent with every catalog request as the `project-id` and
/// `virtual-lab-id` headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub project_id: Id,
    pub virtual_lab_id: Id,
}

impl ProjectContext {
    pub fn new(project_id: Id, virtual_lab_id: Id) -> Self {
        Self {
            project_id,
            virtual_lab_id,
        }
    }
}

/// Catalog deployment to talk to when no explicit API URL is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentEnvironment {
    Staging,
    Production,
}

impl std::fmt::Display for DeploymentEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentEnvironment::Staging => f.write_str("staging"),
            DeploymentEnvironment::Production => f.write_str("production"),
        }
    }
}

impl std::str::FromStr for DeploymentEnvironment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "staging" => Ok(DeploymentEnvironment::Staging),
            "production" => Ok(DeploymentEnvironment::Production),
            other => Err(Error::Config(format!(
                "unknown deployment environment {other:?}; expected \"staging\" or \"production\""
            ))),
        }
    }
}

/// Source of the bearer credential attached to catalog requests.
///
/// Token acquisition is out of scope for this library; callers hand in
/// whatever yields a valid credential string at request time.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Result<Token>;
}

impl TokenProvider for String {
    fn token(&self) -> Result<Token> {
        Ok(self.clone())
    }
}

impl TokenProvider for &'static str {
    fn token(&self) -> Result<Token> {
        Ok((*self).to_string())
    }
}
