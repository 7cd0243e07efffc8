//! Shared foundation of the entitycore client SDK.
//!
//! Holds the data models, the error taxonomy, tenancy/credential types,
//! library settings, the asset selector and the lazy result wrapper the
//! higher-level crates build on. Nothing in this crate performs IO.

pub use self::config::Settings;
pub use self::error::{Error, Result, TransportError, TransportKind};
pub use self::result::ResultStream;
pub use self::select::filter_assets;
pub use self::types::{DeploymentEnvironment, Id, ProjectContext, Token, TokenProvider};

pub mod models;

mod config;
mod error;
mod result;
mod select;
mod types;
