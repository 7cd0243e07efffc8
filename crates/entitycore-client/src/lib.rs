//! Typed client for the entitycore scientific-data catalog.
//!
//! Wraps the transfer subsystem with entity-aware operations: CRUD over
//! typed records, paginated search, and asset listing, selection, download
//! and upload. Uploads dispatch between a single-shot form POST and the
//! multipart orchestrator based on file size.

use std::sync::Arc;

use serde_json::{Map, Value};

use entitycore_core::models::Entity;
use entitycore_transfer::{Api, Request, stream_paginated};

mod assets;
mod routes;

pub use entitycore_core::models;
pub use entitycore_core::{
    DeploymentEnvironment, Error, Id, ProjectContext, Result, ResultStream, Settings, Token,
    TokenProvider, filter_assets,
};
pub use entitycore_transfer::{
    HttpTransport, Method, ReqwestTransport, Request as HttpRequest, TransferConfig,
};

/// Handle to one catalog deployment, scoped to a project context and a
/// credential source.
pub struct Client<T: HttpTransport = ReqwestTransport> {
    api: Arc<Api<T>>,
    api_url: String,
    transfer_config: TransferConfig,
    page_size: Option<u64>,
}

impl<T: HttpTransport> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_url", &self.api_url)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl Client<ReqwestTransport> {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }
}

#[derive(Default)]
pub struct ClientBuilder {
    api_url: Option<String>,
    environment: Option<DeploymentEnvironment>,
    project_context: Option<ProjectContext>,
    token: Option<Arc<dyn TokenProvider>>,
    transfer_config: Option<TransferConfig>,
    settings: Option<Settings>,
}

impl ClientBuilder {
    /// Explicit API base URL; takes precedence over [`Self::environment`].
    #[must_use]
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn environment(mut self, environment: DeploymentEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    #[must_use]
    pub fn project_context(mut self, context: ProjectContext) -> Self {
        self.project_context = Some(context);
        self
    }

    #[must_use]
    pub fn token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.token = Some(Arc::new(provider));
        self
    }

    #[must_use]
    pub fn transfer_config(mut self, config: TransferConfig) -> Self {
        self.transfer_config = Some(config);
        self
    }

    /// Override the settings read from the environment.
    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn build(self) -> Result<Client<ReqwestTransport>> {
        let transport = ReqwestTransport::new()?;
        self.build_with_transport(transport)
    }

    /// Build against a caller-supplied transport; tests use this to run the
    /// full client against a mock.
    pub fn build_with_transport<T: HttpTransport>(self, transport: T) -> Result<Client<T>> {
        let settings = match self.settings {
            Some(settings) => settings,
            None => Settings::from_env()?,
        };

        let api_url = match (self.api_url, self.environment) {
            (Some(url), _) => url,
            (None, Some(environment)) => settings.api_url(environment).to_string(),
            (None, None) => {
                return Err(Error::Config(
                    "either an explicit api_url or a deployment environment is required"
                        .to_string(),
                ));
            }
        };
        let context = self
            .project_context
            .ok_or_else(|| Error::Config("a project context is required".to_string()))?;
        let token = self
            .token
            .ok_or_else(|| Error::Config("a token provider is required".to_string()))?;

        Ok(Client {
            api: Arc::new(Api::new(transport, context, token)),
            api_url,
            transfer_config: self.transfer_config.unwrap_or_default(),
            page_size: settings.page_size,
        })
    }
}

impl<T: HttpTransport + 'static> Client<T> {
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn project_context(&self) -> &ProjectContext {
        self.api.context()
    }

    /// The transport behind this client; tests use it to reach their mock.
    pub fn transport(&self) -> &T {
        self.api.transport()
    }

    /// Fetch one entity by id.
    pub async fn get_entity<E: Entity>(&self, entity_id: Id) -> Result<E> {
        let url = routes::entity_endpoint(&self.api_url, E::TYPE, Some(entity_id));
        self.api.request(Request::new(Method::Get, url)).await?.json()
    }

    /// Search entities, streaming results across pages.
    ///
    /// `query` is passed through as request parameters; `limit` caps the
    /// number of yielded records.
    pub fn search_entities<E: Entity>(
        &self,
        query: Vec<(String, String)>,
        limit: Option<u64>,
    ) -> Result<ResultStream<E>> {
        let url = routes::entity_endpoint(&self.api_url, E::TYPE, None);
        stream_paginated(self.api.clone(), url, Method::Get, query, self.page_size, limit)
    }

    /// Register a new entity and return the server's record of it.
    pub async fn register_entity<E: Entity>(&self, entity: &E) -> Result<E> {
        let url = routes::entity_endpoint(&self.api_url, E::TYPE, None);
        let body = serde_json::to_value(entity)?;
        self.api
            .request(Request::new(Method::Post, url).json(body))
            .await?
            .json()
    }

    /// Patch selected attributes of an existing entity.
    pub async fn update_entity<E: Entity>(
        &self,
        entity_id: Id,
        attributes: Map<String, Value>,
    ) -> Result<E> {
        let url = routes::entity_endpoint(&self.api_url, E::TYPE, Some(entity_id));
        self.api
            .request(Request::new(Method::Patch, url).json(Value::Object(attributes)))
            .await?
            .json()
    }
}
