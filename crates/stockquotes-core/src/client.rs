//! Credential-bound facade over [`QueryEngine`].
//!
//! A [`QuoteClient`] keeps at most one engine alive, tied to the credential
//! it was built with. Supplying a different credential replaces the engine,
//! and with it every cached series. Arguments are validated before any
//! binding happens, so a rejected call never swaps the credential.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::adapters::AlphaVantageFactory;
use crate::cache::{CachePolicy, NeverExpire};
use crate::config::ClientConfig;
use crate::engine::{parse_window_query, QueryEngine};
use crate::query::{BarResult, Extremum, ExtremumResult};
use crate::source::SourceFactory;
use crate::{ConfigError, QueryError, Symbol, TradingDate};

struct Binding<S> {
    credential: String,
    engine: Arc<QueryEngine<S>>,
}

/// Query operations with lazy, credential-scoped engine construction.
pub struct QuoteClient<F: SourceFactory> {
    factory: F,
    default_credential: Option<String>,
    policy: Arc<dyn CachePolicy>,
    bound: RwLock<Option<Binding<F::Source>>>,
}

impl<F: SourceFactory> QuoteClient<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            default_credential: None,
            policy: Arc::new(NeverExpire),
            bound: RwLock::new(None),
        }
    }

    /// Credential used when nothing is bound and a call supplies none.
    pub fn with_default_credential(mut self, credential: impl Into<String>) -> Self {
        let credential: String = credential.into();
        self.default_credential = normalize(Some(&credential)).map(str::to_owned);
        self
    }

    /// Freshness rule for every engine this client builds.
    pub fn with_cache_policy(mut self, policy: Arc<dyn CachePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub async fn lookup(
        &self,
        symbol: &str,
        date: &str,
        credential: Option<&str>,
    ) -> Result<BarResult, QueryError> {
        let symbol = Symbol::parse(symbol)?;
        let date = TradingDate::parse(date)?;
        self.engine_for(credential).await?.bar_on(symbol, date).await
    }

    pub async fn minimum_over_window(
        &self,
        symbol: &str,
        window: usize,
        credential: Option<&str>,
    ) -> Result<ExtremumResult, QueryError> {
        let symbol = parse_window_query(symbol, window)?;
        self.engine_for(credential)
            .await?
            .extremum_over_window(symbol, window, Extremum::Minimum)
            .await
    }

    pub async fn maximum_over_window(
        &self,
        symbol: &str,
        window: usize,
        credential: Option<&str>,
    ) -> Result<ExtremumResult, QueryError> {
        let symbol = parse_window_query(symbol, window)?;
        self.engine_for(credential)
            .await?
            .extremum_over_window(symbol, window, Extremum::Maximum)
            .await
    }

    /// Binds `credential`, replacing the current engine if it differs.
    pub async fn rebind(&self, credential: &str) -> Result<(), QueryError> {
        normalize(Some(credential)).ok_or(ConfigError::MissingCredential)?;
        self.engine_for(Some(credential)).await.map(|_| ())
    }

    /// Drops the bound engine and its cache.
    pub async fn reset(&self) {
        if self.bound.write().await.take().is_some() {
            tracing::debug!("quote client binding cleared");
        }
    }

    pub async fn bound_credential(&self) -> Option<String> {
        self.bound
            .read()
            .await
            .as_ref()
            .map(|binding| binding.credential.clone())
    }

    /// Engine currently bound, if any.
    pub async fn engine(&self) -> Option<Arc<QueryEngine<F::Source>>> {
        self.bound
            .read()
            .await
            .as_ref()
            .map(|binding| Arc::clone(&binding.engine))
    }

    async fn engine_for(
        &self,
        credential: Option<&str>,
    ) -> Result<Arc<QueryEngine<F::Source>>, QueryError> {
        let supplied = normalize(credential);

        {
            let bound = self.bound.read().await;
            if let Some(binding) = bound.as_ref() {
                if supplied.map_or(true, |key| key == binding.credential) {
                    return Ok(Arc::clone(&binding.engine));
                }
            }
        }

        let mut bound = self.bound.write().await;
        // Another task may have bound while the read lock was released.
        if let Some(binding) = bound.as_ref() {
            if supplied.map_or(true, |key| key == binding.credential) {
                return Ok(Arc::clone(&binding.engine));
            }
        }

        let credential = match supplied {
            Some(key) => key.to_owned(),
            None => self
                .default_credential
                .clone()
                .ok_or(ConfigError::MissingCredential)?,
        };

        if bound.is_some() {
            tracing::warn!("credential changed, discarding cached series");
        }

        let engine = Arc::new(QueryEngine::with_cache_policy(
            self.factory.build(&credential),
            Arc::clone(&self.policy),
        ));
        *bound = Some(Binding {
            credential,
            engine: Arc::clone(&engine),
        });
        Ok(engine)
    }
}

impl QuoteClient<AlphaVantageFactory> {
    /// Alpha Vantage client whose default credential is `config.api_key`.
    pub fn from_config(config: ClientConfig) -> Self {
        let default_credential = config.api_key.clone();
        let client = Self::new(AlphaVantageFactory::new(config));
        match default_credential {
            Some(credential) => client.with_default_credential(credential),
            None => client,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        ClientConfig::from_env().map(Self::from_config)
    }
}

impl<F: SourceFactory> std::fmt::Debug for QuoteClient<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteClient")
            .field("has_default_credential", &self.default_credential.is_some())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn normalize(credential: Option<&str>) -> Option<&str> {
    credential.map(str::trim).filter(|key| !key.is_empty())
}
