//! The request interception entry point.
//!
//! An [`Interceptor`] owns the store backend, the fetch capability and the
//! routing table. The hosting environment drives it through three calls:
//! [`Interceptor::provision`], [`Interceptor::activate`] and
//! [`Interceptor::handle_request`].

use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};

use crate::Error;
use crate::cache::{CacheStorage, Store};
use crate::config::AppConfig;
use crate::fetch::Fetcher;
use crate::lifecycle::{self, ActivationReport, LifecycleState, ProvisionReport};
use crate::manifest::Manifest;
use crate::model::{Intercept, Request};
use crate::routing::{Router, Strategy, is_addressable};
use crate::strategy::{Revalidations, StrategyContext};

pub struct Interceptor {
    backend: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    manifest: Manifest,
    router: Router,
    static_name: String,
    dynamic_name: String,
    fallback_document: String,
    max_dynamic_entries: usize,
    state: RwLock<LifecycleState>,
    context: OnceCell<StrategyContext>,
}

impl Interceptor {
    /// Build an interceptor from configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if the manifest cannot be resolved.
    pub fn new(config: &AppConfig, backend: Arc<dyn CacheStorage>, fetcher: Arc<dyn Fetcher>) -> Result<Self, Error> {
        let manifest = if config.manifest.is_empty() {
            Manifest::default()
        } else {
            let origin = config
                .require_origin()
                .map_err(|e| Error::InvalidUrl(e.to_string()))?;
            Manifest::resolve(&origin, &config.manifest)?
        };
        let router = Router::new(config, manifest.clone());

        Ok(Self {
            backend,
            fetcher,
            manifest,
            router,
            static_name: config.static_store_name(),
            dynamic_name: config.dynamic_store_name(),
            fallback_document: config.fallback_document.clone(),
            max_dynamic_entries: config.max_dynamic_entries,
            state: RwLock::new(LifecycleState::Uninitialized),
            context: OnceCell::new(),
        })
    }

    pub async fn state(&self) -> LifecycleState {
        *self.state.read().await
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn backend(&self) -> &Arc<dyn CacheStorage> {
        &self.backend
    }

    /// Configured upper bound for the dynamic store.
    pub fn max_dynamic_entries(&self) -> usize {
        self.max_dynamic_entries
    }

    /// The current version's static store, once provisioned.
    pub fn static_store(&self) -> Option<&Store> {
        self.context.get().map(|ctx| &ctx.static_store)
    }

    /// The current version's dynamic store, once provisioned.
    pub fn dynamic_store(&self) -> Option<&Store> {
        self.context.get().map(|ctx| &ctx.dynamic_store)
    }

    /// Preload the manifest and create both stores.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` if already provisioned, or a store error
    /// if a store cannot be opened. Individual asset failures are reported in
    /// the returned [`ProvisionReport`] instead.
    pub async fn provision(&self) -> Result<ProvisionReport, Error> {
        {
            let mut state = self.state.write().await;
            if *state != LifecycleState::Uninitialized {
                return Err(Error::InvalidState(format!("cannot provision from {:?}", *state)));
            }
            *state = LifecycleState::Provisioning;
        }
        tracing::info!(assets = self.manifest.len(), "provisioning");

        let result = lifecycle::provision(
            &self.backend,
            self.fetcher.as_ref(),
            &self.manifest,
            &self.static_name,
            &self.dynamic_name,
        )
        .await;

        let mut state = self.state.write().await;
        let (static_store, dynamic_store, report) = match result {
            Ok(opened) => opened,
            Err(e) => {
                *state = LifecycleState::Uninitialized;
                return Err(e);
            }
        };

        let fallback_key = self.manifest.find(&self.fallback_document).map(|e| e.key());
        let context = StrategyContext {
            fetcher: self.fetcher.clone(),
            backend: self.backend.clone(),
            static_store,
            dynamic_store,
            max_dynamic_entries: self.max_dynamic_entries,
            fallback_key,
            revalidations: Revalidations::default(),
        };
        self.context
            .set(context)
            .map_err(|_| Error::InvalidState("strategy context already initialized".into()))?;
        *state = LifecycleState::Provisioned;

        Ok(report)
    }

    /// Drop stores from other versions, trim the dynamic store and start
    /// intercepting. Re-activating an active interceptor repeats the cleanup.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` before provisioning has completed.
    pub async fn activate(&self) -> Result<ActivationReport, Error> {
        let mut state = self.state.write().await;
        let ctx = match (*state, self.context.get()) {
            (LifecycleState::Provisioned | LifecycleState::Active, Some(ctx)) => ctx,
            (current, _) => return Err(Error::InvalidState(format!("cannot activate from {current:?}"))),
        };

        let expected = vec![self.static_name.clone(), self.dynamic_name.clone()];
        let report =
            lifecycle::activate(self.backend.as_ref(), &expected, &ctx.dynamic_store, self.max_dynamic_entries).await?;
        *state = LifecycleState::Active;

        Ok(report)
    }

    /// Serve one outgoing request.
    ///
    /// Non-http(s) requests, and every request before activation, are
    /// declined and must be passed through by the host.
    pub async fn handle_request(&self, request: &Request) -> Intercept {
        if !is_addressable(&request.url) {
            tracing::debug!(url = %request.url, "not network-addressable; passing through");
            return Intercept::Declined;
        }
        if self.state().await != LifecycleState::Active {
            tracing::debug!(url = %request.url, "not active; passing through");
            return Intercept::Declined;
        }
        let Some(ctx) = self.context.get() else {
            return Intercept::Declined;
        };

        let strategy = self.router.select(request);
        Intercept::Respond(ctx.run(strategy, request).await)
    }

    /// Strategy that would serve `request`.
    pub fn strategy_for(&self, request: &Request) -> Strategy {
        self.router.select(request)
    }

    /// Wait for all background revalidations spawned so far.
    pub async fn settle_revalidations(&self) -> usize {
        match self.context.get() {
            Some(ctx) => ctx.revalidations.settle().await,
            None => 0,
        }
    }
}
