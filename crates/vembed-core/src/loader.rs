//! Resource Loader - injects player SDK scripts and stylesheets
//!
//! Coordinates:
//! - Idempotent injection by element id
//! - Sharing of in-flight loads between concurrent callers
//! - Readiness polling for SDK globals
//! - No-op behaviour outside a browser

use crate::{
    dom::{DomSurface, LoadCompletion, LoadEvent, MemoryDocument, ResourceElement},
    globals::{GlobalScope, MemoryGlobals},
    poll::GlobalWaiter,
    providers::SdkBundle,
    types::{LoadRequest, LoaderConfig, PollRequest, ResourceKind},
    Error, Result,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, instrument, trace, warn};

type InFlightMap = HashMap<String, watch::Receiver<Option<LoadEvent>>>;

/// Loader for external resources over an injected document surface
pub struct ResourceLoader<D: DomSurface, G: GlobalScope> {
    dom: Arc<D>,
    globals: Arc<G>,
    config: LoaderConfig,
    /// Loads currently waiting on their element, keyed by element id
    in_flight: Arc<Mutex<InFlightMap>>,
}

/// How a load request got started
enum Start {
    /// Element already in the document
    Present,
    /// Waiting on the shared outcome of a tracked load
    Shared(watch::Receiver<Option<LoadEvent>>),
    /// This call appended an untracked element
    Appended(oneshot::Receiver<LoadEvent>),
}

impl ResourceLoader<MemoryDocument, MemoryGlobals> {
    /// Loader over a fresh in-memory document and global namespace
    pub fn in_memory(config: LoaderConfig) -> Self {
        Self::new(
            Arc::new(MemoryDocument::new()),
            Arc::new(MemoryGlobals::new()),
            config,
        )
    }
}

impl<D: DomSurface, G: GlobalScope> ResourceLoader<D, G> {
    /// Create a new loader
    pub fn new(dom: Arc<D>, globals: Arc<G>, config: LoaderConfig) -> Self {
        Self {
            dom,
            globals,
            config,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn dom(&self) -> &Arc<D> {
        &self.dom
    }

    pub fn globals(&self) -> &Arc<G> {
        &self.globals
    }

    pub fn is_browser(&self) -> bool {
        self.config.environment.is_browser()
    }

    /// Load an external script once per id
    pub async fn load_script(&self, src: &str, id: Option<&str>) -> Result<()> {
        self.load(LoadRequest::script(src, id)).await
    }

    /// Load an external stylesheet once per id
    pub async fn load_stylesheet(&self, href: &str, id: Option<&str>) -> Result<()> {
        self.load(LoadRequest::stylesheet(href, id)).await
    }

    /// Inject the requested resource and wait for its load or error event
    #[instrument(skip(self, request), fields(kind = %request.kind, url = %request.url, id = ?request.id))]
    pub async fn load(&self, request: LoadRequest) -> Result<()> {
        if !self.is_browser() {
            debug!(environment = %self.config.environment, "Skipping load outside browser");
            return Ok(());
        }

        let event = match self.start(&request) {
            Start::Present => {
                debug!("Element already present");
                return Ok(());
            }
            Start::Shared(mut rx) => {
                let seen = rx.wait_for(Option::is_some).await.map(|seen| *seen);
                // Relay torn down with its runtime before the element settled
                seen.ok().flatten().unwrap_or(LoadEvent::Error)
            }
            // A dropped completion means the element was removed while pending
            Start::Appended(completion) => completion.await.unwrap_or(LoadEvent::Error),
        };

        match event {
            LoadEvent::Load => {
                debug!("Resource loaded");
                Ok(())
            }
            LoadEvent::Error => {
                warn!("Resource failed to load");
                Err(Error::load_failure(request.kind, request.url))
            }
        }
    }

    fn start(&self, request: &LoadRequest) -> Start {
        let mut in_flight = self.in_flight.lock();

        if let Some(id) = request.id.as_deref() {
            if self.dom.contains(id) {
                if self.config.dedupe_in_flight {
                    if let Some(rx) = in_flight.get(id) {
                        debug!("Joining in-flight load");
                        return Start::Shared(rx.clone());
                    }
                }
                return Start::Present;
            }
        }

        let element = match request.kind {
            ResourceKind::Script => ResourceElement::script(&request.url, request.id.clone()),
            ResourceKind::Stylesheet => {
                ResourceElement::stylesheet(&request.url, request.id.clone())
            }
        };

        let (completion_handle, completion) = LoadCompletion::channel();
        trace!(tag = element.tag_name(), "Appending element to head");
        self.dom.append_to_head(element, completion_handle);

        match request.id.as_ref() {
            Some(id) if self.config.dedupe_in_flight => {
                let (tx, rx) = watch::channel(None);
                in_flight.insert(id.clone(), rx.clone());
                self.relay(id.clone(), completion, tx);
                Start::Shared(rx)
            }
            _ => Start::Appended(completion),
        }
    }

    /// Forward the element's outcome to every caller sharing it. Runs
    /// detached from the appending call, which may be dropped before the
    /// element settles.
    fn relay(
        &self,
        id: String,
        completion: oneshot::Receiver<LoadEvent>,
        tx: watch::Sender<Option<LoadEvent>>,
    ) {
        let registry = Arc::clone(&self.in_flight);
        tokio::spawn(async move {
            let event = completion.await.unwrap_or(LoadEvent::Error);
            tx.send_replace(Some(event));

            let mut registry = registry.lock();
            let ours = registry
                .get(&id)
                .is_some_and(|rx| rx.same_channel(&tx.subscribe()));
            if ours {
                registry.remove(&id);
            }
        });
    }

    /// Remove the element with this id. Never fails.
    pub fn remove_resource(&self, id: &str, kind: ResourceKind) {
        if !self.is_browser() {
            return;
        }

        // A reload of this id must append a fresh element, never join the old one
        self.in_flight.lock().remove(id);

        match self.dom.remove(id) {
            Some(element) if element.kind != kind => {
                debug!(id, expected = %kind, found = %element.kind, "Removed element of another kind");
            }
            Some(_) => debug!(id, %kind, "Removed resource"),
            None => trace!(id, %kind, "Nothing to remove"),
        }
    }

    /// Wait until `symbol` is defined in the global namespace.
    ///
    /// `timeout` defaults to the configured global timeout.
    #[instrument(skip(self))]
    pub async fn wait_for_global(
        &self,
        symbol: &str,
        timeout: Option<Duration>,
    ) -> Result<G::Value> {
        if !self.is_browser() {
            return Err(Error::Environment);
        }

        let request = PollRequest::new(
            symbol,
            Some(timeout.unwrap_or_else(|| self.config.global_timeout())),
        );
        GlobalWaiter::new(&*self.globals, request, self.config.poll_interval())
            .run()
            .await
    }

    /// Load a provider SDK bundle and wait for its global
    #[instrument(skip(self, bundle), fields(global = %bundle.global))]
    pub async fn prepare(&self, bundle: &SdkBundle) -> Result<G::Value> {
        if let Some(href) = bundle.stylesheet_url.as_deref() {
            self.load_stylesheet(href, Some(&bundle.stylesheet_id()))
                .await?;
        }
        self.load_script(&bundle.script_url, Some(&bundle.script_id()))
            .await?;

        let value = self.wait_for_global(&bundle.global, None).await?;
        info!(global = %bundle.global, "Player SDK ready");
        Ok(value)
    }
}
