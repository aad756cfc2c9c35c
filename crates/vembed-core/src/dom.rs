//! Document surface used by the loader
//!
//! The loader never touches a document directly. It builds a
//! [`ResourceElement`], hands it to a [`DomSurface`] together with a
//! [`LoadCompletion`], and waits for the surface to settle that completion
//! when the host reports the element's load or error event.
//!
//! [`MemoryDocument`] is an in-memory surface for tests and server-side use:
//! appended elements stay pending until `fire_load` / `fire_error` is called.

use crate::types::ResourceKind;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::trace;

/// Element injected into the document head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceElement {
    pub kind: ResourceKind,
    /// `src` for scripts, `href` for stylesheet links
    pub url: String,
    pub id: Option<String>,
    /// Fetch and execute without blocking the parser (scripts only)
    pub async_load: bool,
    /// Link relation (stylesheets only)
    pub rel: Option<String>,
}

impl ResourceElement {
    pub fn script(src: impl Into<String>, id: Option<String>) -> Self {
        Self {
            kind: ResourceKind::Script,
            url: src.into(),
            id,
            async_load: true,
            rel: None,
        }
    }

    pub fn stylesheet(href: impl Into<String>, id: Option<String>) -> Self {
        Self {
            kind: ResourceKind::Stylesheet,
            url: href.into(),
            id,
            async_load: false,
            rel: Some("stylesheet".to_string()),
        }
    }

    pub fn tag_name(&self) -> &'static str {
        self.kind.tag_name()
    }
}

/// Event that settles an injected element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadEvent {
    Load,
    Error,
}

/// Single-use handle that reports an element's outcome to its loader.
///
/// Settling consumes the handle. Dropping it unsettled tells the loader the
/// element was discarded before the host reported anything.
#[derive(Debug)]
pub struct LoadCompletion {
    tx: oneshot::Sender<LoadEvent>,
}

impl LoadCompletion {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<LoadEvent>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Report the element's load or error event
    pub fn settle(self, event: LoadEvent) {
        // The loader may have been dropped; nobody is left to tell.
        let _ = self.tx.send(event);
    }
}

/// Capability interface over the host document
pub trait DomSurface: Send + Sync {
    /// Whether an element with this id exists
    fn contains(&self, id: &str) -> bool;

    /// Append to head and start the fetch. The surface settles `completion`
    /// once, when the host fires the element's load or error event.
    fn append_to_head(&self, element: ResourceElement, completion: LoadCompletion);

    /// Remove the element with this id, returning it if one was present
    fn remove(&self, id: &str) -> Option<ResourceElement>;
}

struct Slot {
    element: ResourceElement,
    completion: Option<LoadCompletion>,
}

impl Slot {
    fn matches(&self, key: &str) -> bool {
        self.element.id.as_deref() == Some(key) || self.element.url == key
    }
}

#[derive(Default)]
struct DocumentState {
    head: Vec<Slot>,
    appends: usize,
}

/// In-memory document head
#[derive(Default)]
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an already-loaded element in the head, as server-rendered
    /// markup would. Does not count as an append.
    pub fn insert(&self, element: ResourceElement) {
        self.state.lock().head.push(Slot {
            element,
            completion: None,
        });
    }

    /// Fire the load event on the first pending element whose id or URL is `key`
    pub fn fire_load(&self, key: &str) -> bool {
        self.fire(key, LoadEvent::Load)
    }

    /// Fire the error event on the first pending element whose id or URL is `key`
    pub fn fire_error(&self, key: &str) -> bool {
        self.fire(key, LoadEvent::Error)
    }

    fn fire(&self, key: &str, event: LoadEvent) -> bool {
        let completion = {
            let mut state = self.state.lock();
            state
                .head
                .iter_mut()
                .find(|slot| slot.completion.is_some() && slot.matches(key))
                .and_then(|slot| slot.completion.take())
        };

        match completion {
            Some(completion) => {
                trace!(key, ?event, "Dispatching element event");
                completion.settle(event);
                true
            }
            None => false,
        }
    }

    /// Number of elements appended through the surface (fetches issued)
    pub fn append_count(&self) -> usize {
        self.state.lock().appends
    }

    /// Elements still waiting for a load or error event
    pub fn pending_count(&self) -> usize {
        self.state
            .lock()
            .head
            .iter()
            .filter(|slot| slot.completion.is_some())
            .count()
    }

    /// First element with this id
    pub fn element(&self, id: &str) -> Option<ResourceElement> {
        self.state
            .lock()
            .head
            .iter()
            .find(|slot| slot.element.id.as_deref() == Some(id))
            .map(|slot| slot.element.clone())
    }

    /// Snapshot of the head in document order
    pub fn elements(&self) -> Vec<ResourceElement> {
        self.state
            .lock()
            .head
            .iter()
            .map(|slot| slot.element.clone())
            .collect()
    }
}

impl DomSurface for MemoryDocument {
    fn contains(&self, id: &str) -> bool {
        self.state
            .lock()
            .head
            .iter()
            .any(|slot| slot.element.id.as_deref() == Some(id))
    }

    fn append_to_head(&self, element: ResourceElement, completion: LoadCompletion) {
        let mut state = self.state.lock();
        state.appends += 1;
        state.head.push(Slot {
            element,
            completion: Some(completion),
        });
    }

    fn remove(&self, id: &str) -> Option<ResourceElement> {
        let mut state = self.state.lock();
        let index = state
            .head
            .iter()
            .position(|slot| slot.element.id.as_deref() == Some(id))?;
        Some(state.head.remove(index).element)
    }
}
