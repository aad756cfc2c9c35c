//! Resource Loader - script/stylesheet injection over the real document
//!
//! Mirrors the vembed-core loader contract with browser primitives:
//! `onload`/`onerror` handlers settle the returned Promise, and readiness
//! polling runs on `setInterval`.

use js_sys::{Date, Function, Promise, Reflect};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlLinkElement, HtmlScriptElement, Window};

/// Interval between global readiness checks (ms)
pub const POLL_INTERVAL_MS: i32 = 100;

/// Default deadline for `waitForGlobal` (ms)
pub const DEFAULT_GLOBAL_TIMEOUT_MS: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResourceKind {
    Script,
    Stylesheet,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Script => write!(f, "script"),
            ResourceKind::Stylesheet => write!(f, "stylesheet"),
        }
    }
}

pub(crate) fn failure_message(kind: ResourceKind, url: &str) -> String {
    format!("Failed to load {kind}: {url}")
}

/// Deadline check, strict like the native waiter
pub(crate) fn timed_out(started_at: f64, now: f64, timeout_ms: f64) -> bool {
    now - started_at > timeout_ms
}

/// Loads still waiting on their element, keyed by element id.
///
/// Each load gets a token up front so a settle only clears its own entry.
#[derive(Debug)]
pub(crate) struct PendingLoads<P> {
    loads: HashMap<String, (u64, P)>,
    next_token: u64,
}

impl<P: Clone> PendingLoads<P> {
    pub(crate) fn new() -> Self {
        Self {
            loads: HashMap::new(),
            next_token: 0,
        }
    }

    pub(crate) fn next_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Pending load to join, only while its element is still in the document
    pub(crate) fn join(&self, id: &str, element_present: bool) -> Option<P> {
        if element_present {
            self.loads.get(id).map(|(_, load)| load.clone())
        } else {
            None
        }
    }

    pub(crate) fn track(&mut self, id: String, token: u64, load: P) {
        self.loads.insert(id, (token, load));
    }

    /// Drop the entry for `id` if it still belongs to the settled load
    pub(crate) fn settle(&mut self, id: &str, token: u64) {
        if self.loads.get(id).is_some_and(|(ours, _)| *ours == token) {
            self.loads.remove(id);
        }
    }

    pub(crate) fn forget(&mut self, id: &str) {
        self.loads.remove(id);
    }
}

thread_local! {
    static PENDING: RefCell<PendingLoads<Promise>> = RefCell::new(PendingLoads::new());
}

fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

fn resolve_undefined(resolve: &Function) {
    let _ = resolve.call0(&JsValue::UNDEFINED);
}

fn reject_with(reject: &Function, message: &str) {
    let _ = reject.call1(&JsValue::UNDEFINED, &js_sys::Error::new(message));
}

/// Check if code is running in a browser environment
#[wasm_bindgen(js_name = isBrowser)]
pub fn is_browser() -> bool {
    document().is_some()
}

/// Dynamically load an external script, once per id
#[wasm_bindgen(js_name = loadScript)]
pub fn load_script(src: String, id: Option<String>) -> Promise {
    load_resource(ResourceKind::Script, src, id)
}

/// Dynamically load a CSS stylesheet, once per id
#[wasm_bindgen(js_name = loadStylesheet)]
pub fn load_stylesheet(href: String, id: Option<String>) -> Promise {
    load_resource(ResourceKind::Stylesheet, href, id)
}

/// Remove a script element by id
#[wasm_bindgen(js_name = removeScript)]
pub fn remove_script(id: String) {
    remove_element(&id);
}

/// Remove a stylesheet link by id
#[wasm_bindgen(js_name = removeStylesheet)]
pub fn remove_stylesheet(id: String) {
    remove_element(&id);
}

fn remove_element(id: &str) {
    PENDING.with(|pending| pending.borrow_mut().forget(id));
    if let Some(element) = document().and_then(|doc| doc.get_element_by_id(id)) {
        element.remove();
    }
}

fn load_resource(kind: ResourceKind, url: String, id: Option<String>) -> Promise {
    if let Some(id) = id.as_deref() {
        let present = document().and_then(|doc| doc.get_element_by_id(id)).is_some();
        if let Some(pending) = PENDING.with(|pending| pending.borrow().join(id, present)) {
            return pending;
        }
    }

    let token = PENDING.with(|pending| pending.borrow_mut().next_token());
    let promise = Promise::new(&mut |resolve, reject| {
        let Some(document) = document() else {
            resolve_undefined(&resolve);
            return;
        };

        if let Some(id) = id.as_deref() {
            if document.get_element_by_id(id).is_some() {
                resolve_undefined(&resolve);
                return;
            }
        }

        let target = Target {
            kind,
            url: &url,
            id: id.as_deref(),
            token,
        };
        if let Err(err) = inject(&document, target, resolve, reject.clone()) {
            let _ = reject.call1(&JsValue::UNDEFINED, &err);
        }
    });

    if let Some(id) = id {
        PENDING.with(|pending| pending.borrow_mut().track(id, token, promise.clone()));
    }
    promise
}

fn settle_pending(id: Option<&str>, token: u64) {
    if let Some(id) = id {
        PENDING.with(|pending| pending.borrow_mut().settle(id, token));
    }
}

/// Element to inject and the pending-load token it settles
struct Target<'a> {
    kind: ResourceKind,
    url: &'a str,
    id: Option<&'a str>,
    token: u64,
}

fn inject(
    document: &Document,
    target: Target<'_>,
    resolve: Function,
    reject: Function,
) -> Result<(), JsValue> {
    let Target {
        kind,
        url,
        id,
        token,
    } = target;
    let element: HtmlElement = match kind {
        ResourceKind::Script => {
            let script: HtmlScriptElement = document.create_element("script")?.dyn_into()?;
            script.set_src(url);
            script.set_async(true);
            script.unchecked_into()
        }
        ResourceKind::Stylesheet => {
            let link: HtmlLinkElement = document.create_element("link")?.dyn_into()?;
            link.set_rel("stylesheet");
            link.set_href(url);
            link.unchecked_into()
        }
    };
    if let Some(id) = id {
        element.set_id(id);
    }

    let owned_id = id.map(str::to_string);
    let onload = {
        let id = owned_id.clone();
        Closure::once_into_js(move || {
            settle_pending(id.as_deref(), token);
            resolve_undefined(&resolve);
        })
    };
    let message = failure_message(kind, url);
    let onerror = Closure::once_into_js(move || {
        settle_pending(owned_id.as_deref(), token);
        web_sys::console::warn_1(&JsValue::from_str(&message));
        reject_with(&reject, &message);
    });
    element.set_onload(Some(onload.unchecked_ref()));
    element.set_onerror(Some(onerror.unchecked_ref()));

    let head = document
        .head()
        .ok_or_else(|| js_sys::Error::new("document has no head"))?;
    head.append_child(&element)?;
    Ok(())
}

/// Wait for a global variable to be available
#[wasm_bindgen(js_name = waitForGlobal)]
pub fn wait_for_global(name: String, timeout_ms: Option<f64>) -> Promise {
    Promise::new(&mut |resolve, reject| {
        let Some(window) = web_sys::window() else {
            reject_with(&reject, "Not in browser environment");
            return;
        };

        if let Some(value) = lookup(&window, &name) {
            let _ = resolve.call1(&JsValue::UNDEFINED, &value);
            return;
        }

        if let Err(err) = start_polling(window, name.clone(), timeout_ms, resolve, reject.clone()) {
            let _ = reject.call1(&JsValue::UNDEFINED, &err);
        }
    })
}

fn lookup(window: &Window, name: &str) -> Option<JsValue> {
    Reflect::get(window, &JsValue::from_str(name))
        .ok()
        .filter(JsValue::is_truthy)
}

fn start_polling(
    window: Window,
    name: String,
    timeout_ms: Option<f64>,
    resolve: Function,
    reject: Function,
) -> Result<(), JsValue> {
    let timeout = timeout_ms.unwrap_or(DEFAULT_GLOBAL_TIMEOUT_MS);
    let started_at = Date::now();
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    let tick = {
        let window = window.clone();
        let handle = Rc::clone(&handle);
        Closure::<dyn FnMut()>::new(move || {
            // A tick can still be queued when the interval is cleared
            let Some(id) = handle.get() else { return };

            if let Some(value) = lookup(&window, &name) {
                window.clear_interval_with_handle(id);
                handle.set(None);
                let _ = resolve.call1(&JsValue::UNDEFINED, &value);
            } else if timed_out(started_at, Date::now(), timeout) {
                window.clear_interval_with_handle(id);
                handle.set(None);
                reject_with(&reject, &format!("Timeout waiting for global: {name}"));
            }
        })
        .into_js_value()
    };

    let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.unchecked_ref(),
        POLL_INTERVAL_MS,
    )?;
    handle.set(Some(id));
    Ok(())
}
