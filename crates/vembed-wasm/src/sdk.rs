//! SDK bundle preparation for player components
//!
//! ```javascript
//! import init, { loadSdk } from '@vembed/wasm';
//!
//! await init();
//! const Hls = await loadSdk({
//!   idPrefix: 'hlsjs',
//!   scriptUrl: 'https://cdn.jsdelivr.net/npm/hls.js@1/dist/hls.min.js',
//!   global: 'Hls',
//! });
//! ```

use crate::loader::{load_script, load_stylesheet, wait_for_global};
use js_sys::Promise;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

/// Script, optional stylesheet and global of one player library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkBundle {
    pub id_prefix: String,
    pub script_url: String,
    #[serde(default)]
    pub stylesheet_url: Option<String>,
    pub global: String,
    /// Deadline for the global (ms)
    #[serde(default)]
    pub timeout_ms: Option<f64>,
}

impl SdkBundle {
    pub fn script_id(&self) -> String {
        format!("{}-js", self.id_prefix)
    }

    pub fn stylesheet_id(&self) -> String {
        format!("{}-css", self.id_prefix)
    }
}

/// Load a bundle's stylesheet and script, then resolve with its global
#[wasm_bindgen(js_name = loadSdk)]
pub fn load_sdk(bundle: JsValue) -> Promise {
    future_to_promise(async move {
        let bundle: SdkBundle = serde_wasm_bindgen::from_value(bundle)?;

        if let Some(href) = bundle.stylesheet_url.clone() {
            JsFuture::from(load_stylesheet(href, Some(bundle.stylesheet_id()))).await?;
        }
        JsFuture::from(load_script(bundle.script_url.clone(), Some(bundle.script_id()))).await?;

        let value = JsFuture::from(wait_for_global(bundle.global.clone(), bundle.timeout_ms)).await?;
        web_sys::console::debug_1(&JsValue::from_str(&format!(
            "[vembed] {} ready",
            bundle.global
        )));
        Ok(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_ids() {
        let bundle = SdkBundle {
            id_prefix: "videojs".to_string(),
            script_url: "https://vjs.zencdn.net/8.10.0/video.min.js".to_string(),
            stylesheet_url: None,
            global: "videojs".to_string(),
            timeout_ms: None,
        };
        assert_eq!(bundle.script_id(), "videojs-js");
        assert_eq!(bundle.stylesheet_id(), "videojs-css");
    }
}
