//! vembed Core - Player SDK loading for video embed components
//!
//! This crate provides what the embed components need before they can hand
//! a `<video>` element to a third-party player:
//! - Script and stylesheet injection, once per element id
//! - Readiness polling for globals the SDK publishes
//! - Provider SDK catalog (hls.js, dash.js, Video.js, Cloudflare, ...)
//! - Playback URL builders (Cloudinary, Mux, Cloudflare Stream)
//! - Debounce / throttle helpers
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     vembed Core                         │
//! ├─────────────────────────────────────────────────────────┤
//! │                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐   │
//! │  │   Provider   │  │     URL      │  │   Debounce   │   │
//! │  │   Catalog    │  │   Builders   │  │   Throttle   │   │
//! │  └──────┬───────┘  └──────────────┘  └──────────────┘   │
//! │         │                                               │
//! │  ┌──────┴───────┐       ┌──────────────┐                │
//! │  │   Resource   │──────►│    Global    │                │
//! │  │    Loader    │       │    Waiter    │                │
//! │  └──────┬───────┘       └──────┬───────┘                │
//! │         │                      │                        │
//! │  ┌──────┴───────┐       ┌──────┴───────┐                │
//! │  │  DomSurface  │       │ GlobalScope  │                │
//! │  └──────────────┘       └──────────────┘                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use vembed_core::{LoaderConfig, ResourceLoader, VideoProvider};
//!
//! # async fn run() -> vembed_core::Result<()> {
//! let loader = ResourceLoader::in_memory(LoaderConfig::server());
//! let bundle = VideoProvider::Hls.sdk().expect("hls.js bundle");
//! // Outside a browser loads are no-ops
//! loader.load_script(&bundle.script_url, Some(&bundle.script_id())).await?;
//! # Ok(())
//! # }
//! ```

pub mod dom;
pub mod error;
pub mod globals;
pub mod loader;
pub mod poll;
pub mod providers;
pub mod timing;
pub mod types;
pub mod urls;

pub use dom::{DomSurface, LoadCompletion, LoadEvent, MemoryDocument, ResourceElement};
pub use error::{Error, Result};
pub use globals::{GlobalScope, MemoryGlobals};
pub use loader::ResourceLoader;
pub use poll::{GlobalWaiter, PollState};
pub use providers::{SdkBundle, VideoProvider};
pub use timing::{Debouncer, Throttle};
pub use types::*;
pub use urls::{
    build_cloudflare_stream_url, build_cloudflare_thumbnail_url, build_cloudinary_url,
    build_mux_thumbnail_url, build_mux_url, generate_id, CloudflareUrlOptions,
    CloudinaryTransformation, MuxUrlOptions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log library initialization
pub fn init() {
    tracing::info!(version = VERSION, "vembed core initialized");
}
