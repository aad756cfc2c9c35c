//! Player SDK catalog
//!
//! Each embed component drives one third-party player library. This module
//! records which script, stylesheet and global make up that library so the
//! loader can prepare it before the component mounts.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const HLS_JS_URL: &str = "https://cdn.jsdelivr.net/npm/hls.js@1/dist/hls.min.js";
pub const DASH_JS_URL: &str = "https://cdn.dashjs.org/latest/dash.all.min.js";
pub const VIDEO_JS_URL: &str = "https://vjs.zencdn.net/8.10.0/video.min.js";
pub const VIDEO_JS_CSS_URL: &str = "https://vjs.zencdn.net/8.10.0/video-js.css";
pub const CLOUDFLARE_SDK_URL: &str = "https://embed.cloudflarestream.com/embed/sdk.latest.js";
pub const CLOUDINARY_PLAYER_URL: &str =
    "https://unpkg.com/cloudinary-video-player/dist/cld-video-player.min.js";
pub const CLOUDINARY_PLAYER_CSS_URL: &str =
    "https://unpkg.com/cloudinary-video-player/dist/cld-video-player.min.css";

/// Supported embed providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoProvider {
    JwPlayer,
    Cloudflare,
    VideoJs,
    Hls,
    Dash,
    Mux,
    Cloudinary,
    Custom,
}

impl VideoProvider {
    pub const ALL: [VideoProvider; 8] = [
        VideoProvider::JwPlayer,
        VideoProvider::Cloudflare,
        VideoProvider::VideoJs,
        VideoProvider::Hls,
        VideoProvider::Dash,
        VideoProvider::Mux,
        VideoProvider::Cloudinary,
        VideoProvider::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoProvider::JwPlayer => "jw-player",
            VideoProvider::Cloudflare => "cloudflare",
            VideoProvider::VideoJs => "video-js",
            VideoProvider::Hls => "hls",
            VideoProvider::Dash => "dash",
            VideoProvider::Mux => "mux",
            VideoProvider::Cloudinary => "cloudinary",
            VideoProvider::Custom => "custom",
        }
    }

    /// Default SDK bundle.
    ///
    /// JW Player is licensed per account and has no public library URL, so
    /// it returns `None` here; use [`SdkBundle::jw_player`]. Custom players
    /// bring their own code.
    pub fn sdk(&self) -> Option<SdkBundle> {
        match self {
            VideoProvider::JwPlayer | VideoProvider::Custom => None,
            VideoProvider::Cloudflare => Some(SdkBundle::new(
                "cloudflare-stream",
                CLOUDFLARE_SDK_URL,
                None,
                "Stream",
            )),
            VideoProvider::VideoJs => Some(SdkBundle::new(
                "videojs",
                VIDEO_JS_URL,
                Some(VIDEO_JS_CSS_URL),
                "videojs",
            )),
            // Mux playback URLs are HLS manifests
            VideoProvider::Hls | VideoProvider::Mux => {
                Some(SdkBundle::new("hlsjs", HLS_JS_URL, None, "Hls"))
            }
            VideoProvider::Dash => Some(SdkBundle::new("dashjs", DASH_JS_URL, None, "dashjs")),
            VideoProvider::Cloudinary => Some(SdkBundle::new(
                "cloudinary-player",
                CLOUDINARY_PLAYER_URL,
                Some(CLOUDINARY_PLAYER_CSS_URL),
                "cloudinary",
            )),
        }
    }
}

impl std::fmt::Display for VideoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "jw-player" | "jwplayer" | "jw" => Ok(VideoProvider::JwPlayer),
            "cloudflare" | "cloudflare-stream" => Ok(VideoProvider::Cloudflare),
            "video-js" | "videojs" => Ok(VideoProvider::VideoJs),
            "hls" | "hls.js" | "hlsjs" => Ok(VideoProvider::Hls),
            "dash" | "dash.js" | "dashjs" => Ok(VideoProvider::Dash),
            "mux" => Ok(VideoProvider::Mux),
            "cloudinary" => Ok(VideoProvider::Cloudinary),
            "custom" => Ok(VideoProvider::Custom),
            _ => Err(format!("unknown provider: {s}")),
        }
    }
}

/// Script, optional stylesheet and global symbol of one player library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkBundle {
    /// Prefix for the injected element ids
    pub id_prefix: String,
    pub script_url: String,
    pub stylesheet_url: Option<String>,
    /// Global the script publishes once it has executed
    pub global: String,
}

impl SdkBundle {
    pub fn new(
        id_prefix: impl Into<String>,
        script_url: impl Into<String>,
        stylesheet_url: Option<&str>,
        global: impl Into<String>,
    ) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            script_url: script_url.into(),
            stylesheet_url: stylesheet_url.map(str::to_string),
            global: global.into(),
        }
    }

    /// JW Player bundle for an account's cloud-hosted library
    pub fn jw_player(library_url: impl Into<String>) -> Self {
        Self::new("jwplayer", library_url, None, "jwplayer")
    }

    pub fn script_id(&self) -> String {
        format!("{}-js", self.id_prefix)
    }

    pub fn stylesheet_id(&self) -> String {
        format!("{}-css", self.id_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names_roundtrip() {
        for provider in VideoProvider::ALL {
            assert_eq!(provider.as_str().parse::<VideoProvider>(), Ok(provider));
        }
        assert_eq!("JW_Player".parse::<VideoProvider>(), Ok(VideoProvider::JwPlayer));
        assert!("vimeo".parse::<VideoProvider>().is_err());
    }

    #[test]
    fn test_mux_uses_hls_js() {
        let bundle = VideoProvider::Mux.sdk().unwrap();
        assert_eq!(bundle.global, "Hls");
        assert_eq!(bundle.script_id(), "hlsjs-js");
    }

    #[test]
    fn test_bundles_without_defaults() {
        assert!(VideoProvider::JwPlayer.sdk().is_none());
        assert!(VideoProvider::Custom.sdk().is_none());

        let jw = SdkBundle::jw_player("https://cdn.jwplayer.com/libraries/abc.js");
        assert_eq!(jw.global, "jwplayer");
        assert_eq!(jw.stylesheet_url, None);
    }

    #[test]
    fn test_video_js_has_stylesheet() {
        let bundle = VideoProvider::VideoJs.sdk().unwrap();
        assert_eq!(bundle.stylesheet_url.as_deref(), Some(VIDEO_JS_CSS_URL));
        assert_eq!(bundle.stylesheet_id(), "videojs-css");
    }

    #[test]
    fn test_provider_serde_names() {
        let json = serde_json::to_string(&VideoProvider::VideoJs).unwrap();
        assert_eq!(json, "\"video-js\"");
    }
}
