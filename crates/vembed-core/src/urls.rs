//! Playback URL builders for hosted video providers

use crate::Result;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

pub const DEFAULT_ID_PREFIX: &str = "video";
pub const MUX_STREAM_DOMAIN: &str = "stream.mux.com";
pub const MUX_IMAGE_DOMAIN: &str = "image.mux.com";

/// Generate a unique element id: `{prefix}-{9 base36 chars}`
pub fn generate_id(prefix: Option<&str>) -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        suffix.push(ID_ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    format!("{}-{}", prefix.unwrap_or(DEFAULT_ID_PREFIX), suffix)
}

// =============================================================================
// Cloudinary
// =============================================================================

/// Cloudinary delivery transformation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CloudinaryTransformation {
    pub quality: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub crop: Option<String>,
    pub gravity: Option<String>,
    pub effect: Option<String>,
    pub overlay: Option<String>,
    pub start_offset: Option<String>,
    pub end_offset: Option<String>,
    pub duration: Option<String>,
    pub format: Option<String>,
    /// Extra `key_value` parameters, emitted after the named ones in order
    pub custom: Vec<(String, String)>,
}

impl CloudinaryTransformation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a custom parameter
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.custom.push((key.into(), value.to_string()));
        self
    }

    /// Comma-joined transformation segment, `None` when nothing is set
    pub fn to_segment(&self) -> Option<String> {
        let named = [
            ("q", self.quality.clone()),
            ("w", self.width.filter(|w| *w > 0).map(|w| w.to_string())),
            ("h", self.height.filter(|h| *h > 0).map(|h| h.to_string())),
            ("c", self.crop.clone()),
            ("g", self.gravity.clone()),
            ("e", self.effect.clone()),
            ("l", self.overlay.clone()),
            ("so", self.start_offset.clone()),
            ("eo", self.end_offset.clone()),
            ("du", self.duration.clone()),
            ("f", self.format.clone()),
        ];

        let parts: Vec<String> = named
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| format!("{key}_{v}")))
            .chain(self.custom.iter().map(|(key, value)| format!("{key}_{value}")))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(","))
        }
    }
}

/// Build a Cloudinary video delivery URL
pub fn build_cloudinary_url(
    cloud_name: &str,
    public_id: &str,
    transformation: Option<&CloudinaryTransformation>,
    secure: bool,
) -> Result<Url> {
    let protocol = if secure { "https" } else { "http" };
    let base = format!("{protocol}://res.cloudinary.com/{cloud_name}/video/upload");

    let url = match transformation.and_then(CloudinaryTransformation::to_segment) {
        Some(segment) => format!("{base}/{segment}/{public_id}"),
        None => format!("{base}/{public_id}"),
    };
    Ok(Url::parse(&url)?)
}

// =============================================================================
// Mux
// =============================================================================

/// Options for Mux playback URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MuxUrlOptions {
    /// Signed playback token
    pub token: Option<String>,
    pub max_resolution: Option<String>,
    pub min_resolution: Option<String>,
    /// Replaces `stream.mux.com`
    pub custom_domain: Option<String>,
}

/// Build a Mux HLS playback URL
pub fn build_mux_url(playback_id: &str, options: Option<&MuxUrlOptions>) -> Result<Url> {
    let defaults = MuxUrlOptions::default();
    let options = options.unwrap_or(&defaults);
    let domain = options
        .custom_domain
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(MUX_STREAM_DOMAIN);

    let mut url = Url::parse(&format!("https://{domain}/{playback_id}.m3u8"))?;

    let params: Vec<(&str, &str)> = [
        ("token", options.token.as_deref()),
        ("max_resolution", options.max_resolution.as_deref()),
        ("min_resolution", options.min_resolution.as_deref()),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
    .collect();

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

/// Build a Mux poster image URL
pub fn build_mux_thumbnail_url(
    playback_id: &str,
    time: Option<f64>,
    token: Option<&str>,
) -> Result<Url> {
    let mut url = Url::parse(&format!(
        "https://{MUX_IMAGE_DOMAIN}/{playback_id}/thumbnail.jpg"
    ))?;
    // Signed thumbnails carry their parameters inside the token
    match token {
        Some(token) => {
            url.query_pairs_mut().append_pair("token", token);
        }
        None => {
            if let Some(time) = time {
                url.query_pairs_mut().append_pair("time", &time.to_string());
            }
        }
    }
    Ok(url)
}

// =============================================================================
// Cloudflare Stream
// =============================================================================

/// Options for Cloudflare Stream URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CloudflareUrlOptions {
    /// Pre-signed manifest URL; used verbatim when present
    pub signed_url: Option<String>,
}

/// Build a Cloudflare Stream HLS manifest URL.
///
/// A signed URL is returned exactly as given.
pub fn build_cloudflare_stream_url(
    account_id: &str,
    video_id: &str,
    options: Option<&CloudflareUrlOptions>,
) -> Result<String> {
    if let Some(signed) = options.and_then(|o| o.signed_url.as_deref()) {
        return Ok(signed.to_string());
    }
    let url = Url::parse(&format!(
        "https://customer-{account_id}.cloudflarestream.com/{video_id}/manifest/video.m3u8"
    ))?;
    Ok(url.into())
}

/// Build a Cloudflare Stream poster image URL
pub fn build_cloudflare_thumbnail_url(
    account_id: &str,
    video_id: &str,
    time: Option<f64>,
) -> Result<Url> {
    let mut url = Url::parse(&format!(
        "https://customer-{account_id}.cloudflarestream.com/{video_id}/thumbnails/thumbnail.jpg"
    ))?;
    if let Some(time) = time {
        url.query_pairs_mut().append_pair("time", &format!("{time}s"));
    }
    Ok(url)
}
