//! CLI command implementations

use crate::output::{format_output, OutputFormat};
use anyhow::{anyhow, Context};
use serde::Serialize;
use std::path::Path;
use tracing::debug;
use vembed_core::{
    build_cloudflare_stream_url, build_cloudflare_thumbnail_url, build_cloudinary_url,
    build_mux_thumbnail_url, build_mux_url, generate_id, CloudflareUrlOptions,
    CloudinaryTransformation, LoaderConfig, MuxUrlOptions, SdkBundle, VideoProvider,
};

#[derive(Serialize)]
struct PlaybackUrls {
    playback: String,
    thumbnail: Option<String>,
}

/// Build a Cloudinary delivery URL
pub fn cloudinary_url(
    cloud_name: &str,
    public_id: &str,
    params: &[String],
    insecure: bool,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let mut transformation = CloudinaryTransformation::new();
    for param in params {
        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| anyhow!("transformation must be key=value, got '{param}'"))?;
        transformation = apply_cloudinary_param(transformation, key, value)?;
    }
    debug!(?transformation, "Cloudinary transformation");

    let url = build_cloudinary_url(cloud_name, public_id, Some(&transformation), !insecure)?;
    Ok(format_output(
        &PlaybackUrls {
            playback: url.to_string(),
            thumbnail: None,
        },
        format,
    ))
}

fn apply_cloudinary_param(
    mut t: CloudinaryTransformation,
    key: &str,
    value: &str,
) -> anyhow::Result<CloudinaryTransformation> {
    let value = value.to_string();
    match key {
        "quality" => t.quality = Some(value),
        "width" => t.width = Some(value.parse().context("width must be an integer")?),
        "height" => t.height = Some(value.parse().context("height must be an integer")?),
        "crop" => t.crop = Some(value),
        "gravity" => t.gravity = Some(value),
        "effect" => t.effect = Some(value),
        "overlay" => t.overlay = Some(value),
        "start_offset" => t.start_offset = Some(value),
        "end_offset" => t.end_offset = Some(value),
        "duration" => t.duration = Some(value),
        "format" => t.format = Some(value),
        other => return Ok(t.with(other, value)),
    }
    Ok(t)
}

/// Build Mux playback and poster URLs
pub fn mux_url(
    playback_id: &str,
    options: &MuxUrlOptions,
    thumbnail_time: Option<f64>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let playback = build_mux_url(playback_id, Some(options))?;
    let thumbnail = build_mux_thumbnail_url(playback_id, thumbnail_time, None)?;
    Ok(format_output(
        &PlaybackUrls {
            playback: playback.to_string(),
            thumbnail: Some(thumbnail.to_string()),
        },
        format,
    ))
}

/// Build Cloudflare Stream manifest and poster URLs
pub fn cloudflare_url(
    account_id: &str,
    video_id: &str,
    signed_url: Option<String>,
    thumbnail_time: Option<f64>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let options = CloudflareUrlOptions { signed_url };
    let playback = build_cloudflare_stream_url(account_id, video_id, Some(&options))?;
    let thumbnail = build_cloudflare_thumbnail_url(account_id, video_id, thumbnail_time)?;
    Ok(format_output(
        &PlaybackUrls {
            playback: playback.to_string(),
            thumbnail: Some(thumbnail.to_string()),
        },
        format,
    ))
}

/// Generate element ids
pub fn ids(prefix: Option<&str>, count: usize) -> String {
    (0..count)
        .map(|_| generate_id(prefix))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Show the SDK bundle for a provider
pub fn sdk(provider: &str, library_url: Option<String>, format: OutputFormat) -> anyhow::Result<String> {
    let provider: VideoProvider = provider.parse().map_err(|e: String| anyhow!(e))?;
    let bundle = match (provider, library_url) {
        (VideoProvider::JwPlayer, Some(url)) => SdkBundle::jw_player(url),
        (VideoProvider::JwPlayer, None) => {
            return Err(anyhow!("jw-player needs --library-url (cloud-hosted library)"))
        }
        (other, _) => other
            .sdk()
            .ok_or_else(|| anyhow!("{other} players do not load an SDK"))?,
    };
    Ok(format_output(&bundle, format))
}

/// List providers and their globals
pub fn providers() -> String {
    VideoProvider::ALL
        .iter()
        .map(|provider| {
            let global = match provider {
                VideoProvider::JwPlayer => "jwplayer".to_string(),
                other => other
                    .sdk()
                    .map(|bundle| bundle.global)
                    .unwrap_or_else(|| "-".to_string()),
            };
            format!("{:<12} {}", provider.as_str(), global)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate a loader config file and print it with defaults filled in
pub fn check_config(path: &Path, format: OutputFormat) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = LoaderConfig::from_json(&raw)?;
    Ok(format_output(&config, format))
}
