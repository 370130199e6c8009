//! Icon loading for tray application

use anyhow::{Context, Result};
use image::GenericImageView;
use std::path::{Path, PathBuf};
use tracing::debug;
use tray_icon::Icon;

/// Bundled icon, looked up next to the executable and in the working directory
const ASSET_ICON: &str = "assets/icons/tray.png";

/// Side length of the generated fallback icon
const FALLBACK_SIZE: u32 = 32;

/// Load the tray icon
///
/// An explicitly configured icon must load. Otherwise the bundled asset is
/// used when present, and a generated icon when not.
pub fn load_tray_icon(configured: Option<&Path>) -> Result<Icon> {
    if let Some(path) = configured {
        return load_icon_from_file(path);
    }

    match find_asset(ASSET_ICON) {
        Some(path) => load_icon_from_file(&path),
        None => {
            debug!("No tray icon asset found, using generated icon");
            Ok(Icon::from_rgba(
                circle_rgba(FALLBACK_SIZE),
                FALLBACK_SIZE,
                FALLBACK_SIZE,
            )?)
        }
    }
}

/// Get asset path relative to executable
///
/// Searches in order:
/// 1. Executable directory (installed)
/// 2. Current working directory (development)
fn find_asset(relative_path: &str) -> Option<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let cwd = std::env::current_dir().ok();

    exe_dir
        .into_iter()
        .chain(cwd)
        .map(|dir| dir.join(relative_path))
        .find(|path| path.exists())
}

/// Load icon from an image file
fn load_icon_from_file(path: &Path) -> Result<Icon> {
    let img =
        image::open(path).with_context(|| format!("Failed to load icon: {:?}", path))?;
    let (width, height) = img.dimensions();
    let rgba = img.into_rgba8().into_raw();
    Ok(Icon::from_rgba(rgba, width, height)?)
}

/// Filled amber circle on a transparent background
fn circle_rgba(size: u32) -> Vec<u8> {
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 1.0;

    (0..size * size)
        .flat_map(|i| {
            let dx = (i % size) as f32 - center;
            let dy = (i / size) as f32 - center;
            if dx * dx + dy * dy <= radius * radius {
                [0xF5, 0xB0, 0x2E, 0xFF]
            } else {
                [0, 0, 0, 0]
            }
        })
        .collect()
}
