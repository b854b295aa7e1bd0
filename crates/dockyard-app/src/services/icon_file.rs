// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Icon image picker — turns an image file into an embedded data-URL icon.

use std::path::Path;

use dockyard_core::error::{DockyardError, Result};
use dockyard_core::icon::ServiceIcon;
use image::ImageFormat;

/// Raster formats accepted as icons.
const ACCEPTED: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Ico,
    ImageFormat::Bmp,
];

/// Larger files bloat `services.json`, which embeds the data URL.
const MAX_ICON_BYTES: usize = 512 * 1024;

/// MIME type of an icon file, sniffed from its bytes. SVG has no magic
/// number, so it is recognised by extension.
pub fn mime_type(path: &Path, bytes: &[u8]) -> Result<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        if ACCEPTED.contains(&format) {
            return Ok(format.to_mime_type());
        }
        return Err(DockyardError::UnsupportedIcon(format!("{format:?}")));
    }
    let is_svg = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        return Ok("image/svg+xml");
    }
    Err(DockyardError::UnsupportedIcon("unrecognised image data".into()))
}

pub fn icon_from_bytes(path: &Path, bytes: &[u8]) -> Result<ServiceIcon> {
    if bytes.len() > MAX_ICON_BYTES {
        return Err(DockyardError::UnsupportedIcon(format!(
            "{} KiB is larger than {} KiB",
            bytes.len() / 1024,
            MAX_ICON_BYTES / 1024
        )));
    }
    let mime = mime_type(path, bytes)?;
    Ok(ServiceIcon::from_image_bytes(mime, bytes))
}

pub fn icon_from_file(path: &Path) -> Result<ServiceIcon> {
    let bytes = std::fs::read(path)?;
    let icon = icon_from_bytes(path, &bytes)?;
    tracing::info!(file = %path.display(), bytes = bytes.len(), "icon image loaded");
    Ok(icon)
}

/// Show the native file picker. `None` when the user cancelled.
pub fn pick_icon() -> Option<Result<ServiceIcon>> {
    let path = rfd::FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "ico", "bmp", "svg"])
        .pick_file()?;
    Some(icon_from_file(&path))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn png_bytes_become_png_data_url() {
        let icon = icon_from_bytes(Path::new("x.bin"), PNG_MAGIC).expect("png");
        assert!(icon.is_image());
        assert!(icon.as_str().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn svg_is_recognised_by_extension() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"/>"#;
        let icon = icon_from_bytes(Path::new("logo.SVG"), svg).expect("svg");
        assert!(icon.as_str().starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn text_file_is_rejected() {
        let err = icon_from_bytes(Path::new("notes.txt"), b"hello").unwrap_err();
        assert!(matches!(err, DockyardError::UnsupportedIcon(_)));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let mut big = PNG_MAGIC.to_vec();
        big.resize(MAX_ICON_BYTES + 1, 0);
        assert!(icon_from_bytes(Path::new("big.png"), &big).is_err());
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("icon.png");
        std::fs::write(&path, PNG_MAGIC).expect("write");
        assert!(icon_from_file(&path).expect("load").is_image());
    }
}
