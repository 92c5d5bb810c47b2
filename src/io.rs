use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use image::imageops::FilterType;
use tracing::{debug, info};

use forkpix_core::PixelBuffer;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif"];

pub fn is_supported_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

/// Parse a `WIDTHxHEIGHT` size such as `640x480`.
pub fn parse_size(text: &str) -> Result<(u32, u32)> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .with_context(|| format!("size {text:?} is not WIDTHxHEIGHT"))?;
    let w: u32 = w.trim().parse().with_context(|| format!("bad width in {text:?}"))?;
    let h: u32 = h.trim().parse().with_context(|| format!("bad height in {text:?}"))?;
    if w == 0 || h == 0 {
        bail!("size {text:?} must be non-zero");
    }
    Ok((w, h))
}

/// Decode an image file into a packed ARGB buffer, optionally resized to
/// exactly `size`.
pub fn load_image(path: &Path, size: Option<(u32, u32)>) -> Result<PixelBuffer> {
    info!(?path, "loading image file");
    let t0 = std::time::Instant::now();

    let img =
        image::open(path).with_context(|| format!("failed to open image: {}", path.display()))?;
    debug!(
        elapsed_ms = t0.elapsed().as_millis(),
        width = img.width(),
        height = img.height(),
        "image decode"
    );

    let img = match size {
        Some((w, h)) if (w, h) != (img.width(), img.height()) => {
            let resized = img.resize_exact(w, h, FilterType::Triangle);
            debug!(width = w, height = h, "resized");
            resized
        }
        _ => img,
    };

    Ok(PixelBuffer::from_rgba_image(&img.into_rgba8()))
}

/// Load every supported image in `dir`, sorted by file name, as one frame
/// batch.
pub fn load_frames(dir: &Path, size: Option<(u32, u32)>) -> Result<Vec<PixelBuffer>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read frame directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(is_supported_extension)
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("no image frames found in {}", dir.display());
    }
    info!(frames = paths.len(), ?dir, "loading frames");
    paths.iter().map(|p| load_image(p, size)).collect()
}

pub fn save_png(buf: &PixelBuffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }
    let img = buf.to_rgba_image()?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write image: {}", path.display()))?;
    debug!(?path, "saved image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        PixelBuffer::from_pixels(
            3,
            2,
            vec![
                0xff_ff_00_00,
                0xff_00_ff_00,
                0xff_00_00_ff,
                0x80_10_20_30,
                0xff_ff_ff_ff,
                0x00_00_00_00,
            ],
        )
        .unwrap()
    }

    #[test]
    fn extension_detection() {
        assert!(is_supported_extension("PNG"));
        assert!(is_supported_extension("jpeg"));
        assert!(!is_supported_extension("mp4"));
    }

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("640x480").unwrap(), (640, 480));
        assert_eq!(parse_size("10X20").unwrap(), (10, 20));
        assert!(parse_size("640").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn png_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/sample.png");
        let buf = sample();
        save_png(&buf, &path).unwrap();
        assert!(path.exists());

        let loaded = load_image(&path, None).unwrap();
        assert_eq!(loaded, buf);
    }

    #[test]
    fn load_with_resize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        save_png(&sample(), &path).unwrap();
        let loaded = load_image(&path, Some((6, 4))).unwrap();
        assert_eq!((loaded.width, loaded.height), (6, 4));
        assert_eq!(loaded.pixels.len(), 24);
    }

    #[test]
    fn frames_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = PixelBuffer::from_pixels(1, 1, vec![0xff_01_01_01]).unwrap();
        let b = PixelBuffer::from_pixels(1, 1, vec![0xff_02_02_02]).unwrap();
        save_png(&b, &dir.path().join("frame_002.png")).unwrap();
        save_png(&a, &dir.path().join("frame_001.png")).unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let frames = load_frames(dir.path(), None).unwrap();
        assert_eq!(frames, vec![a, b]);
    }

    #[test]
    fn empty_frame_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_frames(dir.path(), None).is_err());
    }
}
