//! CLI command implementations

pub mod all;
pub mod blur;
pub mod info;
pub mod transform;

use anyhow::{Context, Result};
use pixfork_core::Image;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Image> {
    pixfork_io::load(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &Image) -> Result<()> {
    pixfork_io::save(image, path).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Runs `op`, logging its wall time at info level.
pub fn timed<T>(name: &str, op: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = op();
    let elapsed = start.elapsed();
    info!(op = name, seconds = elapsed.as_secs_f64(), "Transform finished");
    (out, elapsed)
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfork_core::Rgb;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ppm");
        let err = load_image(&path).unwrap_err();
        assert!(err.to_string().contains("missing.ppm"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ppm");
        let img = Image::filled(3, 2, 255, Rgb::new(1, 2, 3)).unwrap();
        save_image(&path, &img).unwrap();
        assert_eq!(load_image(&path).unwrap(), img);
    }
}
