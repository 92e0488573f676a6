//! Icon resolution and caching.
//!
//! Tile icons are resolved once per target and cached as raw RGBA files under
//! the icons directory, so rendering never needs an image decoder. Resolution
//! tries, in order: an explicit icon override, the target itself when it is an
//! image, a sidecar image next to the target, icon extraction from the
//! executable via external tools, and finally a rendered text placeholder.
//! Every step degrades quietly; a shortcut without an icon still gets a tile.

use crate::config::IconConfig;
use crate::error::{LaunchgridError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Cache file header magic.
const CACHE_MAGIC: &[u8; 4] = b"LGIC";

/// Extensions treated as directly convertible images.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "ico"];

/// A decoded icon, ready for upload as a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

/// Resolves shortcut targets to cached icon files.
pub struct IconResolver {
    icons_dir: PathBuf,
}

impl IconResolver {
    pub fn new(icons_dir: impl Into<PathBuf>) -> Self {
        Self {
            icons_dir: icons_dir.into(),
        }
    }

    /// The cache file a target resolves to, whether or not it exists yet.
    pub fn cache_path_for(&self, target: &Path) -> PathBuf {
        let hash = stable_hash64(target.to_string_lossy().as_bytes());
        self.icons_dir.join(format!("{:016x}.rgba", hash))
    }

    /// Resolve an icon for a shortcut, returning the cache file path.
    ///
    /// Returns `None` only when every strategy, including the placeholder,
    /// failed; callers then render a text-only tile.
    pub fn resolve(&self, name: &str, target: &Path, icon_override: Option<&Path>) -> Option<PathBuf> {
        let cache_path = self.cache_path_for(target);
        if cache_path.exists() {
            return Some(cache_path);
        }

        if let Err(e) = std::fs::create_dir_all(&self.icons_dir) {
            warn!("Cannot create icons dir {:?}: {}", self.icons_dir, e);
            return None;
        }

        let sources = [
            icon_override.filter(|p| p.exists()).map(Path::to_path_buf),
            Some(target.to_path_buf()).filter(|p| is_image_file(p)),
            sidecar_image(target),
        ];
        for source in sources.into_iter().flatten() {
            if convert_image(&source, &cache_path).is_ok() {
                debug!("Resolved icon for {:?} from {:?}", target, source);
                return Some(cache_path);
            }
        }

        if extract_executable_icon(target, &cache_path).is_ok() {
            debug!("Extracted icon for {:?}", target);
            return Some(cache_path);
        }

        match render_placeholder(name, &cache_path) {
            Ok(()) => {
                debug!("Rendered placeholder icon for {:?}", target);
                Some(cache_path)
            }
            Err(e) => {
                warn!("No icon for {:?}: {}", target, e);
                None
            }
        }
    }

    /// Drop a cached icon so the next resolve recomputes it.
    pub fn invalidate(&self, target: &Path) {
        let cache_path = self.cache_path_for(target);
        if cache_path.exists() {
            if let Err(e) = std::fs::remove_file(&cache_path) {
                warn!("Failed to invalidate icon cache {:?}: {}", cache_path, e);
            }
        }
    }
}

/// Load a cached icon file.
pub fn load_cached(cache_path: &Path) -> Result<IconImage> {
    let bytes = std::fs::read(cache_path)
        .map_err(|e| LaunchgridError::io_with_path(e, cache_path))?;
    if bytes.len() < 16 || &bytes[0..4] != CACHE_MAGIC {
        return Err(LaunchgridError::Other(format!(
            "Not an icon cache file: {:?}",
            cache_path
        )));
    }

    let width = u32::from_le_bytes(bytes[4..8].try_into().unwrap_or_default());
    let height = u32::from_le_bytes(bytes[8..12].try_into().unwrap_or_default());
    let len = u32::from_le_bytes(bytes[12..16].try_into().unwrap_or_default()) as usize;

    if len != (width as usize) * (height as usize) * 4 || bytes.len() != 16 + len {
        return Err(LaunchgridError::Other(format!(
            "Corrupt icon cache file: {:?}",
            cache_path
        )));
    }

    Ok(IconImage {
        width,
        height,
        rgba: bytes[16..].to_vec(),
    })
}

/// Write an icon into the cache format.
pub fn write_cached(cache_path: &Path, image: &IconImage) -> Result<()> {
    let expected = (image.width as usize) * (image.height as usize) * 4;
    if image.rgba.len() != expected {
        return Err(LaunchgridError::Other(format!(
            "Icon buffer is {} bytes, expected {}",
            image.rgba.len(),
            expected
        )));
    }

    let mut bytes = Vec::with_capacity(16 + image.rgba.len());
    bytes.extend_from_slice(CACHE_MAGIC);
    bytes.extend_from_slice(&image.width.to_le_bytes());
    bytes.extend_from_slice(&image.height.to_le_bytes());
    bytes.extend_from_slice(&(image.rgba.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&image.rgba);

    std::fs::write(cache_path, bytes)
        .map_err(|e| LaunchgridError::io_with_path(e, cache_path))
}

/// FNV-1a, used for stable cache file names across runs.
fn stable_hash64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
        && path.is_file()
}

/// An image named like the target sitting next to it, e.g. `tool.png` beside
/// `tool.exe`.
fn sidecar_image(target: &Path) -> Option<PathBuf> {
    for ext in IMAGE_EXTENSIONS {
        let candidate = target.with_extension(ext);
        if candidate != target && candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Run ImageMagick to turn an arbitrary image into the cache format.
fn convert_image(source: &Path, cache_path: &Path) -> Result<()> {
    let side = IconConfig::ICON_SIDE;
    let tmp = cache_path.with_extension("rgba.tmp");

    // `[0]` picks the first frame of multi-frame formats like .ico.
    let output = Command::new("convert")
        .arg(format!("{}[0]", source.display()))
        .arg("-resize")
        .arg(format!("{}x{}!", side, side))
        .arg("-depth")
        .arg("8")
        .arg(format!("rgba:{}", tmp.display()))
        .output()
        .map_err(|e| LaunchgridError::Other(format!("convert not available: {}", e)))?;

    if !output.status.success() {
        let _ = std::fs::remove_file(&tmp);
        return Err(LaunchgridError::Other(format!(
            "convert failed for {:?}: {}",
            source,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let rgba = std::fs::read(&tmp).map_err(|e| LaunchgridError::io_with_path(e, &tmp))?;
    let _ = std::fs::remove_file(&tmp);

    write_cached(
        cache_path,
        &IconImage {
            width: side,
            height: side,
            rgba,
        },
    )
}

/// Pull the embedded icon out of an executable.
#[cfg(target_os = "windows")]
fn extract_executable_icon(target: &Path, cache_path: &Path) -> Result<()> {
    let tmp_png = cache_path.with_extension("extract.png");
    let script = format!(
        "Add-Type -AssemblyName System.Drawing; \
         $icon = [System.Drawing.Icon]::ExtractAssociatedIcon('{}'); \
         $icon.ToBitmap().Save('{}', [System.Drawing.Imaging.ImageFormat]::Png)",
        target.display(),
        tmp_png.display()
    );
    let output = Command::new("powershell")
        .arg("-NoProfile")
        .arg("-Command")
        .arg(script)
        .output()
        .map_err(|e| LaunchgridError::Other(format!("powershell not available: {}", e)))?;

    if !output.status.success() || !tmp_png.exists() {
        let _ = std::fs::remove_file(&tmp_png);
        return Err(LaunchgridError::Other(format!(
            "Icon extraction failed for {:?}",
            target
        )));
    }

    let result = convert_image(&tmp_png, cache_path);
    let _ = std::fs::remove_file(&tmp_png);
    result
}

/// Pull the embedded icon out of a PE executable with wrestool.
#[cfg(not(target_os = "windows"))]
fn extract_executable_icon(target: &Path, cache_path: &Path) -> Result<()> {
    let tmp_ico = cache_path.with_extension("extract.ico");
    let output = Command::new("wrestool")
        .arg("-x")
        .arg("-t14")
        .arg("-o")
        .arg(&tmp_ico)
        .arg(target)
        .output()
        .map_err(|e| LaunchgridError::Other(format!("wrestool not available: {}", e)))?;

    if !output.status.success() || !tmp_ico.exists() {
        let _ = std::fs::remove_file(&tmp_ico);
        return Err(LaunchgridError::Other(format!(
            "Icon extraction failed for {:?}",
            target
        )));
    }

    let result = convert_image(&tmp_ico, cache_path);
    let _ = std::fs::remove_file(&tmp_ico);
    result
}

/// Render a lettered tile as the last resort.
fn render_placeholder(name: &str, cache_path: &Path) -> Result<()> {
    let side = IconConfig::ICON_SIDE;
    let tmp = cache_path.with_extension("rgba.tmp");
    let label = placeholder_label(name);

    let output = Command::new("convert")
        .arg("-size")
        .arg(format!("{}x{}", side, side))
        .arg("-background")
        .arg("#3b4252")
        .arg("-fill")
        .arg("white")
        .arg("-gravity")
        .arg("center")
        .arg(format!("label:{}", label))
        .arg("-depth")
        .arg("8")
        .arg(format!("rgba:{}", tmp.display()))
        .output()
        .map_err(|e| LaunchgridError::Other(format!("convert not available: {}", e)))?;

    if !output.status.success() {
        let _ = std::fs::remove_file(&tmp);
        return Err(LaunchgridError::Other(format!(
            "Placeholder render failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let rgba = std::fs::read(&tmp).map_err(|e| LaunchgridError::io_with_path(e, &tmp))?;
    let _ = std::fs::remove_file(&tmp);

    write_cached(
        cache_path,
        &IconImage {
            width: side,
            height: side,
            rgba,
        },
    )
}

/// Up to the first two characters of the name, uppercased where possible.
fn placeholder_label(name: &str) -> String {
    let label: String = name.trim().chars().take(2).collect();
    if label.is_empty() {
        "?".to_string()
    } else {
        label.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cache_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("icon.rgba");
        let image = IconImage {
            width: 2,
            height: 2,
            rgba: vec![255; 16],
        };

        write_cached(&path, &image).unwrap();
        let loaded = load_cached(&path).unwrap();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_cache_rejects_wrong_buffer_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("icon.rgba");
        let image = IconImage {
            width: 2,
            height: 2,
            rgba: vec![255; 7],
        };
        assert!(write_cached(&path, &image).is_err());
    }

    #[test]
    fn test_load_rejects_foreign_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("junk.rgba");
        std::fs::write(&path, b"this is not an icon").unwrap();
        assert!(load_cached(&path).is_err());
    }

    #[test]
    fn test_cache_path_is_stable() {
        let resolver = IconResolver::new("/tmp/icons");
        let a = resolver.cache_path_for(Path::new("/usr/bin/tool"));
        let b = resolver.cache_path_for(Path::new("/usr/bin/tool"));
        let c = resolver.cache_path_for(Path::new("/usr/bin/other"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.extension().unwrap(), "rgba");
    }

    #[test]
    fn test_resolve_reuses_existing_cache() {
        let temp = TempDir::new().unwrap();
        let resolver = IconResolver::new(temp.path());
        let target = Path::new("/usr/bin/tool");

        // Pre-seed the cache; resolve must return it without any tooling.
        let cache_path = resolver.cache_path_for(target);
        write_cached(
            &cache_path,
            &IconImage {
                width: 1,
                height: 1,
                rgba: vec![0, 0, 0, 255],
            },
        )
        .unwrap();

        assert_eq!(resolver.resolve("tool", target, None), Some(cache_path));
    }

    #[test]
    fn test_invalidate_removes_cache() {
        let temp = TempDir::new().unwrap();
        let resolver = IconResolver::new(temp.path());
        let target = Path::new("/usr/bin/tool");
        let cache_path = resolver.cache_path_for(target);
        write_cached(
            &cache_path,
            &IconImage {
                width: 1,
                height: 1,
                rgba: vec![0; 4],
            },
        )
        .unwrap();

        resolver.invalidate(target);
        assert!(!cache_path.exists());
    }

    #[test]
    fn test_sidecar_lookup() {
        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("tool.exe");
        let png = temp.path().join("tool.png");
        std::fs::write(&exe, b"MZ").unwrap();
        assert!(sidecar_image(&exe).is_none());

        std::fs::write(&png, b"png").unwrap();
        assert_eq!(sidecar_image(&exe), Some(png));
    }

    #[test]
    fn test_placeholder_label() {
        assert_eq!(placeholder_label("notepad"), "NO");
        assert_eq!(placeholder_label(" x "), "X");
        assert_eq!(placeholder_label(""), "?");
        assert_eq!(placeholder_label("微信"), "微信");
    }
}
