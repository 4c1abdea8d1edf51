//! Bundled asset serving for the `jetclock://` protocol.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Scheme name registered with wry.
pub const SCHEME: &str = "jetclock";

/// Serves files under a base directory.
///
/// `jetclock://localhost/icons/wifi.svg` resolves to
/// `{base_dir}/icons/wifi.svg`.
pub struct ContentProvider {
    base_dir: PathBuf,
    /// path -> (mime, data)
    overrides: HashMap<String, (String, Vec<u8>)>,
}

impl ContentProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Serve `data` at `path` without touching the filesystem.
    pub fn add_override(
        &mut self,
        path: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        self.overrides.insert(path.into(), (mime.into(), data.into()));
    }

    /// Resolve a request path to its MIME type and bytes.
    pub fn resolve(&self, path: &str) -> Option<(Cow<'_, str>, Cow<'_, [u8]>)> {
        let clean = path.split(['?', '#']).next().unwrap_or("").trim_start_matches('/');
        let clean = if clean.is_empty() { "index.html" } else { clean };

        if let Some((mime, data)) = self.overrides.get(clean) {
            return Some((Cow::Borrowed(mime.as_str()), Cow::Borrowed(data.as_slice())));
        }

        // Canonicalize both sides so `..` and symlinks cannot escape the base.
        let file_path = self.base_dir.join(clean);
        let canonical_base = std::fs::canonicalize(&self.base_dir).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) {
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        Some((Cow::Borrowed(mime_from_extension(&file_path)), Cow::Owned(data)))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Strip the scheme and host from a protocol request URI.
///
/// WebView2 rewrites `jetclock://localhost/x` to `http://jetclock.localhost/x`,
/// so both forms are accepted.
pub fn request_path(uri: &str) -> &str {
    uri.strip_prefix("jetclock://localhost/")
        .or_else(|| uri.strip_prefix("jetclock://localhost"))
        .or_else(|| uri.strip_prefix("http://jetclock.localhost/"))
        .or_else(|| uri.strip_prefix("jetclock:///"))
        .or_else(|| uri.strip_prefix("jetclock://"))
        .unwrap_or("")
}

fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("wasm") => "application/wasm",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
