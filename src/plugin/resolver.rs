//! Module and icon resolution.
//!
//! Plugin bundles come in several layouts (compiled `dist/` output or plain
//! sources, `.js` or `.ts`, a single `index` entry point or the legacy
//! `content`/`background` pair). Each lookup walks an explicit, ordered
//! [`CandidateList`] and the first hit wins.

use std::path::{Path, PathBuf};

use base64::Engine;
use tracing::{debug, trace, warn};

use super::locator::plugin_dirs;
use super::{PluginError, PluginLocator, PluginResult, ASSETS_DIR};

const DIST_DIR: &str = "dist";
const SOURCE_EXTENSIONS: [&str; 2] = ["js", "ts"];

/// Ordered relative paths to probe inside a plugin directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    paths: Vec<PathBuf>,
}

impl CandidateList {
    /// Single entry point: `dist/index.js`, `index.js`, `dist/index.ts`, `index.ts`.
    pub fn index() -> Self {
        Self { paths: source_layout("index") }
    }

    /// Index candidates followed by the same layout for `name`.
    pub fn module(name: &str) -> Self {
        let mut paths = source_layout("index");
        paths.extend(source_layout(name));
        Self { paths }
    }

    /// Legacy split module (`content` or `background`).
    pub fn legacy(stem: &str) -> Self {
        Self { paths: source_layout(stem) }
    }

    /// Icon reference as given, then `assets/<basename>`.
    pub fn icon(reference: &Path) -> Self {
        let mut paths = vec![reference.to_path_buf()];
        if let Some(base) = reference.file_name() {
            paths.push(Path::new(ASSETS_DIR).join(base));
        }
        Self { paths }
    }

    /// Relative paths in precedence order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// First candidate under `dir` that exists at all.
    pub fn first_existing(&self, dir: &Path) -> Option<PathBuf> {
        self.paths.iter().map(|p| dir.join(p)).find(|p| {
            trace!(path = %p.display(), "Checking candidate");
            p.exists()
        })
    }

    /// First candidate under `dir` that is a regular file.
    pub fn first_file(&self, dir: &Path) -> Option<PathBuf> {
        self.paths.iter().map(|p| dir.join(p)).find(|p| p.is_file())
    }
}

/// `dist/<stem>.js`, `<stem>.js`, `dist/<stem>.ts`, `<stem>.ts`.
fn source_layout(stem: &str) -> Vec<PathBuf> {
    SOURCE_EXTENSIONS
        .iter()
        .flat_map(|ext| {
            let file = format!("{stem}.{ext}");
            [Path::new(DIST_DIR).join(&file), PathBuf::from(file)]
        })
        .collect()
}

/// Finds and reads a plugin's entry-point source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleResolver;

impl ModuleResolver {
    /// Path of the first existing candidate for `module_name`.
    pub fn locate(&self, plugin_dir: &Path, module_name: &str) -> PluginResult<PathBuf> {
        CandidateList::module(module_name).first_existing(plugin_dir).ok_or_else(|| {
            debug!(dir = %plugin_dir.display(), module = module_name, "Module not found");
            PluginError::NotFound(plugin_dir.join(module_name))
        })
    }

    /// Source text of the first existing candidate.
    ///
    /// Only that candidate is read: if it is unreadable the call fails with
    /// a read error even when a later candidate would have worked.
    pub fn read(&self, plugin_dir: &Path, module_name: &str) -> PluginResult<String> {
        let path = self.locate(plugin_dir, module_name)?;
        let source = std::fs::read_to_string(&path)
            .map_err(|source| PluginError::Read { path: path.clone(), source })?;

        debug!(path = %path.display(), module = module_name, "Read module");
        Ok(source)
    }
}

/// Icon bytes plus the MIME type derived from the file they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconData {
    pub path: PathBuf,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl IconData {
    fn new(path: &Path, bytes: Vec<u8>) -> Self {
        Self { path: path.to_path_buf(), mime: mime_for_path(path), bytes }
    }

    /// `data:<mime>;base64,<content>`.
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime, encoded)
    }
}

/// Resolves icon references with a fallback to the built-in default icon.
#[derive(Debug, Clone)]
pub struct IconResolver {
    locator: PluginLocator,
    default_icon: PathBuf,
}

impl IconResolver {
    pub fn new(locator: PluginLocator, default_icon: impl Into<PathBuf>) -> Self {
        Self { locator, default_icon: default_icon.into() }
    }

    /// Resolve `reference` to icon bytes.
    ///
    /// Tries the literal path, then (for relative references) every plugin
    /// directory under every located root, then the default icon. Fails only
    /// when the default icon itself cannot be read.
    pub fn resolve(&self, reference: &str) -> PluginResult<IconData> {
        let path = Path::new(reference);
        if let Ok(bytes) = std::fs::read(path) {
            return Ok(IconData::new(path, bytes));
        }

        if path.is_relative() {
            debug!(reference, "Icon not readable directly, searching plugin directories");
            let candidates = CandidateList::icon(path);
            for root in self.locator.existing_roots() {
                for plugin_dir in plugin_dirs(&root) {
                    if let Some(icon) = read_first(&candidates, &plugin_dir) {
                        return Ok(icon);
                    }
                }
            }
        }

        self.read_default(reference)
    }

    /// Resolve `reference` against a single plugin directory only.
    pub fn resolve_in(&self, plugin_dir: &Path, reference: &str) -> PluginResult<IconData> {
        let path = Path::new(reference);
        let found = if path.is_absolute() {
            std::fs::read(path).ok().map(|bytes| IconData::new(path, bytes))
        } else {
            read_first(&CandidateList::icon(path), plugin_dir)
        };

        match found {
            Some(icon) => Ok(icon),
            None => self.read_default(reference),
        }
    }

    /// Data URL for `reference`.
    pub fn data_url(&self, reference: &str) -> PluginResult<String> {
        self.resolve(reference).map(|icon| icon.to_data_url())
    }

    fn read_default(&self, reference: &str) -> PluginResult<IconData> {
        warn!(reference, default = %self.default_icon.display(), "Icon unresolved, using default");
        let bytes = std::fs::read(&self.default_icon)
            .map_err(|e| PluginError::from_io(&self.default_icon, e))?;
        Ok(IconData::new(&self.default_icon, bytes))
    }
}

fn read_first(candidates: &CandidateList, dir: &Path) -> Option<IconData> {
    candidates.paths().iter().map(|p| dir.join(p)).find_map(|p| {
        trace!(path = %p.display(), "Trying icon path");
        std::fs::read(&p).ok().map(|bytes| IconData::new(&p, bytes))
    })
}

/// MIME type for an icon file, by extension. Unknown extensions are PNG.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}

/// `file://` URL for an existing icon.
pub fn icon_file_url(path: &Path) -> PluginResult<String> {
    let absolute = std::fs::canonicalize(path).map_err(|e| PluginError::from_io(path, e))?;
    Ok(format!("file://{}", absolute.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_index_candidate_order() {
        let expected: Vec<PathBuf> = ["dist/index.js", "index.js", "dist/index.ts", "index.ts"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(CandidateList::index().paths(), expected.as_slice());
    }

    #[test]
    fn test_module_candidates_append_named_layout() {
        let list = CandidateList::module("content");
        let tail: Vec<_> = list.paths()[4..].iter().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(tail, ["dist/content.js", "content.js", "dist/content.ts", "content.ts"]);
    }

    #[test]
    fn test_icon_candidates() {
        let list = CandidateList::icon(Path::new("images/cat.png"));
        assert_eq!(list.paths(), [PathBuf::from("images/cat.png"), PathBuf::from("assets/cat.png")]);
    }

    #[test]
    fn test_module_precedence_dist_js_over_root_ts() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("dist/index.js"), "compiled");
        write(&temp.path().join("index.ts"), "source");

        let source = ModuleResolver.read(temp.path(), "content").unwrap();
        assert_eq!(source, "compiled");
    }

    #[test]
    fn test_module_falls_back_to_named_module() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("background.ts"), "bg");

        let source = ModuleResolver.read(temp.path(), "background").unwrap();
        assert_eq!(source, "bg");
    }

    #[test]
    fn test_module_not_found() {
        let temp = TempDir::new().unwrap();
        let result = ModuleResolver.read(temp.path(), "content");
        assert!(matches!(result, Err(PluginError::NotFound(_))));
    }

    #[test]
    fn test_unreadable_first_candidate_is_read_error() {
        let temp = TempDir::new().unwrap();
        // A directory where the file should be exists but cannot be read as text.
        std::fs::create_dir_all(temp.path().join("dist/index.js")).unwrap();
        write(&temp.path().join("index.js"), "never consulted");

        let result = ModuleResolver.read(temp.path(), "content");
        assert!(matches!(result, Err(PluginError::Read { .. })));
    }

    #[test]
    fn test_mime_mapping() {
        assert_eq!(mime_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.gif")), "image/gif");
        assert_eq!(mime_for_path(Path::new("a.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(mime_for_path(Path::new("a.bmp")), "image/png");
        assert_eq!(mime_for_path(Path::new("noext")), "image/png");
    }

    #[test]
    fn test_icon_found_in_plugin_assets() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("plugins");
        write(&root.join("cat/assets/cat.svg"), "<svg/>");

        let resolver =
            IconResolver::new(PluginLocator::new(vec![root]), temp.path().join("default.png"));
        let icon = resolver.resolve("images/cat.svg").unwrap();

        assert_eq!(icon.mime, "image/svg+xml");
        assert_eq!(icon.bytes, b"<svg/>");
        assert_eq!(icon.to_data_url(), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[test]
    fn test_unresolvable_icon_uses_default_png() {
        let temp = TempDir::new().unwrap();
        let default = temp.path().join("ghost.png");
        write(&default, "PNG");

        let resolver = IconResolver::new(PluginLocator::new(vec![]), &default);
        let icon = resolver.resolve("missing/icon.svg").unwrap();

        assert_eq!(icon.mime, "image/png");
        assert_eq!(icon.bytes, b"PNG");
    }

    #[test]
    fn test_missing_default_icon_fails() {
        let temp = TempDir::new().unwrap();
        let resolver = IconResolver::new(PluginLocator::new(vec![]), temp.path().join("none.png"));
        assert!(resolver.data_url("missing.png").is_err());
    }

    #[test]
    fn test_resolve_in_is_scoped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("plugins");
        write(&root.join("dog/assets/icon.png"), "dog");
        std::fs::create_dir_all(root.join("cat")).unwrap();
        let default = temp.path().join("ghost.png");
        write(&default, "default");

        let resolver = IconResolver::new(PluginLocator::new(vec![root.clone()]), &default);
        let icon = resolver.resolve_in(&root.join("cat"), "icon.png").unwrap();
        assert_eq!(icon.bytes, b"default");
    }

    #[test]
    fn test_icon_file_url() {
        let temp = TempDir::new().unwrap();
        let icon = temp.path().join("icon.png");
        write(&icon, "x");

        let url = icon_file_url(&icon).unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("icon.png"));
        assert!(icon_file_url(&temp.path().join("none.png")).unwrap_err().is_not_found());
    }
}
