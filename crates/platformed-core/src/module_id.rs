//! Module id naming: the `.platformed` marker and the virtual module.

/// The reserved module the conditional-call marker is imported from.
pub const VIRTUAL_MODULE_ID: &str = "virtual:platformed";

/// What [`VIRTUAL_MODULE_ID`] resolves to. The NUL prefix keeps other
/// resolvers away from it.
pub const RESOLVED_VIRTUAL_MODULE_ID: &str = "\0virtual:platformed";

/// Source of the resolved virtual module. It exports nothing used at runtime.
pub const VIRTUAL_MODULE_SOURCE: &str = "export default {}";

/// Name of the conditional-call function exported by the virtual module.
pub const CALL_NAME: &str = "platformed";

const MARKER: &str = ".platformed";

const SCRIPT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// Carries the `.platformed` marker and gets specialized.
    Specialized,
    Plain,
}

/// Classify a module id by its name alone.
///
/// `Foo.platformed` and `Foo.platformed.{js,jsx,ts,tsx}` are specialized.
/// A `?query` suffix appended by the host is ignored.
pub fn classify(id: &str) -> ModuleKind {
    let path = id.split_once('?').map_or(id, |(path, _)| path);
    let stem = match path.rsplit_once('.') {
        Some((stem, extension)) if SCRIPT_EXTENSIONS.contains(&extension) => stem,
        _ => path,
    };
    if stem.ends_with(MARKER) {
        ModuleKind::Specialized
    } else {
        ModuleKind::Plain
    }
}

/// Resolve hook: claims the virtual module id.
pub fn resolve_id(id: &str) -> Option<&'static str> {
    (id == VIRTUAL_MODULE_ID).then_some(RESOLVED_VIRTUAL_MODULE_ID)
}

/// Load hook: supplies the virtual module's source.
pub fn load(id: &str) -> Option<&'static str> {
    (id == RESOLVED_VIRTUAL_MODULE_ID).then_some(VIRTUAL_MODULE_SOURCE)
}
