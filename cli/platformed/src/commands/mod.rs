//! CLI command implementations.

pub mod build;
pub mod init;
pub mod platforms;
pub mod transform;

use std::path::Path;

use platformed_core::Dialect;

/// Grammar for a script file, by extension. `None` for anything else.
///
/// Plain `.ts` has no JSX so `<T>value` assertions lex as type syntax.
pub fn dialect_for(path: &Path) -> Option<Dialect> {
    let extension = path.extension()?.to_str()?;
    match extension {
        "js" | "jsx" => Some(Dialect {
            typescript: false,
            jsx: true,
        }),
        "ts" => Some(Dialect {
            typescript: true,
            jsx: false,
        }),
        "tsx" => Some(Dialect::typescript_jsx()),
        _ => None,
    }
}

/// Module id for `path`: relative to `root` when inside it, `/`-separated.
pub fn module_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_follows_extension() {
        assert_eq!(
            dialect_for(Path::new("a/App.platformed.tsx")),
            Some(Dialect::typescript_jsx())
        );
        assert!(!dialect_for(Path::new("a.ts")).unwrap().jsx);
        assert!(!dialect_for(Path::new("a.jsx")).unwrap().typescript);
        assert_eq!(dialect_for(Path::new("theme.css")), None);
        assert_eq!(dialect_for(Path::new("Makefile")), None);
    }

    #[test]
    fn module_ids_are_relative() {
        let root = Path::new("/project");
        assert_eq!(
            module_id(root, Path::new("/project/src/App/App.platformed.tsx")),
            "src/App/App.platformed.tsx"
        );
        assert_eq!(module_id(root, Path::new("other/x.js")), "other/x.js");
    }
}
