//! Import declarations: the conditional-call marker and platform-suffixed
//! resource imports.
//!
//! Declarations are recognized on the top level of the token tree only,
//! which is the only place ECMAScript allows them. An import is *tagged*
//! when the last path component of its specifier ends in `.{platform}` or
//! `.{platform}.{extension}` for a known platform. Tagged imports are pruned
//! per resource kind: within a kind, the target platform's imports survive
//! if there are any, and the fallback platform's imports otherwise.

use indexmap::IndexMap;
use platformed_syntax::literal::string_value;
use platformed_syntax::{split_top_level, Delim, Group, Node, SourceTree, Span, TokenKind};
use tracing::{debug, warn};

use crate::config::{BuildMode, ImportKind, SpecializerConfig};
use crate::edit::{apply_edits, Edit};
use crate::error::{Result, SpecializeError};
use crate::module_id::{CALL_NAME, VIRTUAL_MODULE_ID};
use crate::pipeline::Diagnostic;
use crate::platform::{PlatformRegistry, COMMON_PLATFORM};

/// A static `import` declaration.
#[derive(Debug, Clone)]
pub struct ImportDeclaration<'a, 's> {
    /// From the `import` keyword through the optional `;`.
    pub span: Span,
    pub specifier: String,
    /// The `{ ... }` named bindings, if present.
    pub named: Option<&'a Group<'s>>,
}

/// Platform and kind read off an import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecifierTag {
    pub platform: String,
    pub kind: ImportKind,
    pub extension: Option<String>,
}

/// Result of pruning a module's imports.
#[derive(Debug, Clone, Default)]
pub struct PrunedImports {
    pub code: String,
    /// Names called as the conditional-call function: the plain name plus
    /// any alias bound by a marker import.
    pub callees: Vec<String>,
    /// Tagged imports removed, marker imports not counted.
    pub removed: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// All static import declarations among `nodes`.
pub fn import_declarations<'a, 's>(nodes: &'a [Node<'s>]) -> Vec<ImportDeclaration<'a, 's>> {
    let mut declarations = Vec::new();
    let mut index = 0;
    while index < nodes.len() {
        match declaration_at(nodes, index) {
            Some((declaration, consumed)) => {
                declarations.push(declaration);
                index += consumed;
            }
            None => index += 1,
        }
    }
    declarations
}

fn declaration_at<'a, 's>(nodes: &'a [Node<'s>], index: usize) -> Option<(ImportDeclaration<'a, 's>, usize)> {
    if !nodes[index].is_ident("import") {
        return None;
    }
    if let Some(prev) = index.checked_sub(1).map(|i| &nodes[i]) {
        if prev.is_punct(".") || prev.is_punct("?.") {
            return None;
        }
    }

    let mut cursor = index + 1;
    let mut named = None;
    let specifier = loop {
        match nodes.get(cursor)? {
            Node::Leaf(token) if token.kind == TokenKind::String => {
                if cursor == index + 1 || nodes[cursor - 1].is_ident("from") {
                    break token;
                }
                return None;
            }
            Node::Leaf(token) if token.kind == TokenKind::Ident => {}
            Node::Leaf(token) if token.is_punct(",") || token.is_punct("*") => {}
            Node::Group(group) if group.delim == Delim::Brace => named = Some(group),
            // Dynamic `import(...)`, `import.meta` and `import x = require(...)`.
            _ => return None,
        }
        cursor += 1;
    };
    cursor += 1;

    let has_attributes = nodes
        .get(cursor)
        .is_some_and(|n| n.is_ident("with") || n.is_ident("assert"))
        && nodes
            .get(cursor + 1)
            .is_some_and(|n| n.as_delimited(Delim::Brace).is_some());
    if has_attributes {
        cursor += 2;
    }
    if nodes.get(cursor).is_some_and(|n| n.is_punct(";")) {
        cursor += 1;
    }

    let span = nodes[index].span().join(nodes[cursor - 1].span());
    let declaration = ImportDeclaration {
        span,
        specifier: string_value(specifier.text)?,
        named,
    };
    Some((declaration, cursor - index))
}

/// Local names bound to the conditional-call function by a marker import's
/// named bindings: `platformed` itself, or the alias in `platformed as pick`.
pub fn marker_bindings(named: &Group<'_>) -> Vec<String> {
    split_top_level(&named.children, ",")
        .into_iter()
        .filter_map(|binding| {
            let imported = match binding.first()? {
                Node::Leaf(token) if token.kind == TokenKind::Ident => token.text.to_string(),
                Node::Leaf(token) if token.kind == TokenKind::String => string_value(token.text)?,
                _ => return None,
            };
            if imported != CALL_NAME {
                return None;
            }
            match binding {
                [_] => Some(imported),
                [_, as_kw, Node::Leaf(alias)] if as_kw.is_ident("as") => Some(alias.text.to_string()),
                _ => None,
            }
        })
        .collect()
}

/// Whether the module imports from the virtual module.
pub fn has_marker(tree: &SourceTree<'_>) -> bool {
    import_declarations(tree.nodes())
        .iter()
        .any(|declaration| declaration.specifier == VIRTUAL_MODULE_ID)
}

/// Read the platform and kind off an import specifier, if it is tagged.
pub fn classify_specifier(
    specifier: &str,
    registry: &PlatformRegistry,
    config: &SpecializerConfig,
) -> Option<SpecifierTag> {
    let path = specifier.split_once('?').map_or(specifier, |(path, _)| path);
    let file = path.rsplit('/').next().unwrap_or(path);
    let segments: Vec<&str> = file.split('.').collect();

    match segments.as_slice() {
        [.., stem, platform] if !stem.is_empty() && registry.contains(platform) => Some(SpecifierTag {
            platform: platform.to_string(),
            kind: ImportKind::Code,
            extension: None,
        }),
        [.., stem, platform, extension] if !stem.is_empty() && registry.contains(platform) => {
            Some(SpecifierTag {
                platform: platform.to_string(),
                kind: config.kinds.classify(extension),
                extension: Some(extension.to_string()),
            })
        }
        _ => None,
    }
}

/// Remove marker imports and the tagged imports the target doesn't use.
pub fn prune_imports(
    code: &str,
    tree: &SourceTree<'_>,
    config: &SpecializerConfig,
    module: &str,
) -> Result<PrunedImports> {
    let registry = &config.registry;
    let mut edits = Vec::new();
    let mut pruned = PrunedImports {
        callees: vec![CALL_NAME.to_string()],
        ..PrunedImports::default()
    };
    let mut groups: IndexMap<ImportKind, Vec<(Span, String)>> = IndexMap::new();

    for declaration in import_declarations(tree.nodes()) {
        if declaration.specifier == VIRTUAL_MODULE_ID {
            if let Some(named) = declaration.named {
                for binding in marker_bindings(named) {
                    if !pruned.callees.contains(&binding) {
                        pruned.callees.push(binding);
                    }
                }
            }
            edits.push(Edit::remove_statement(code, declaration.span));
            continue;
        }

        let Some(tag) = classify_specifier(&declaration.specifier, registry, config) else {
            continue;
        };
        if tag.kind == ImportKind::Unrecognized {
            let import = declaration.span.slice(code);
            let err = SpecializeError::Classification {
                module: module.to_string(),
                import: import.to_string(),
                extension: tag.extension.unwrap_or_default(),
                expected: config.kinds.expected(),
            };
            if config.mode == BuildMode::Production {
                return Err(err);
            }
            warn!(module, import, "keeping platformed import of unknown kind");
            pruned.diagnostics.push(Diagnostic {
                module: module.to_string(),
                message: err.to_string(),
            });
            continue;
        }
        groups
            .entry(tag.kind)
            .or_default()
            .push((declaration.span, tag.platform));
    }

    for (kind, imports) in &groups {
        let has_target = imports
            .iter()
            .any(|(_, platform)| platform == registry.target());
        let keep = if has_target {
            registry.target()
        } else {
            COMMON_PLATFORM
        };
        for (span, platform) in imports {
            if platform != keep {
                debug!(module, ?kind, import = span.slice(code), "removing platformed import");
                edits.push(Edit::remove_statement(code, *span));
                pruned.removed += 1;
            }
        }
    }

    pruned.code = apply_edits(code, edits);
    Ok(pruned)
}
