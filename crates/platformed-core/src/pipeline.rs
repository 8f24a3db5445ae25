//! Specialization pipeline orchestrator.

use platformed_syntax::SourceTree;
use serde::Serialize;
use tracing::debug;

use crate::calls::resolve_calls;
use crate::config::SpecializerConfig;
use crate::error::{Result, SpecializeError};
use crate::guard::{guard, GuardDecision};
use crate::imports::prune_imports;
use crate::platform::PlatformRegistry;

/// A non-fatal finding reported alongside a rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub module: String,
    pub message: String,
}

/// Rewritten source of a specialized module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    pub code: String,
    /// Platform-suffixed imports removed.
    pub removed_imports: usize,
    /// Conditional calls replaced.
    pub resolved_calls: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Source map of the rewrite. Never produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
}

/// Outcome of transforming one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Not a platformed module; the host keeps the original code.
    Unchanged,
    Rewritten(Rewrite),
}

impl Transform {
    /// The rewritten code, or `original` when unchanged.
    pub fn code_or<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            Transform::Unchanged => original,
            Transform::Rewritten(rewrite) => &rewrite.code,
        }
    }
}

/// A configured specializer, shared read-only across any number of
/// concurrent [`Specializer::transform`] calls.
#[derive(Debug, Clone)]
pub struct Specializer {
    config: SpecializerConfig,
}

impl Specializer {
    pub fn new(config: SpecializerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpecializerConfig {
        &self.config
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.config.registry
    }

    /// Run guard, import pruning and call resolution on one module.
    ///
    /// Either the whole module is rewritten or an error is returned; there
    /// are no partial rewrites.
    pub fn transform(&self, code: &str, id: &str) -> Result<Transform> {
        if guard(code, id, &self.config.dialect)? == GuardDecision::Skip {
            return Ok(Transform::Unchanged);
        }

        let tree = SourceTree::parse(code, &self.config.dialect).map_err(|source| SpecializeError::Syntax {
            module: id.to_string(),
            source,
        })?;
        let pruned = prune_imports(code, &tree, &self.config, id)?;
        let resolved = resolve_calls(&pruned.code, &pruned.callees, &self.config, id)?;

        debug!(
            module = id,
            target = self.config.registry.target(),
            removed_imports = pruned.removed,
            resolved_calls = resolved.resolved,
            "specialized module"
        );
        Ok(Transform::Rewritten(Rewrite {
            code: resolved.code,
            removed_imports: pruned.removed,
            resolved_calls: resolved.resolved,
            diagnostics: pruned.diagnostics,
            map: None,
        }))
    }
}
