//! The platformed-file guard.
//!
//! Only modules whose id carries the `.platformed` marker may use the
//! conditional-call construct. Everything else passes through untouched,
//! unless it imports the marker, which is an error.

use platformed_syntax::{Dialect, SourceTree};
use tracing::debug;

use crate::error::{Result, SpecializeError};
use crate::imports::has_marker;
use crate::module_id::{classify, ModuleKind, CALL_NAME, VIRTUAL_MODULE_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Run the full pipeline.
    Proceed,
    /// Leave the module unchanged.
    Skip,
}

/// Decide whether the module `id` with source `code` gets specialized.
pub fn guard(code: &str, id: &str, dialect: &Dialect) -> Result<GuardDecision> {
    if classify(id) == ModuleKind::Specialized {
        return Ok(GuardDecision::Proceed);
    }
    if !code.contains(VIRTUAL_MODULE_ID) {
        return Ok(GuardDecision::Skip);
    }

    // Plain modules aren't ours to reject for syntax the host may accept,
    // so an untokenizable one falls back to a textual marker check.
    let marked = match SourceTree::parse(code, dialect) {
        Ok(tree) => has_marker(&tree),
        Err(err) => {
            debug!(module = id, error = %err, "unparsable plain module, checking marker textually");
            mentions_marker_import(code)
        }
    };
    if marked {
        return Err(SpecializeError::Misuse {
            module: id.to_string(),
        });
    }
    Ok(GuardDecision::Skip)
}

/// Whether `code` spells out `import { platformed } from 'virtual:platformed'`,
/// allowing any whitespace and extra bindings.
fn mentions_marker_import(code: &str) -> bool {
    code.match_indices("import").any(|(start, keyword)| {
        let rest = code[start + keyword.len()..].trim_start();
        let Some(rest) = rest.strip_prefix('{') else {
            return false;
        };
        let Some(close) = rest.find('}') else {
            return false;
        };
        let binds_call = rest[..close]
            .split(',')
            .any(|binding| binding.split_whitespace().next() == Some(CALL_NAME));
        if !binds_call {
            return false;
        }
        let Some(rest) = rest[close + 1..].trim_start().strip_prefix("from") else {
            return false;
        };
        let rest = rest.trim_start();
        ['\'', '"'].into_iter().any(|quote| {
            rest.strip_prefix(quote)
                .and_then(|r| r.strip_prefix(VIRTUAL_MODULE_ID))
                .is_some_and(|r| r.starts_with(quote))
        })
    })
}
