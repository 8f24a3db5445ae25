//! Specializer configuration.

use std::fmt;
use std::str::FromStr;

use platformed_syntax::Dialect;
use serde::{Deserialize, Serialize};

use crate::error::SpecializeError;
use crate::platform::PlatformRegistry;

/// Whether the build is a production build or a development run.
///
/// Development runs downgrade import classification failures to warnings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Production,
    Development,
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Production => write!(f, "production"),
            BuildMode::Development => write!(f, "development"),
        }
    }
}

impl FromStr for BuildMode {
    type Err = SpecializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(BuildMode::Production),
            "development" | "dev" => Ok(BuildMode::Development),
            other => Err(SpecializeError::Registry {
                detail: format!("unknown build mode \"{other}\", expected production or development"),
            }),
        }
    }
}

/// Kind of resource a platform-suffixed import refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Style,
    Code,
    Unrecognized,
}

/// File extensions of each resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceKinds {
    pub style: Vec<String>,
    pub code: Vec<String>,
}

impl Default for ResourceKinds {
    fn default() -> Self {
        Self {
            style: vec!["css".into(), "scss".into()],
            code: vec!["js".into(), "jsx".into(), "ts".into(), "tsx".into()],
        }
    }
}

impl ResourceKinds {
    /// Kind of an import whose specifier ends in `.{platform}.{extension}`.
    pub fn classify(&self, extension: &str) -> ImportKind {
        if self.style.iter().any(|e| e == extension) {
            ImportKind::Style
        } else if self.code.iter().any(|e| e == extension) {
            ImportKind::Code
        } else {
            ImportKind::Unrecognized
        }
    }

    /// All accepted extensions, quoted, for error messages.
    pub fn expected(&self) -> String {
        let quoted: Vec<_> = self
            .style
            .iter()
            .chain(&self.code)
            .map(|e| format!("\"{e}\""))
            .collect();
        format!("[{}]", quoted.join(", "))
    }
}

/// Everything a [`crate::Specializer`] needs, fixed for the lifetime of a build.
#[derive(Debug, Clone)]
pub struct SpecializerConfig {
    pub registry: PlatformRegistry,
    pub mode: BuildMode,
    pub kinds: ResourceKinds,
    pub dialect: Dialect,
}

impl SpecializerConfig {
    pub fn new(registry: PlatformRegistry) -> Self {
        Self {
            registry,
            mode: BuildMode::default(),
            kinds: ResourceKinds::default(),
            dialect: Dialect::default(),
        }
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_kinds(mut self, kinds: ResourceKinds) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }
}
