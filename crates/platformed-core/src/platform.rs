//! The set of platforms a build knows about and the one it targets.

use indexmap::IndexSet;

use crate::error::{Result, SpecializeError};

/// The fallback platform key, used when a module has no target-specific
/// variant.
pub const COMMON_PLATFORM: &str = "common";

/// Validated, ordered set of known platform identifiers plus the build target.
///
/// The fallback platform is always known. The target is always one of the
/// known platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRegistry {
    known: IndexSet<String>,
    target: String,
}

impl PlatformRegistry {
    /// Build a registry for `target` over `known` platforms.
    ///
    /// Duplicates are dropped and [`COMMON_PLATFORM`] is appended when missing.
    pub fn new<I, S>(target: impl Into<String>, known: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();
        for platform in known {
            let platform = platform.into();
            validate_identifier(&platform)?;
            set.insert(platform);
        }
        set.insert(COMMON_PLATFORM.to_string());

        let target = target.into();
        if !set.contains(&target) {
            return Err(SpecializeError::Registry {
                detail: format!(
                    "Unexpected platform received: {target}. Known platforms: {}",
                    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
                ),
            });
        }
        Ok(Self { known: set, target })
    }

    /// The same known platforms with a different target.
    pub fn retarget(&self, target: &str) -> Result<Self> {
        Self::new(target, self.known.iter().cloned())
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn fallback(&self) -> &str {
        COMMON_PLATFORM
    }

    pub fn contains(&self, platform: &str) -> bool {
        self.known.contains(platform)
    }

    pub fn known(&self) -> impl Iterator<Item = &str> {
        self.known.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

/// Platform identifiers are non-empty runs of ASCII word characters.
pub fn validate_identifier(platform: &str) -> Result<()> {
    let valid = !platform.is_empty()
        && platform
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(SpecializeError::Registry {
            detail: format!("invalid platform identifier \"{platform}\""),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_is_always_known() {
        let registry = PlatformRegistry::new("ios", ["ios", "android"]).unwrap();
        let known: Vec<_> = registry.known().collect();
        assert_eq!(known, vec!["ios", "android", "common"]);
        assert_eq!(registry.fallback(), "common");
    }

    #[test]
    fn duplicates_keep_first_position() {
        let registry = PlatformRegistry::new("web", ["common", "web", "common", "web"]).unwrap();
        assert_eq!(registry.known().collect::<Vec<_>>(), vec!["common", "web"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unknown_target_is_rejected() {
        let err = PlatformRegistry::new("desktop", ["ios", "android"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unexpected platform received: desktop"));
        assert!(msg.contains("ios, android, common"));
    }

    #[test]
    fn common_target_needs_no_declaration() {
        let registry = PlatformRegistry::new("common", Vec::<String>::new()).unwrap();
        assert_eq!(registry.target(), "common");
        assert!(registry.contains("common"));
    }

    #[test]
    fn identifiers_are_validated() {
        assert!(validate_identifier("ios_14").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("i.os").is_err());
        assert!(validate_identifier("web-legacy").is_err());
        assert!(PlatformRegistry::new("ios", ["ios", "an droid"]).is_err());
    }

    #[test]
    fn retarget_keeps_known_platforms() {
        let registry = PlatformRegistry::new("ios", ["ios", "android"]).unwrap();
        let android = registry.retarget("android").unwrap();
        assert_eq!(android.target(), "android");
        assert_eq!(android.known().count(), 3);
        assert!(registry.retarget("web").is_err());
    }
}
