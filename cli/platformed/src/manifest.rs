//! `platformed.toml` manifest parsing and specializer configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use platformed_core::{BuildMode, PlatformRegistry, ResourceKinds, SpecializerConfig, COMMON_PLATFORM};
use serde::{Deserialize, Serialize};

/// File name searched for by [`PlatformedManifest::find_and_load`].
pub const MANIFEST_FILE: &str = "platformed.toml";

/// The top-level manifest structure. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformedManifest {
    #[serde(default)]
    pub platforms: PlatformsConfig,
    #[serde(default)]
    pub build: BuildConfig,
    /// Extension lists per resource kind.
    #[serde(default)]
    pub kinds: ResourceKinds,
}

/// `[platforms]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformsConfig {
    /// Build target. Overridden by `PLATFORM` and `--target`.
    #[serde(default)]
    pub target: Option<String>,
    /// Known platforms, in declaration order.
    #[serde(default)]
    pub known: Vec<String>,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub mode: Option<BuildMode>,
    /// Source tree, relative to the manifest directory.
    #[serde(default)]
    pub src: Option<PathBuf>,
    /// Output root, relative to the manifest directory.
    #[serde(default)]
    pub out: Option<PathBuf>,
}

/// Command-line values that take precedence over the manifest.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub mode: Option<String>,
}

impl PlatformedManifest {
    /// Search upward from `start_dir` for a `platformed.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: PlatformedManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing platformed.toml")
    }

    pub fn src_dir(&self) -> &Path {
        self.build.src.as_deref().unwrap_or(Path::new("src"))
    }

    pub fn out_dir(&self) -> &Path {
        self.build.out.as_deref().unwrap_or(Path::new("dist"))
    }

    /// Merge the manifest with `overrides` into a specializer configuration.
    ///
    /// The target defaults to the fallback platform.
    pub fn specializer_config(&self, overrides: &Overrides) -> Result<SpecializerConfig> {
        let target = overrides
            .target
            .as_deref()
            .or(self.platforms.target.as_deref())
            .unwrap_or(COMMON_PLATFORM);
        let known = overrides.platforms.as_ref().unwrap_or(&self.platforms.known);
        let registry = PlatformRegistry::new(target, known.iter().cloned())
            .context("configuring platforms")?;

        let mode = match overrides.mode.as_deref() {
            Some(mode) => mode.parse().context("parsing --mode")?,
            None => self.build.mode.unwrap_or_default(),
        };

        Ok(SpecializerConfig::new(registry)
            .with_mode(mode)
            .with_kinds(self.kinds.clone()))
    }

    /// Generate the default template for `platformed init`.
    pub fn template() -> String {
        r#"[platforms]
target = "common"
known = ["ios", "android", "web"]

[build]
mode = "production"
src = "src"
out = "dist"

[kinds]
style = ["css", "scss"]
code = ["js", "jsx", "ts", "tsx"]
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformed_core::ImportKind;

    #[test]
    fn parse_full_manifest() {
        let manifest = PlatformedManifest::from_str(
            r#"
[platforms]
target = "android"
known = ["ios", "android"]

[build]
mode = "development"
src = "app"
out = "build"

[kinds]
style = ["css", "less"]
"#,
        )
        .unwrap();
        assert_eq!(manifest.platforms.target.as_deref(), Some("android"));
        assert_eq!(manifest.platforms.known, ["ios", "android"]);
        assert_eq!(manifest.build.mode, Some(BuildMode::Development));
        assert_eq!(manifest.src_dir(), Path::new("app"));
        assert_eq!(manifest.out_dir(), Path::new("build"));
        assert_eq!(manifest.kinds.classify("less"), ImportKind::Style);
        // Omitted lists keep their defaults.
        assert_eq!(manifest.kinds.classify("tsx"), ImportKind::Code);
    }

    #[test]
    fn parse_empty_manifest() {
        let manifest = PlatformedManifest::from_str("").unwrap();
        assert!(manifest.platforms.target.is_none());
        assert!(manifest.platforms.known.is_empty());
        assert_eq!(manifest.src_dir(), Path::new("src"));
        assert_eq!(manifest.out_dir(), Path::new("dist"));
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(PlatformedManifest::from_str("[platforms\nknown = 1").is_err());
        assert!(PlatformedManifest::from_str("[build]\nmode = \"staging\"").is_err());
    }

    #[test]
    fn target_defaults_to_common() {
        let config = PlatformedManifest::default()
            .specializer_config(&Overrides::default())
            .unwrap();
        assert_eq!(config.registry.target(), COMMON_PLATFORM);
        assert_eq!(config.mode, BuildMode::Production);
    }

    #[test]
    fn overrides_beat_the_manifest() {
        let manifest = PlatformedManifest::from_str(
            "[platforms]\ntarget = \"ios\"\nknown = [\"ios\", \"android\"]\n[build]\nmode = \"production\"\n",
        )
        .unwrap();
        let config = manifest
            .specializer_config(&Overrides {
                target: Some("web".into()),
                platforms: Some(vec!["web".into()]),
                mode: Some("dev".into()),
            })
            .unwrap();
        assert_eq!(config.registry.target(), "web");
        assert!(!config.registry.contains("ios"));
        assert_eq!(config.mode, BuildMode::Development);
    }

    #[test]
    fn unknown_target_is_an_error() {
        let manifest =
            PlatformedManifest::from_str("[platforms]\nknown = [\"ios\"]\n").unwrap();
        let err = manifest
            .specializer_config(&Overrides {
                target: Some("tvos".into()),
                ..Overrides::default()
            })
            .unwrap_err();
        assert!(format!("{err:#}").contains("Unexpected platform received: tvos"));
    }

    #[test]
    fn template_is_valid_toml() {
        let manifest = PlatformedManifest::from_str(&PlatformedManifest::template()).unwrap();
        assert_eq!(manifest.platforms.known, ["ios", "android", "web"]);
        let config = manifest.specializer_config(&Overrides::default()).unwrap();
        assert_eq!(config.registry.len(), 4);
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            "[platforms]\ntarget = \"ios\"\nknown = [\"ios\"]\n",
        )
        .unwrap();
        let nested = dir.path().join("src").join("components");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found_dir) = PlatformedManifest::find_and_load(&nested)
            .unwrap()
            .unwrap();
        assert_eq!(manifest.platforms.target.as_deref(), Some("ios"));
        assert_eq!(found_dir, dir.path());
    }

    #[test]
    fn find_and_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "not toml [[[").unwrap();
        let err = PlatformedManifest::find_and_load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("parsing"));
    }
}
