//! `platformed platforms`: list known platforms.

use anyhow::Result;
use platformed_core::PlatformRegistry;

pub fn run(registry: &PlatformRegistry) -> Result<()> {
    print!("{}", listing(registry));
    Ok(())
}

/// One line per known platform, the target marked with `*`.
pub(crate) fn listing(registry: &PlatformRegistry) -> String {
    let mut out = String::new();
    for platform in registry.known() {
        let marker = if platform == registry.target() { '*' } else { ' ' };
        let note = if platform == registry.fallback() {
            " (fallback)"
        } else {
            ""
        };
        out.push_str(&format!("{marker} {platform}{note}\n"));
    }
    out
}
