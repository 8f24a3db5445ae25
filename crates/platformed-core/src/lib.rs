//! Build-time platform specialization for platformed modules.
//!
//! A module whose id carries the `.platformed` marker may import the
//! conditional-call function from the virtual module and write
//!
//! ```text
//! import { platformed } from 'virtual:platformed';
//! import './theme.ios.css';
//! import './theme.common.css';
//!
//! export const Header = platformed({ ios: IosHeader, common: Header });
//! ```
//!
//! For a given target platform the [`Specializer`] removes the marker import,
//! prunes platform-suffixed imports down to the target's (or the fallback's),
//! and replaces every conditional call with the target's value.
//!
//! ## Modules
//!
//! - [`platform`]: Known platforms and the build target
//! - [`config`]: Build mode, resource kinds and specializer configuration
//! - [`module_id`]: Module id naming and the virtual module hooks
//! - [`guard`]: Marker misuse check for plain modules
//! - [`imports`]: Import classification and pruning
//! - [`calls`]: Conditional-call resolution
//! - [`pipeline`]: The per-module transform

pub mod calls;
pub mod config;
pub mod edit;
pub mod error;
pub mod guard;
pub mod imports;
pub mod module_id;
pub mod pipeline;
pub mod platform;

pub use config::{BuildMode, ImportKind, ResourceKinds, SpecializerConfig};
pub use error::SpecializeError;
pub use module_id::{classify, load, resolve_id, ModuleKind, VIRTUAL_MODULE_ID};
pub use pipeline::{Diagnostic, Rewrite, Specializer, Transform};
pub use platform::{PlatformRegistry, COMMON_PLATFORM};
pub use platformed_syntax::Dialect;
