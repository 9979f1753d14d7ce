//! Settings preparation and validation for Hyper-V ISO image builds.
//!
//! This crate turns loosely-typed build settings (`RawSettings`, usually read
//! from a TOML file plus `key=value` overrides) into a fully defaulted,
//! validated `ResolvedConfig`. Validation never stops at the first problem:
//! `prepare` returns either the configuration with its warnings, or every
//! error found as one `ValidationErrors` collection.

pub mod constraints;
pub mod error;
pub mod normalize;
pub mod prepare;
pub mod schema;
pub mod settings;
pub mod validate;

pub use constraints::{RangeConstraint, CHECKSUM_TYPES, CHECKSUM_TYPE_NONE};
pub use error::{ConfigError, ErrorKind, ValidationErrors};
pub use normalize::ResolvedConfig;
pub use prepare::{prepare, Prepared, ValidationOutcome};
pub use schema::{BuildSettings, KeySpec, BUILD_NAME_KEY, SCHEMA};
pub use settings::{
    parse_override, parse_settings_file, parse_settings_str, RawSettings, SettingsError,
};
pub use validate::NO_CHECKSUM_WARNING;
