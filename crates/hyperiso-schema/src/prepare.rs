use crate::error::{ValidationCtx, ValidationErrors};
use crate::normalize::ResolvedConfig;
use crate::schema::BuildSettings;
use crate::settings::RawSettings;
use crate::validate::{
    validate_checksum, validate_floppy_files, validate_guest_additions, validate_ranges,
    validate_source,
};
use tracing::info;

/// Result of one [`prepare`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Usable configuration plus non-fatal advisories.
    Valid {
        config: ResolvedConfig,
        warnings: Vec<String>,
    },
    /// Every error found. `config` is partially resolved and must not be
    /// handed to a provisioning driver.
    Invalid {
        config: ResolvedConfig,
        errors: ValidationErrors,
    },
}

/// A successfully prepared configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub config: ResolvedConfig,
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn config(&self) -> &ResolvedConfig {
        match self {
            Self::Valid { config, .. } | Self::Invalid { config, .. } => config,
        }
    }

    /// Warnings of a valid outcome; always empty for an invalid one.
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Valid { warnings, .. } => warnings,
            Self::Invalid { .. } => &[],
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Valid { .. } => None,
            Self::Invalid { errors, .. } => Some(errors),
        }
    }

    pub fn into_result(self) -> Result<Prepared, ValidationErrors> {
        match self {
            Self::Valid { config, warnings } => Ok(Prepared { config, warnings }),
            Self::Invalid { errors, .. } => Err(errors),
        }
    }
}

/// Decode, default, and validate `raw` into a build configuration.
///
/// Every validation step runs regardless of earlier failures, so the error
/// collection of an invalid outcome is complete. The only side effects are
/// read-only filesystem checks for referenced files; calling this twice on
/// the same input against the same filesystem yields the same outcome.
pub fn prepare(raw: &RawSettings) -> ValidationOutcome {
    let mut ctx = ValidationCtx::default();

    let settings = BuildSettings::decode(raw, &mut ctx);
    let mut config = settings.normalize();

    validate_source(&settings, &mut config, &mut ctx);
    validate_checksum(&mut config, &mut ctx);
    validate_ranges(&config, &mut ctx);
    validate_guest_additions(&mut config, &mut ctx);
    validate_floppy_files(&config, &mut ctx);

    match ctx.into_result() {
        Ok(warnings) => {
            info!(
                "prepared build '{}' ({} warnings)",
                config.build_name,
                warnings.len()
            );
            ValidationOutcome::Valid { config, warnings }
        }
        Err(errors) => {
            info!(
                "build '{}' failed validation with {} errors",
                config.build_name,
                errors.len()
            );
            ValidationOutcome::Invalid { config, errors }
        }
    }
}
