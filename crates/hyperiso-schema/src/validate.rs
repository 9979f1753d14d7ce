//! Validation steps run by `prepare`.
//!
//! Each step reads the decoded settings and/or the normalized configuration,
//! records findings in the shared [`ValidationCtx`] and never returns early,
//! so one call reports every problem at once.

use crate::constraints::{
    check_allowed, check_allowed_number, CHECKSUM_TYPES, CHECKSUM_TYPE_NONE, DISK_BLOCK_SIZE,
    DISK_SIZE, GENERATIONS, GUEST_ADDITIONS_ATTACH, GUEST_ADDITIONS_MODES, RAM_SIZE,
};
use crate::error::{ConfigError, ValidationCtx};
use crate::normalize::ResolvedConfig;
use crate::schema::BuildSettings;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const NO_CHECKSUM_WARNING: &str = "A checksum type of 'none' was specified. Since ISO files are so big, \
     a checksum is highly recommended; the integrity of the source ISO will not be verified.";

/// Exactly one of `iso_url` and `iso_urls` must be given.
///
/// URLs are trimmed. A list counts as given when any entry is non-blank, and
/// each blank entry in a given list is its own error.
pub(crate) fn validate_source(
    settings: &BuildSettings,
    config: &mut ResolvedConfig,
    ctx: &mut ValidationCtx,
) {
    let single = settings
        .iso_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    let multi: Option<Vec<&str>> = settings
        .iso_urls
        .as_ref()
        .map(|urls| urls.iter().map(|url| url.trim()).collect::<Vec<_>>())
        .filter(|urls| urls.iter().any(|url| !url.is_empty()));

    match (single, multi) {
        (Some(_), Some(_)) => ctx.push(ConfigError::MutuallyExclusive {
            first: "iso_url",
            second: "iso_urls",
        }),
        (None, None) => ctx.push(ConfigError::MissingOneOf {
            first: "iso_url",
            second: "iso_urls",
        }),
        (Some(url), None) => config.iso_urls = vec![url.to_owned()],
        (None, Some(urls)) => {
            for (index, url) in urls.iter().enumerate() {
                if url.is_empty() {
                    ctx.push(ConfigError::BlankListEntry {
                        field: "iso_urls",
                        index,
                    });
                }
            }
            config.iso_urls = urls.into_iter().map(str::to_owned).collect();
        }
    }
}

/// Required checksum fields, the algorithm allow-list, and lowercasing.
pub(crate) fn validate_checksum(config: &mut ResolvedConfig, ctx: &mut ValidationCtx) {
    config.iso_checksum_type = config.iso_checksum_type.to_ascii_lowercase();
    let disabled = config.iso_checksum_type == CHECKSUM_TYPE_NONE;

    if config.iso_checksum_type.is_empty() {
        ctx.push(ConfigError::MissingField {
            field: "iso_checksum_type",
        });
    } else if check_allowed(
        "iso_checksum_type",
        &config.iso_checksum_type,
        CHECKSUM_TYPES,
        ctx,
    ) && disabled
    {
        warn!("ISO checksum verification disabled");
        ctx.warn(NO_CHECKSUM_WARNING);
    }

    if config.iso_checksum.is_empty() {
        if !disabled {
            ctx.push(ConfigError::MissingField {
                field: "iso_checksum",
            });
        }
    } else {
        config.iso_checksum = config.iso_checksum.to_ascii_lowercase();
    }
}

/// Closed ranges and enumerations over the numeric settings.
pub(crate) fn validate_ranges(config: &ResolvedConfig, ctx: &mut ValidationCtx) {
    DISK_SIZE.check(config.disk_size, ctx);
    DISK_BLOCK_SIZE.check(config.disk_block_size, ctx);
    RAM_SIZE.check(config.ram_size, ctx);
    check_allowed_number("generation", u64::from(config.generation), GENERATIONS, ctx);
}

pub(crate) fn validate_guest_additions(config: &mut ResolvedConfig, ctx: &mut ValidationCtx) {
    config.guest_additions_mode = config.guest_additions_mode.to_ascii_lowercase();
    if !check_allowed(
        "guest_additions_mode",
        &config.guest_additions_mode,
        GUEST_ADDITIONS_MODES,
        ctx,
    ) {
        return;
    }

    if config.guest_additions_mode == GUEST_ADDITIONS_ATTACH {
        match &config.guest_additions_path {
            Some(path) => check_readable("guest_additions_path", path, ctx),
            None => ctx.push(ConfigError::MissingFieldForMode {
                field: "guest_additions_path",
                mode_field: "guest_additions_mode",
                mode: GUEST_ADDITIONS_ATTACH,
            }),
        }
    }
}

/// One error per floppy file that cannot be read.
pub(crate) fn validate_floppy_files(config: &ResolvedConfig, ctx: &mut ValidationCtx) {
    for path in &config.floppy_files {
        check_readable("floppy_files", path, ctx);
    }
}

fn check_readable(field: &'static str, path: &Path, ctx: &mut ValidationCtx) {
    let result = fs::metadata(path).and_then(|meta| {
        if meta.is_file() {
            fs::File::open(path).map(drop)
        } else {
            Err(std::io::Error::other("not a regular file"))
        }
    });
    if let Err(e) = result {
        ctx.push(ConfigError::UnreadableFile {
            field,
            path: path.to_path_buf(),
            reason: e.to_string(),
        });
    }
}
