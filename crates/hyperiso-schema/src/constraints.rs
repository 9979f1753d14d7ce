use crate::error::{ConfigError, ValidationCtx};

/// Closed `[min, max]` interval accepted for a numeric setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeConstraint {
    pub min: u64,
    pub max: u64,
    pub field: &'static str,
}

/// Disk size in MB.
pub const DISK_SIZE: RangeConstraint = RangeConstraint {
    min: 256,
    max: 64 * 1024 * 1024,
    field: "disk_size",
};

/// Disk block size in MB. Zero never reaches this check, it is defaulted first.
pub const DISK_BLOCK_SIZE: RangeConstraint = RangeConstraint {
    min: 1,
    max: 256,
    field: "disk_block_size",
};

/// Memory in MB.
pub const RAM_SIZE: RangeConstraint = RangeConstraint {
    min: 32,
    max: 32 * 1024,
    field: "ram_size",
};

impl RangeConstraint {
    pub fn contains(&self, value: u64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub(crate) fn check(&self, value: u64, ctx: &mut ValidationCtx) {
        if !self.contains(value) {
            ctx.push(ConfigError::OutOfRange {
                field: self.field,
                value,
                min: self.min,
                max: self.max,
            });
        }
    }
}

/// Sentinel checksum type that disables ISO verification.
pub const CHECKSUM_TYPE_NONE: &str = "none";

/// Accepted `iso_checksum_type` values, the sentinel included.
pub const CHECKSUM_TYPES: &[&str] = &["md5", "sha1", "sha256", "sha512", CHECKSUM_TYPE_NONE];

pub const GUEST_ADDITIONS_NONE: &str = "none";
pub const GUEST_ADDITIONS_ATTACH: &str = "attach";
pub const GUEST_ADDITIONS_MODES: &[&str] = &[GUEST_ADDITIONS_NONE, GUEST_ADDITIONS_ATTACH];

pub const GENERATIONS: &[u64] = &[1, 2];

/// Check `value` against an allow-list. `value` must already be lowercased.
pub(crate) fn check_allowed(
    field: &'static str,
    value: &str,
    allowed: &'static [&'static str],
    ctx: &mut ValidationCtx,
) -> bool {
    if allowed.contains(&value) {
        return true;
    }
    ctx.push(ConfigError::UnsupportedValue {
        field,
        value: value.to_owned(),
        allowed,
    });
    false
}

/// Numeric counterpart of [`check_allowed`].
pub(crate) fn check_allowed_number(
    field: &'static str,
    value: u64,
    allowed: &'static [u64],
    ctx: &mut ValidationCtx,
) -> bool {
    if allowed.contains(&value) {
        return true;
    }
    ctx.push(ConfigError::UnsupportedNumber {
        field,
        value,
        allowed,
    });
    false
}
