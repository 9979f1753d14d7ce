use crate::constraints::GUEST_ADDITIONS_NONE;
use crate::schema::BuildSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_BUILD_NAME: &str = "hyperiso";
pub const VM_NAME_PREFIX: &str = "packer";
pub const OUTPUT_DIRECTORY_PREFIX: &str = "output";
pub const DEFAULT_DISK_SIZE: u64 = 40 * 1024;
pub const DEFAULT_DISK_BLOCK_SIZE: u64 = 32;
pub const DEFAULT_RAM_SIZE: u64 = 1024;
pub const DEFAULT_CPUS: u32 = 1;
pub const DEFAULT_GENERATION: u32 = 1;

/// Fully typed build configuration handed to the provisioning driver.
///
/// Only meaningful when `prepare` reported no errors. On failure the same
/// type carries whatever could be resolved, for diagnostics only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub build_name: String,
    pub vm_name: String,
    pub output_directory: String,
    pub iso_urls: Vec<String>,
    pub iso_checksum: String,
    pub iso_checksum_type: String,
    pub disk_size: u64,
    pub disk_block_size: u64,
    pub ram_size: u64,
    pub cpus: u32,
    pub generation: u32,
    pub switch_name: Option<String>,
    pub floppy_files: Vec<PathBuf>,
    pub guest_additions_mode: String,
    pub guest_additions_path: Option<PathBuf>,
    pub shutdown_command: Option<String>,
    pub ssh_username: Option<String>,
    pub headless: bool,
}

impl BuildSettings {
    /// Substitute defaults for every optional field that is unset or zero.
    ///
    /// Never fails. Source URLs are left empty here; the source validator
    /// resolves them since that requires the exclusivity check.
    pub fn normalize(&self) -> ResolvedConfig {
        let build_name = non_blank(self.packer_build_name.as_ref())
            .unwrap_or_else(|| DEFAULT_BUILD_NAME.to_owned());

        let vm_name = non_blank(self.vm_name.as_ref()).unwrap_or_else(|| {
            let derived = format!("{VM_NAME_PREFIX}-{build_name}");
            debug!("vm_name not set, using {derived}");
            derived
        });
        let output_directory = non_blank(self.output_directory.as_ref())
            .unwrap_or_else(|| format!("{OUTPUT_DIRECTORY_PREFIX}-{build_name}"));

        ResolvedConfig {
            vm_name,
            output_directory,
            iso_urls: Vec::new(),
            iso_checksum: self.iso_checksum.as_deref().unwrap_or("").trim().to_owned(),
            iso_checksum_type: self
                .iso_checksum_type
                .as_deref()
                .unwrap_or("")
                .trim()
                .to_owned(),
            disk_size: or_default("disk_size", self.disk_size, DEFAULT_DISK_SIZE),
            disk_block_size: or_default(
                "disk_block_size",
                self.disk_block_size,
                DEFAULT_DISK_BLOCK_SIZE,
            ),
            ram_size: or_default("ram_size", self.ram_size, DEFAULT_RAM_SIZE),
            cpus: or_default("cpus", self.cpus, DEFAULT_CPUS),
            generation: or_default("generation", self.generation, DEFAULT_GENERATION),
            switch_name: non_blank(self.switch_name.as_ref()),
            floppy_files: self
                .floppy_files
                .iter()
                .flatten()
                .map(PathBuf::from)
                .collect(),
            guest_additions_mode: non_blank(self.guest_additions_mode.as_ref())
                .unwrap_or_else(|| GUEST_ADDITIONS_NONE.to_owned()),
            guest_additions_path: non_blank(self.guest_additions_path.as_ref()).map(PathBuf::from),
            shutdown_command: non_blank(self.shutdown_command.as_ref()),
            ssh_username: non_blank(self.ssh_username.as_ref()),
            headless: self.headless.unwrap_or(false),
            build_name,
        }
    }
}

/// Zero counts as unset.
fn or_default<T>(field: &str, value: Option<T>, default: T) -> T
where
    T: Copy + Default + PartialEq + std::fmt::Display,
{
    match value {
        Some(v) if v != T::default() => v,
        _ => {
            debug!("{field} not set, defaulting to {default}");
            default
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_get_every_default() {
        let config = BuildSettings::default().normalize();
        assert_eq!(config.build_name, "hyperiso");
        assert_eq!(config.vm_name, "packer-hyperiso");
        assert_eq!(config.output_directory, "output-hyperiso");
        assert_eq!(config.disk_size, 40 * 1024);
        assert_eq!(config.disk_block_size, 32);
        assert_eq!(config.ram_size, 1024);
        assert_eq!(config.cpus, 1);
        assert_eq!(config.generation, 1);
        assert_eq!(config.guest_additions_mode, "none");
        assert!(config.floppy_files.is_empty());
        assert!(!config.headless);
    }

    #[test]
    fn names_derive_from_build_name() {
        let settings = BuildSettings {
            packer_build_name: Some("foo".to_owned()),
            ..BuildSettings::default()
        };
        let config = settings.normalize();
        assert_eq!(config.vm_name, "packer-foo");
        assert_eq!(config.output_directory, "output-foo");
    }

    #[test]
    fn explicit_names_win_over_derived() {
        let settings = BuildSettings {
            packer_build_name: Some("foo".to_owned()),
            vm_name: Some("win-2022".to_owned()),
            output_directory: Some("out".to_owned()),
            ..BuildSettings::default()
        };
        let config = settings.normalize();
        assert_eq!(config.vm_name, "win-2022");
        assert_eq!(config.output_directory, "out");
    }

    #[test]
    fn zero_is_treated_as_unset() {
        let settings = BuildSettings {
            disk_size: Some(0),
            disk_block_size: Some(0),
            ram_size: Some(0),
            cpus: Some(0),
            generation: Some(0),
            ..BuildSettings::default()
        };
        let config = settings.normalize();
        assert_eq!(config.disk_size, DEFAULT_DISK_SIZE);
        assert_eq!(config.disk_block_size, DEFAULT_DISK_BLOCK_SIZE);
        assert_eq!(config.ram_size, DEFAULT_RAM_SIZE);
        assert_eq!(config.cpus, DEFAULT_CPUS);
        assert_eq!(config.generation, DEFAULT_GENERATION);
    }

    #[test]
    fn explicit_values_pass_through_unchecked() {
        let settings = BuildSettings {
            disk_size: Some(256),
            disk_block_size: Some(32 * 1024),
            ..BuildSettings::default()
        };
        let config = settings.normalize();
        assert_eq!(config.disk_size, 256);
        assert_eq!(config.disk_block_size, 32 * 1024);
    }

    #[test]
    fn floppy_files_keep_order_and_duplicates() {
        let settings = BuildSettings {
            floppy_files: Some(vec![
                "b.ps1".to_owned(),
                "a.bat".to_owned(),
                "b.ps1".to_owned(),
            ]),
            ..BuildSettings::default()
        };
        let config = settings.normalize();
        assert_eq!(
            config.floppy_files,
            vec![
                PathBuf::from("b.ps1"),
                PathBuf::from("a.bat"),
                PathBuf::from("b.ps1")
            ]
        );
    }

    #[test]
    fn blank_strings_are_unset() {
        let settings = BuildSettings {
            packer_build_name: Some("  ".to_owned()),
            switch_name: Some(String::new()),
            guest_additions_mode: Some(" ".to_owned()),
            ..BuildSettings::default()
        };
        let config = settings.normalize();
        assert_eq!(config.build_name, DEFAULT_BUILD_NAME);
        assert_eq!(config.switch_name, None);
        assert_eq!(config.guest_additions_mode, GUEST_ADDITIONS_NONE);
    }
}
