//! The fixed key schema of a Hyper-V ISO build and its typed binding.
//!
//! Decoding is done key by key so a type mismatch in one value is reported
//! against that key while every other key still reaches the validators.

use crate::error::{ConfigError, ValidationCtx};
use crate::settings::RawSettings;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Key carrying the identifier of the build this configuration belongs to.
pub const BUILD_NAME_KEY: &str = "packer_build_name";

/// Description of one accepted settings key, used for `hyperiso keys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    pub key: &'static str,
    pub kind: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

pub const SCHEMA: &[KeySpec] = &[
    KeySpec {
        key: BUILD_NAME_KEY,
        kind: "string",
        default: "hyperiso",
        description: "Identifier of the build, used to derive names",
    },
    KeySpec {
        key: "vm_name",
        kind: "string",
        default: "packer-<build name>",
        description: "Name of the virtual machine",
    },
    KeySpec {
        key: "output_directory",
        kind: "string",
        default: "output-<build name>",
        description: "Directory receiving the exported machine",
    },
    KeySpec {
        key: "iso_url",
        kind: "string",
        default: "",
        description: "Source ISO location (exclusive with iso_urls)",
    },
    KeySpec {
        key: "iso_urls",
        kind: "[string]",
        default: "",
        description: "Ordered source ISO locations (exclusive with iso_url)",
    },
    KeySpec {
        key: "iso_checksum",
        kind: "string",
        default: "",
        description: "Expected ISO checksum, required unless checksum type is none",
    },
    KeySpec {
        key: "iso_checksum_type",
        kind: "string",
        default: "",
        description: "One of md5, sha1, sha256, sha512 or none",
    },
    KeySpec {
        key: "disk_size",
        kind: "integer",
        default: "40960",
        description: "Virtual disk size in MB",
    },
    KeySpec {
        key: "disk_block_size",
        kind: "integer",
        default: "32",
        description: "Virtual disk block size in MB (1 to 256)",
    },
    KeySpec {
        key: "ram_size",
        kind: "integer",
        default: "1024",
        description: "Memory in MB (32 to 32768)",
    },
    KeySpec {
        key: "cpus",
        kind: "integer",
        default: "1",
        description: "Number of virtual processors",
    },
    KeySpec {
        key: "generation",
        kind: "integer",
        default: "1",
        description: "Virtual machine generation (1 or 2)",
    },
    KeySpec {
        key: "switch_name",
        kind: "string",
        default: "",
        description: "Virtual switch to attach the network adapter to",
    },
    KeySpec {
        key: "floppy_files",
        kind: "[string]",
        default: "",
        description: "Local files placed on the floppy image",
    },
    KeySpec {
        key: "guest_additions_mode",
        kind: "string",
        default: "none",
        description: "none or attach",
    },
    KeySpec {
        key: "guest_additions_path",
        kind: "string",
        default: "",
        description: "Integration services ISO, required when attaching",
    },
    KeySpec {
        key: "shutdown_command",
        kind: "string",
        default: "",
        description: "Command that gracefully halts the guest",
    },
    KeySpec {
        key: "ssh_username",
        kind: "string",
        default: "",
        description: "Communicator user name",
    },
    KeySpec {
        key: "headless",
        kind: "bool",
        default: "false",
        description: "Do not open a console window while building",
    },
];

/// Typed view of [`RawSettings`]. Keys outside the schema land in `unknown`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildSettings {
    pub packer_build_name: Option<String>,
    pub vm_name: Option<String>,
    pub output_directory: Option<String>,
    pub iso_url: Option<String>,
    pub iso_urls: Option<Vec<String>>,
    pub iso_checksum: Option<String>,
    pub iso_checksum_type: Option<String>,
    pub disk_size: Option<u64>,
    pub disk_block_size: Option<u64>,
    pub ram_size: Option<u64>,
    pub cpus: Option<u32>,
    pub generation: Option<u32>,
    pub switch_name: Option<String>,
    pub floppy_files: Option<Vec<String>>,
    pub guest_additions_mode: Option<String>,
    pub guest_additions_path: Option<String>,
    pub shutdown_command: Option<String>,
    pub ssh_username: Option<String>,
    pub headless: Option<bool>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

impl BuildSettings {
    /// Decode `raw`, recording type mismatches and unknown keys in `ctx`.
    pub(crate) fn decode(raw: &RawSettings, ctx: &mut ValidationCtx) -> Self {
        let mut accepted = toml::Table::new();
        for (key, value) in raw.iter() {
            let mut single = toml::Table::new();
            single.insert(key.clone(), value.clone());
            match toml::Value::Table(single).try_into::<BuildSettings>() {
                Ok(_) => {
                    accepted.insert(key.clone(), value.clone());
                }
                Err(e) => ctx.push(ConfigError::InvalidType {
                    key: key.clone(),
                    message: e.to_string().trim().to_owned(),
                }),
            }
        }

        let settings = match toml::Value::Table(accepted).try_into::<BuildSettings>() {
            Ok(settings) => settings,
            Err(e) => {
                ctx.push(ConfigError::InvalidType {
                    key: "<settings>".to_owned(),
                    message: e.to_string().trim().to_owned(),
                });
                BuildSettings::default()
            }
        };

        if !settings.unknown.is_empty() {
            ctx.push(ConfigError::UnknownKeys {
                keys: settings.unknown.keys().cloned().collect(),
            });
        }

        settings
    }
}
