//! Rows of a mount namespace's mount table.
//!
//! One [`MountInfoRecord`] corresponds to one line of
//! `/proc/<pid>/mountinfo`. Parsing is deliberately permissive: the
//! kernel is free to append fields over time, and a line this code
//! cannot make sense of is dropped rather than failing the whole table.

use nspath_common::constants::{
    MOUNTINFO_MAX_FIELDS, MOUNTINFO_MIN_FIELDS, OPTIONAL_FIELDS_END,
};
use nspath_common::types::Device;

/// One mount in a namespace's mount table.
///
/// Parsed records come from `mountinfo` lines; synthetic records
/// representing container overlay layers are built with
/// [`MountInfoRecord::new_for_overlay`] and carry no device numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountInfoRecord {
    mount_id: i64,
    parent_mount_id: i64,
    device: Device,
    root: String,
    mount_point: String,
    mount_source: Option<String>,
    filesystem_type: Option<String>,
    superblock_options: Option<String>,
    is_overlay: bool,
    layer: u32,
}

/// Parses a decimal integer from the leading digits of a field.
///
/// Mirrors `strtoll` semantics: a field with no leading digits yields 0.
fn parse_decimal(field: &str) -> i64 {
    let end = field
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(field.len(), |(idx, _)| idx);
    field[..end].parse().unwrap_or(0)
}

impl MountInfoRecord {
    /// Parses one `mountinfo` line.
    ///
    /// The line is split on single spaces into at most
    /// [`MOUNTINFO_MAX_FIELDS`] fields. Lines with fewer than
    /// [`MOUNTINFO_MIN_FIELDS`] fields yield `None` and are skipped by
    /// callers. The trailing group after the `-` separator (filesystem
    /// type, mount source, superblock options) is optional field by
    /// field; whatever is missing is simply left unset.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.splitn(MOUNTINFO_MAX_FIELDS, ' ').collect();
        if fields.len() < MOUNTINFO_MIN_FIELDS {
            return None;
        }

        let mut record = Self {
            mount_id: parse_decimal(fields[0]),
            parent_mount_id: parse_decimal(fields[1]),
            device: fields[2].parse().unwrap_or_default(),
            root: fields[3].to_string(),
            mount_point: fields[4].to_string(),
            mount_source: None,
            filesystem_type: None,
            superblock_options: None,
            is_overlay: false,
            layer: 0,
        };

        let mut trailing = fields[5..]
            .iter()
            .skip_while(|field| **field != OPTIONAL_FIELDS_END)
            .skip(1);
        record.filesystem_type = trailing.next().map(ToString::to_string);
        record.mount_source = trailing.next().map(ToString::to_string);
        record.superblock_options = trailing.next().map(ToString::to_string);

        Some(record)
    }

    /// Parses a whole `mountinfo` buffer, silently skipping malformed
    /// lines.
    #[must_use]
    pub fn parse_all(text: &str) -> Vec<Self> {
        text.lines().filter_map(Self::parse).collect()
    }

    /// Builds a synthetic record for a container overlay layer.
    ///
    /// The record is rooted at `/`, carries the host-side layer
    /// directory as its mount source, and has no device numbers since
    /// it does not come from `mountinfo`. `layer` is an ordinal the
    /// caller uses to order multiple layers; insertion order decides
    /// precedence among records with the same mount point.
    #[must_use]
    pub fn new_for_overlay(
        mount_point: impl Into<String>,
        host_path: impl Into<String>,
        layer: u32,
    ) -> Self {
        Self {
            mount_id: 0,
            parent_mount_id: 0,
            device: Device::default(),
            root: "/".to_string(),
            mount_point: mount_point.into(),
            mount_source: Some(host_path.into()),
            filesystem_type: None,
            superblock_options: None,
            is_overlay: true,
            layer,
        }
    }

    /// Unique ID of this mount within its namespace.
    #[must_use]
    pub const fn mount_id(&self) -> i64 {
        self.mount_id
    }

    /// ID of the parent mount in the namespace-local mount tree.
    #[must_use]
    pub const fn parent_mount_id(&self) -> i64 {
        self.parent_mount_id
    }

    /// Device numbers of the filesystem backing this mount.
    #[must_use]
    pub const fn device(&self) -> Device {
        self.device
    }

    /// Path of the directory within the filesystem that forms the root
    /// of this mount. Non-root values indicate a bind mount of a
    /// subtree.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Absolute path where this mount is attached, as seen inside the
    /// owning namespace.
    #[must_use]
    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    /// Device or source path as reported by the kernel, when present.
    #[must_use]
    pub fn mount_source(&self) -> Option<&str> {
        self.mount_source.as_deref()
    }

    /// Filesystem type, when present.
    #[must_use]
    pub fn filesystem_type(&self) -> Option<&str> {
        self.filesystem_type.as_deref()
    }

    /// Full comma-separated superblock options string, when present.
    #[must_use]
    pub fn superblock_options(&self) -> Option<&str> {
        self.superblock_options.as_deref()
    }

    /// Whether this is a synthetic container-overlay record.
    #[must_use]
    pub const fn is_overlay(&self) -> bool {
        self.is_overlay
    }

    /// Layer ordinal of a synthetic overlay record (0 for parsed rows).
    #[must_use]
    pub const fn layer(&self) -> u32 {
        self.layer
    }

    /// Looks up a single superblock option by name.
    ///
    /// A `key=value` option yields its value; a bare flag yields the
    /// empty string; an absent option (or an absent options string)
    /// yields `None`.
    #[must_use]
    pub fn get_superblock_option(&self, name: &str) -> Option<String> {
        let options = self.superblock_options.as_deref()?;
        for token in options.split(',') {
            match token.split_once('=') {
                Some((key, value)) if key == name => return Some(value.to_string()),
                None if token == name => return Some(String::new()),
                _ => {}
            }
        }
        None
    }

    /// Computes the suffix of `path` below this record's mount point.
    ///
    /// The root mount `/` matches every absolute path and returns it
    /// whole. For any other mount point the prefix must end on a `/`
    /// boundary (`/homeless` is not under `/home`); a path exactly
    /// equal to the mount point yields the empty suffix.
    #[must_use]
    pub fn get_relative_path(&self, path: &str) -> Option<String> {
        if self.mount_point == "/" {
            return Some(path.to_string());
        }
        let suffix = path.strip_prefix(&self.mount_point)?;
        if suffix.is_empty() || suffix.starts_with('/') {
            return Some(suffix.to_string());
        }
        None
    }
}
