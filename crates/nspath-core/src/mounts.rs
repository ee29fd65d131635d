//! Rows of the host's `/proc/mounts` table.
//!
//! The host table is the target-namespace table's counterpart during
//! translation: a mountinfo record names a device, and the host table
//! says where that device is attached on this side.

use std::path::Path;

use nix::sys::stat;

use nspath_common::constants::{BTRFS_FSTYPE, MOUNTS_FIELDS, SUBVOL_OPTION};
use nspath_common::types::Device;

/// One mount as seen from the host namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDeviceEntry {
    device: String,
    mount_point: String,
    subvolume: Option<String>,
    device_numbers: Option<Device>,
}

/// Decodes the kernel's `\040` escape back to a literal space.
///
/// Spaces are the field separator in `/proc/mounts`, so the kernel
/// octal-escapes them inside field values. No other escape occurs in
/// the fields this code consumes.
#[must_use]
pub fn decode_octal_spaces(field: &str) -> String {
    field.replace("\\040", " ")
}

impl HostDeviceEntry {
    /// Creates an entry from explicit device and mount-point strings.
    #[must_use]
    pub fn new(device: impl Into<String>, mount_point: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            mount_point: mount_point.into(),
            subvolume: None,
            device_numbers: None,
        }
    }

    /// Parses one `/proc/mounts` line.
    ///
    /// The format is `device mountpoint filesystem options dump pass`;
    /// only the first four fields are consumed and each has `\040`
    /// escapes decoded. Lines with fewer than [`MOUNTS_FIELDS`] fields
    /// yield `None`. For btrfs mounts the `subvol=` option value is
    /// extracted.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.splitn(MOUNTS_FIELDS, ' ').collect();
        if fields.len() != MOUNTS_FIELDS {
            return None;
        }

        let device = decode_octal_spaces(fields[0]);
        let mount_point = decode_octal_spaces(fields[1]);
        let filesystem = decode_octal_spaces(fields[2]);
        let options = decode_octal_spaces(fields[3]);

        let subvolume = if filesystem == BTRFS_FSTYPE {
            options.split(',').find_map(|token| {
                token
                    .split_once('=')
                    .filter(|(key, _)| *key == SUBVOL_OPTION)
                    .map(|(_, value)| value.to_string())
            })
        } else {
            None
        };

        Some(Self {
            device,
            mount_point,
            subvolume,
            device_numbers: None,
        })
    }

    /// Parses a whole `/proc/mounts` buffer, silently skipping
    /// malformed lines. No device-number annotation is performed.
    #[must_use]
    pub fn parse_all(text: &str) -> Vec<Self> {
        text.lines().filter_map(Self::parse).collect()
    }

    /// Annotates this entry with the `major:minor` pair of its mount
    /// point, obtained via `stat(2)`.
    ///
    /// Best-effort: a failed stat (mount point gone, permission denied)
    /// leaves the annotation absent, and matching falls back to the
    /// device string alone.
    pub fn probe_device_numbers(&mut self) {
        if let Ok(st) = stat::stat(Path::new(&self.mount_point)) {
            self.device_numbers = Some(Device::from_dev_t(st.st_dev));
        }
    }

    /// Sets the device-number annotation explicitly.
    #[must_use]
    pub const fn with_device_numbers(mut self, device: Device) -> Self {
        self.device_numbers = Some(device);
        self
    }

    /// Sets the btrfs subvolume explicitly.
    #[must_use]
    pub fn with_subvolume(mut self, subvolume: impl Into<String>) -> Self {
        self.subvolume = Some(subvolume.into());
        self
    }

    /// Device or source string as listed in `/proc/mounts`.
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Absolute path where this mount is attached on the host.
    #[must_use]
    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    /// Btrfs subvolume this mount exposes, when the filesystem is
    /// btrfs and the mount carries a `subvol=` option.
    #[must_use]
    pub fn subvolume(&self) -> Option<&str> {
        self.subvolume.as_deref()
    }

    /// Stat-derived `major:minor` of the mount point, when known.
    #[must_use]
    pub const fn device_numbers(&self) -> Option<Device> {
        self.device_numbers
    }
}
