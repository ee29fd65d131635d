//! The aggregate view of one translation request.
//!
//! A [`MountNamespace`] pairs the target process's ordered mount table
//! with the host's device table and resolves namespace-local paths into
//! host path candidates. Instances are ephemeral: each translation
//! builds its own and discards it, so nothing here is shared or cached.

use crate::mountinfo::MountInfoRecord;
use crate::mounts::HostDeviceEntry;

/// Both sides of a translation: the host device table and the target
/// namespace's full mount list.
#[derive(Debug, Default)]
pub struct MountNamespace {
    devices: Vec<HostDeviceEntry>,
    mounts: Vec<MountInfoRecord>,
}

/// Joins a base path with a `/`-leading (or empty) suffix.
fn join_suffix(base: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return base.to_string();
    }
    format!("{}{suffix}", base.trim_end_matches('/'))
}

/// Computes the part of a record's `root` that lies below the host
/// mount's btrfs subvolume, if any.
///
/// A host btrfs mount with `subvol=S` is already attached inside `S`,
/// so a record rooted at `S/x` reaches the host path at offset `/x`.
/// When the root does not sit inside the subvolume the offset is left
/// untouched; the caller's existence filter decides.
fn root_offset(root: &str, subvolume: Option<&str>) -> String {
    let offset = if root == "/" { "" } else { root };
    let Some(subvol) = subvolume else {
        return offset.to_string();
    };

    let subvol = subvol.trim_end_matches('/');
    let subvol = if subvol.is_empty() || subvol.starts_with('/') {
        subvol.to_string()
    } else {
        format!("/{subvol}")
    };

    if offset == subvol {
        return String::new();
    }
    if let Some(rest) = offset.strip_prefix(subvol.as_str()) {
        if rest.starts_with('/') {
            return rest.to_string();
        }
    }
    offset.to_string()
}

/// Whether a host entry and a mountinfo record describe the same
/// underlying device.
///
/// The stat-derived `major:minor` annotation and the device string are
/// two spellings of the same kernel identity; either suffices. The
/// string link requires a path-like source: names like `tmpfs` or
/// `proc` recur across unrelated mounts and identify nothing.
fn same_device(entry: &HostDeviceEntry, record: &MountInfoRecord) -> bool {
    if entry.device_numbers() == Some(record.device()) {
        return true;
    }
    record
        .mount_source()
        .is_some_and(|source| source.starts_with('/') && source == entry.device())
}

impl MountNamespace {
    /// Creates an empty namespace.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            devices: Vec::new(),
            mounts: Vec::new(),
        }
    }

    /// Appends a mount record to the ordered mount list.
    pub fn add_mount(&mut self, record: MountInfoRecord) {
        self.mounts.push(record);
    }

    /// Registers a host device entry.
    ///
    /// Duplicate device strings are kept; matching scans entries
    /// newest-first, so a re-registered device behaves as if it had
    /// overwritten the earlier entry.
    pub fn add_device(&mut self, entry: HostDeviceEntry) {
        self.devices.push(entry);
    }

    /// The ordered mount list of the target namespace.
    #[must_use]
    pub fn mounts(&self) -> &[MountInfoRecord] {
        &self.mounts
    }

    /// The host device table.
    #[must_use]
    pub fn devices(&self) -> &[HostDeviceEntry] {
        &self.devices
    }

    /// Resolves a namespace-local path into ordered host candidates.
    ///
    /// Every mount whose mount point prefixes `path` contributes:
    /// overlay records resolve straight to their host-side source,
    /// other records go through the host device table and splice the
    /// host mount point, the record's root offset (subvolume-adjusted),
    /// and the within-mount suffix. Candidates are ordered deepest
    /// mount point first; among equal depths the record added latest
    /// wins. An empty result is the normal "no translation" outcome,
    /// never an error.
    #[must_use]
    pub fn translate(&self, path: &str) -> Vec<String> {
        if path.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(usize, String)> = Vec::new();
        for record in self.mounts.iter().rev() {
            let Some(suffix) = record.get_relative_path(path) else {
                continue;
            };
            let depth = record.mount_point().len();

            if record.is_overlay() {
                if let Some(source) = record.mount_source() {
                    ranked.push((depth, join_suffix(source, &suffix)));
                }
                continue;
            }

            for entry in self.devices.iter().rev() {
                if !same_device(entry, record) {
                    continue;
                }
                let offset = root_offset(record.root(), entry.subvolume());
                let base = join_suffix(entry.mount_point(), &offset);
                ranked.push((depth, join_suffix(&base, &suffix)));
            }
        }

        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        tracing::debug!(path, candidates = ranked.len(), "path translation candidates");
        ranked.into_iter().map(|(_, candidate)| candidate).collect()
    }
}

#[cfg(test)]
mod tests {
    use nspath_common::types::Device;

    use super::*;

    fn record(line: &str) -> MountInfoRecord {
        MountInfoRecord::parse(line).expect("fixture line should parse")
    }

    fn namespace_with_root_device() -> MountNamespace {
        let mut ns = MountNamespace::new();
        ns.add_device(HostDeviceEntry::new("/dev/sda1", "/"));
        ns
    }

    #[test]
    fn translate_through_root_mount() {
        let mut ns = namespace_with_root_device();
        ns.add_mount(record("100 1 8:1 / /app/data rw - ext4 /dev/sda1 rw"));

        let candidates = ns.translate("/app/data/config.txt");
        assert_eq!(candidates, vec!["/config.txt".to_string()]);
    }

    #[test]
    fn translate_by_device_numbers() {
        let mut ns = MountNamespace::new();
        ns.add_device(
            HostDeviceEntry::new("/dev/root", "/srv").with_device_numbers(Device::new(8, 1)),
        );
        ns.add_mount(record("100 1 8:1 / /data rw - ext4 /dev/sda1 rw"));

        let candidates = ns.translate("/data/file");
        assert_eq!(candidates, vec!["/srv/file".to_string()]);
    }

    #[test]
    fn translate_ignores_pseudo_filesystem_source_names() {
        let mut ns = MountNamespace::new();
        ns.add_device(HostDeviceEntry::new("tmpfs", "/run"));
        ns.add_mount(record("90 1 0:25 / /dev/shm rw - tmpfs tmpfs rw"));

        assert!(ns.translate("/dev/shm/sock").is_empty());
    }

    #[test]
    fn translate_skips_unrelated_devices() {
        let mut ns = MountNamespace::new();
        ns.add_device(HostDeviceEntry::new("/dev/sdb1", "/mnt"));
        ns.add_mount(record("100 1 8:1 / /data rw - ext4 /dev/sda1 rw"));

        assert!(ns.translate("/data/file").is_empty());
    }

    #[test]
    fn translate_prefers_deeper_mounts() {
        let mut ns = namespace_with_root_device();
        ns.add_mount(record("36 1 8:1 / / rw - ext4 /dev/sda1 rw"));
        ns.add_mount(record(
            "99 36 8:1 /var/lib/containers /var/lib/containers rw - ext4 /dev/sda1 rw",
        ));

        let candidates = ns.translate("/var/lib/containers/x");
        assert_eq!(
            candidates,
            vec![
                "/var/lib/containers/x".to_string(),
                "/var/lib/containers/x".to_string(),
            ]
        );
        // Deeper mount first: its candidate includes the bind-mount root.
        let mut ns = namespace_with_root_device();
        ns.add_mount(record("36 1 8:1 / / rw - ext4 /dev/sda1 rw"));
        ns.add_mount(record(
            "99 36 8:1 /storage /var/lib/containers rw - ext4 /dev/sda1 rw",
        ));
        let candidates = ns.translate("/var/lib/containers/x");
        assert_eq!(
            candidates,
            vec![
                "/storage/x".to_string(),
                "/var/lib/containers/x".to_string(),
            ]
        );
    }

    #[test]
    fn translate_later_mount_wins_at_equal_depth() {
        let mut ns = namespace_with_root_device();
        ns.add_mount(record("50 1 8:1 /old /data rw - ext4 /dev/sda1 rw"));
        ns.add_mount(record("60 1 8:1 /new /data rw - ext4 /dev/sda1 rw"));

        let candidates = ns.translate("/data/f");
        assert_eq!(candidates, vec!["/new/f".to_string(), "/old/f".to_string()]);
    }

    #[test]
    fn translate_bind_mount_includes_root_subtree() {
        let mut ns = MountNamespace::new();
        ns.add_device(HostDeviceEntry::new("/dev/sda1", "/mnt/disk"));
        ns.add_mount(record("80 1 8:1 /data/sub /work rw - ext4 /dev/sda1 rw"));

        let candidates = ns.translate("/work/notes.txt");
        assert_eq!(candidates, vec!["/mnt/disk/data/sub/notes.txt".to_string()]);
    }

    #[test]
    fn translate_overlay_resolves_to_host_source() {
        let mut ns = MountNamespace::new();
        ns.add_mount(MountInfoRecord::new_for_overlay("/", "/var/lib/storage/layer0", 0));
        ns.add_mount(MountInfoRecord::new_for_overlay("/", "/var/lib/storage/layer1", 1));

        let candidates = ns.translate("/etc/os-release");
        assert_eq!(
            candidates,
            vec![
                "/var/lib/storage/layer1/etc/os-release".to_string(),
                "/var/lib/storage/layer0/etc/os-release".to_string(),
            ]
        );
    }

    #[test]
    fn translate_btrfs_subvolume_offset() {
        // Host mounts subvol /@home at /home; the container's bind mount
        // is rooted at /@home/user inside the same filesystem.
        let mut ns = MountNamespace::new();
        ns.add_device(
            HostDeviceEntry::new("/dev/sda2", "/home").with_subvolume("/@home"),
        );
        ns.add_mount(record(
            "70 1 8:2 /@home/user /data rw - btrfs /dev/sda2 rw,subvol=/@home",
        ));

        let candidates = ns.translate("/data/doc.txt");
        assert_eq!(candidates, vec!["/home/user/doc.txt".to_string()]);
    }

    #[test]
    fn translate_btrfs_root_equals_subvolume() {
        let mut ns = MountNamespace::new();
        ns.add_device(
            HostDeviceEntry::new("/dev/sda2", "/home").with_subvolume("/@home"),
        );
        ns.add_mount(record(
            "70 1 8:2 /@home /data rw - btrfs /dev/sda2 rw,subvol=/@home",
        ));

        let candidates = ns.translate("/data/doc.txt");
        assert_eq!(candidates, vec!["/home/doc.txt".to_string()]);
    }

    #[test]
    fn translate_btrfs_top_level_subvolume_keeps_root() {
        let mut ns = MountNamespace::new();
        ns.add_device(HostDeviceEntry::new("/dev/sda2", "/vol").with_subvolume("/"));
        ns.add_mount(record("70 1 8:2 /data /data rw - btrfs /dev/sda2 rw,subvol=/"));

        let candidates = ns.translate("/data/doc.txt");
        assert_eq!(candidates, vec!["/vol/data/doc.txt".to_string()]);
    }

    #[test]
    fn translate_empty_path_yields_nothing() {
        let mut ns = namespace_with_root_device();
        ns.add_mount(record("36 1 8:1 / / rw - ext4 /dev/sda1 rw"));
        assert!(ns.translate("").is_empty());
    }

    #[test]
    fn translate_mount_point_itself() {
        let mut ns = namespace_with_root_device();
        ns.add_mount(record("100 1 8:1 /sub /app rw - ext4 /dev/sda1 rw"));
        assert_eq!(ns.translate("/app"), vec!["/sub".to_string()]);
    }

    #[test]
    fn duplicate_device_strings_scan_newest_first() {
        let mut ns = MountNamespace::new();
        ns.add_device(HostDeviceEntry::new("/dev/sda1", "/old"));
        ns.add_device(HostDeviceEntry::new("/dev/sda1", "/new"));
        ns.add_mount(record("100 1 8:1 / /data rw - ext4 /dev/sda1 rw"));

        let candidates = ns.translate("/data/f");
        assert_eq!(candidates, vec!["/new/f".to_string(), "/old/f".to_string()]);
    }
}
