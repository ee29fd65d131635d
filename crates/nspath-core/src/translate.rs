//! The public translation entry point.
//!
//! Given a PID and an absolute path as seen inside that process's mount
//! namespace, [`PathTranslator`] builds an ephemeral [`MountNamespace`]
//! from `/proc` and returns the first translated candidate that exists
//! on the host filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use nspath_common::constants::{MOUNTINFO_FILE, MOUNTS_FILE, PROC_ROOT};
use nspath_common::error::{NspathError, Result};

use crate::mountinfo::MountInfoRecord;
use crate::mounts::HostDeviceEntry;
use crate::namespace::MountNamespace;

/// Translates paths out of other processes' mount namespaces.
///
/// Stateless apart from the proc root: every call reads `/proc` afresh
/// and builds its own namespace, so a single translator may be shared
/// across threads freely.
#[derive(Debug, Clone)]
pub struct PathTranslator {
    proc_root: PathBuf,
}

impl PathTranslator {
    /// Creates a translator over the system `/proc`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            proc_root: PathBuf::from(PROC_ROOT),
        }
    }

    /// Creates a translator over an alternate proc root.
    ///
    /// Intended for tests, which fabricate a proc tree on disk instead
    /// of depending on live mounts.
    #[must_use]
    pub fn with_proc_root(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    /// Builds a namespace holding only the host device table.
    ///
    /// Best-effort: an unreadable mounts file yields an empty table and
    /// translation degrades to "no host device matched". Each parsed
    /// entry is annotated with the `major:minor` of its mount point
    /// where `stat(2)` allows.
    #[must_use]
    pub fn build_host_namespace(&self) -> MountNamespace {
        let mut namespace = MountNamespace::new();
        let path = self.proc_root.join(MOUNTS_FILE);
        let Ok(text) = fs::read_to_string(&path) else {
            tracing::debug!(path = %path.display(), "host mount table unreadable");
            return namespace;
        };

        for mut entry in HostDeviceEntry::parse_all(&text) {
            entry.probe_device_numbers();
            namespace.add_device(entry);
        }
        tracing::debug!(devices = namespace.devices().len(), "host mount table loaded");
        namespace
    }

    /// Translates `path` from the mount namespace of `pid` into a host
    /// path that exists on disk.
    ///
    /// # Errors
    ///
    /// [`NspathError::InvalidArgument`] for a non-positive pid or a
    /// path that is empty or not absolute;
    /// [`NspathError::MountTable`] when `/proc/<pid>/mountinfo` cannot
    /// be read; [`NspathError::NotFound`] when no candidate exists on
    /// the host filesystem.
    pub fn translate_path(&self, pid: i32, path: &str) -> Result<PathBuf> {
        self.translate_path_with_overlays(pid, path, Vec::new())
    }

    /// Translates `path` with additional synthetic overlay mounts.
    ///
    /// Container providers seed the namespace with records built via
    /// [`MountInfoRecord::new_for_overlay`] so that paths inside a
    /// container's overlay filesystem resolve straight to the host-side
    /// layer directories. The records are appended after the parsed
    /// mount table, so at equal mount-point depth they take precedence;
    /// callers order multiple layers by inserting the topmost last.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`PathTranslator::translate_path`].
    pub fn translate_path_with_overlays(
        &self,
        pid: i32,
        path: &str,
        overlays: Vec<MountInfoRecord>,
    ) -> Result<PathBuf> {
        if pid <= 0 {
            return Err(NspathError::InvalidArgument {
                message: format!("pid must be positive, got {pid}"),
            });
        }
        if path.is_empty() || !path.starts_with('/') {
            return Err(NspathError::InvalidArgument {
                message: format!("path must be non-empty and absolute, got {path:?}"),
            });
        }

        let mut namespace = self.build_host_namespace();

        let info_path = self
            .proc_root
            .join(pid.to_string())
            .join(MOUNTINFO_FILE);
        let text = fs::read_to_string(&info_path)
            .map_err(|e| NspathError::MountTable { pid, source: e })?;

        for record in MountInfoRecord::parse_all(&text) {
            namespace.add_mount(record);
        }
        for overlay in overlays {
            namespace.add_mount(overlay);
        }
        tracing::debug!(pid, mounts = namespace.mounts().len(), "target mount table loaded");

        for candidate in namespace.translate(path) {
            let host = Path::new(&candidate);
            if host.exists() {
                tracing::debug!(pid, path, host = %host.display(), "path translated");
                return Ok(host.to_path_buf());
            }
            tracing::debug!(pid, path, %candidate, "candidate does not exist on host");
        }

        Err(NspathError::NotFound {
            path: path.to_string(),
        })
    }
}

impl Default for PathTranslator {
    fn default() -> Self {
        Self::new()
    }
}
