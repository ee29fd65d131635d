//! System-wide constants and `/proc` locations.

/// Root of the proc pseudo-filesystem.
pub const PROC_ROOT: &str = "/proc";

/// File under [`PROC_ROOT`] listing the mounts of the current namespace.
pub const MOUNTS_FILE: &str = "mounts";

/// File under `<proc>/<pid>/` describing that process's mount table.
pub const MOUNTINFO_FILE: &str = "mountinfo";

/// Maximum number of space-separated fields in a mountinfo line.
///
/// Mirrors the kernel's fixed field count for the format; anything past
/// the cap stays glued to the final field.
pub const MOUNTINFO_MAX_FIELDS: usize = 20;

/// Minimum number of fields for a mountinfo line to be usable.
pub const MOUNTINFO_MIN_FIELDS: usize = 10;

/// Number of space-separated fields expected in a `/proc/mounts` line.
pub const MOUNTS_FIELDS: usize = 5;

/// Marker separating the variable optional-fields group from the fixed
/// trailing group (fstype, source, superblock options) in mountinfo.
pub const OPTIONAL_FIELDS_END: &str = "-";

/// Filesystem type whose mounts carry a `subvol=` option.
pub const BTRFS_FSTYPE: &str = "btrfs";

/// Superblock/mount option naming a btrfs subvolume.
pub const SUBVOL_OPTION: &str = "subvol";
