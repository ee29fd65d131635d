//! Domain primitive types used across the nspath workspace.

use std::fmt;
use std::str::FromStr;

use nix::sys::stat;

/// A block device identifier, the `major:minor` pair the kernel reports
/// in `/proc/<pid>/mountinfo` and in `stat(2)`'s `st_dev`.
///
/// The pair is the link between two namespaces' views of the same
/// filesystem: a mount seen inside a container and a mount seen on the
/// host carry the same device numbers when they sit on the same
/// underlying storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Device {
    major: u32,
    minor: u32,
}

impl Device {
    /// Creates a device identifier from an explicit `major:minor` pair.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Creates a device identifier from a `dev_t` as returned by
    /// `stat(2)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_dev_t(dev: stat::dev_t) -> Self {
        Self {
            major: stat::major(dev) as u32,
            minor: stat::minor(dev) as u32,
        }
    }

    /// Returns the major device number.
    #[must_use]
    pub const fn major(self) -> u32 {
        self.major
    }

    /// Returns the minor device number.
    #[must_use]
    pub const fn minor(self) -> u32 {
        self.minor
    }
}

impl FromStr for Device {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s.split_once(':').unwrap_or((s, ""));
        Ok(Self {
            major: major.parse()?,
            minor: minor.parse()?,
        })
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}
