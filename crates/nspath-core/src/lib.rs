//! # nspath-core
//!
//! Mount-table parsing and cross-namespace path translation.
//!
//! Given a process ID and an absolute path as seen inside that
//! process's mount namespace (for example, inside a container), this
//! crate computes the corresponding path in the current namespace:
//!
//! - [`mountinfo`]: one parsed row of `/proc/<pid>/mountinfo`.
//! - [`mounts`]: one parsed row of the host's `/proc/mounts`.
//! - [`namespace`]: the aggregate mount table and the resolution
//!   algorithm.
//! - [`translate`]: the public entry point that loads `/proc` and
//!   filters candidates down to paths that exist on the host.
//!
//! All I/O is synchronous, read-only, and scoped to a single call;
//! nothing is cached between translations.

pub mod mountinfo;
pub mod mounts;
pub mod namespace;
pub mod translate;
