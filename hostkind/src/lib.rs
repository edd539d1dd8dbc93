//! Host platform classification and per-platform hook dispatch.
//!
//! Provisioning tools need to answer two questions before they touch a host:
//! *what is this machine* and *which installation steps apply to it*. This
//! crate answers both:
//!
//! - [`PlatformInfo`] probes the host once (OS family, Linux distribution,
//!   version, codename, CPU architecture) and normalizes the raw signals
//!   into a small set of canonical labels.
//! - [`PlatformDispatcher`] runs a fixed sequence of [`PlatformHooks`]
//!   methods gated by the detected platform, so callers override only the
//!   hooks they care about and get deterministic ordering for free.

pub mod dispatch;
pub mod error;
pub mod info;
pub mod os_release;

pub use dispatch::{PlatformDispatcher, PlatformHooks};
pub use error::{HostkindError, Result};
pub use info::{normalize_arch, PlatformInfo, PlatformInfoBuilder};
pub use os_release::OsRelease;
