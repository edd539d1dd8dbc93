use std::fmt;
use std::process::Command;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{HostkindError, Result};
use crate::os_release::OsRelease;

/// Sentinel for fields that could not be determined.
pub const UNKNOWN: &str = "?";

const OS_RELEASE_PATH: &str = "/etc/os-release";
const INIT_CGROUP_PATH: &str = "/proc/1/cgroup";

/// Canonical description of the host platform.
///
/// Constructed once at startup via [`PlatformInfo::detect`] and never
/// mutated afterward. String fields hold canonical labels:
///
/// - `os`: `linux`, `macosx`, `windows`, `solaris`, `freebsd`, or the raw
///   family name when unrecognized (`?` when undetermined).
/// - `distribution`: `fedora`, `ubuntu`, `debian`, `arch`, `centos`,
///   `redhat`, `suse`, `amzn`; empty for non-Linux hosts.
/// - `architecture`: `x64`, `x86`, `arm64v8`, `arm32v7`, or the raw
///   machine string when unrecognized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformInfo {
    pub os: String,
    pub distribution: String,
    pub os_version: String,
    pub full_os_version: String,
    pub os_nickname: String,
    pub architecture: String,
}

impl PlatformInfo {
    /// Probe the host and build a normalized description of it.
    ///
    /// With `strict` set, failure to determine the OS family or Linux
    /// distribution is an error; otherwise unknown sentinels are kept and
    /// detection continues best-effort.
    pub fn detect(strict: bool) -> Result<PlatformInfo> {
        debug!("starting platform detection");

        let family = canonical_os_family(std::env::consts::OS);
        let mut builder = PlatformInfoBuilder::default().os(&family);

        match family.as_str() {
            "linux" => match OsRelease::load(OS_RELEASE_PATH) {
                Ok(release) => {
                    builder = builder.apply_os_release(&release, strict)?;
                }
                Err(e) => {
                    if strict {
                        return Err(HostkindError::Detection {
                            what: "distribution".to_string(),
                        });
                    }
                    warn!(error = %e, "os-release unreadable, distribution unknown");
                    builder = builder
                        .distribution("unknown")
                        .os_version("unknown")
                        .full_os_version("unknown");
                }
            },
            "macosx" => {
                let full = sysinfo::System::os_version().unwrap_or_default();
                builder = builder.apply_macos_version(&full);
            }
            "windows" => {
                let version =
                    sysinfo::System::os_version().unwrap_or_else(|| UNKNOWN.to_string());
                builder = builder
                    .distribution("windows")
                    .os_version(&version)
                    .full_os_version(&version);
            }
            "solaris" => {
                builder = builder.distribution("").os_version("");
            }
            "freebsd" => {
                builder = apply_freebsd(builder, strict)?;
            }
            other => {
                if strict {
                    return Err(HostkindError::Detection {
                        what: format!("OS (family {other:?})"),
                    });
                }
                builder = builder.distribution("").os_version("");
            }
        }

        let raw_arch = sysinfo::System::cpu_arch()
            .unwrap_or_default()
            .to_lowercase();
        builder = builder.architecture(normalize_arch(&raw_arch));

        let info = builder.finish();
        info!(
            os = %info.os,
            distribution = %info.distribution,
            version = %info.os_version,
            nickname = %info.os_nickname,
            arch = %info.architecture,
            "platform detected"
        );
        Ok(info)
    }

    /// True for Debian-family distributions (apt-based).
    pub fn is_debian_compatible(&self) -> bool {
        matches!(self.distribution.as_str(), "debian" | "ubuntu" | "linuxmint")
    }

    /// True for RedHat-family distributions (yum/dnf-based).
    pub fn is_redhat_compatible(&self) -> bool {
        matches!(self.distribution.as_str(), "redhat" | "centos" | "amzn")
    }

    /// True when the init process is inside a docker cgroup.
    ///
    /// Best-effort: an unreadable cgroup file yields `false`.
    pub fn is_container(&self) -> bool {
        match std::fs::read_to_string(INIT_CGROUP_PATH) {
            Ok(content) => cgroup_mentions_docker(&content),
            Err(e) => {
                debug!(error = %e, "cgroup file unreadable, assuming not a container");
                false
            }
        }
    }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.distribution.is_empty() {
            &self.os
        } else {
            &self.distribution
        };
        write!(
            f,
            "{} {} ({}) {}",
            name, self.os_version, self.os_nickname, self.architecture
        )
    }
}

/// Accumulates platform fields during best-effort detection; [`finish`]
/// fills unset fields with their sentinels and produces the immutable
/// [`PlatformInfo`].
///
/// [`finish`]: PlatformInfoBuilder::finish
#[derive(Debug, Default)]
pub struct PlatformInfoBuilder {
    os: Option<String>,
    distribution: Option<String>,
    os_version: Option<String>,
    full_os_version: Option<String>,
    os_nickname: Option<String>,
    architecture: Option<String>,
}

impl PlatformInfoBuilder {
    pub fn os(mut self, value: impl Into<String>) -> Self {
        self.os = Some(value.into());
        self
    }

    pub fn distribution(mut self, value: impl Into<String>) -> Self {
        self.distribution = Some(value.into());
        self
    }

    pub fn os_version(mut self, value: impl Into<String>) -> Self {
        self.os_version = Some(value.into());
        self
    }

    pub fn full_os_version(mut self, value: impl Into<String>) -> Self {
        self.full_os_version = Some(value.into());
        self
    }

    pub fn os_nickname(mut self, value: impl Into<String>) -> Self {
        self.os_nickname = Some(value.into());
        self
    }

    pub fn architecture(mut self, value: impl Into<String>) -> Self {
        self.architecture = Some(value.into());
        self
    }

    /// Fill distribution, version, and nickname from a parsed os-release.
    ///
    /// The raw `ID` is normalized to a canonical distribution label; an id
    /// outside the table is an error in strict mode and passed through
    /// otherwise. The nickname falls back to `<id><version>` when the file
    /// carries no codename.
    pub fn apply_os_release(self, release: &OsRelease, strict: bool) -> Result<Self> {
        let (Some(raw_id), Some(version)) = (release.id(), release.version_id()) else {
            if strict {
                return Err(HostkindError::Detection {
                    what: "distribution".to_string(),
                });
            }
            return Ok(self
                .distribution("unknown")
                .os_version("unknown")
                .full_os_version("unknown"));
        };
        let version = version.to_string();

        let codename = release.version_codename();
        let mut nickname = if codename.is_empty() {
            format!("{raw_id}{version}")
        } else {
            codename.to_string()
        };

        let distribution = match raw_id.as_str() {
            "fedora" | "ubuntu" | "debian" | "arch" => raw_id.clone(),
            id if id.starts_with("centos") => "centos".to_string(),
            id if id.starts_with("redhat") || id == "rhel" => "redhat".to_string(),
            id if id.starts_with("suse") => "suse".to_string(),
            id if id.starts_with("amzn") => {
                nickname = format!("amzn{version}");
                "amzn".to_string()
            }
            other => {
                if strict {
                    return Err(HostkindError::Detection {
                        what: format!("distribution {other:?}"),
                    });
                }
                raw_id.clone()
            }
        };

        Ok(self
            .distribution(distribution)
            .os_version(&version)
            .full_os_version(&version)
            .os_nickname(nickname))
    }

    /// Fill version fields and nickname from a macOS version triple.
    ///
    /// `os_version` is truncated to major.minor; the nickname comes from the
    /// static codename table, falling back to `macosx<minor>`.
    pub fn apply_macos_version(self, full_version: &str) -> Self {
        let os_version = full_version
            .split('.')
            .take(2)
            .collect::<Vec<_>>()
            .join(".");
        let minor = full_version.split('.').nth(1).unwrap_or("");
        let nickname = match macos_codename(&os_version) {
            Some(name) => name.to_string(),
            None => format!("macosx{minor}"),
        };

        self.distribution("")
            .os_version(os_version)
            .full_os_version(full_version)
            .os_nickname(nickname)
    }

    /// Finalize into an immutable [`PlatformInfo`], substituting the `?`
    /// sentinel (empty for distribution) for anything never detected.
    pub fn finish(self) -> PlatformInfo {
        PlatformInfo {
            os: self.os.unwrap_or_else(|| UNKNOWN.to_string()),
            distribution: self.distribution.unwrap_or_default(),
            os_version: self.os_version.unwrap_or_else(|| UNKNOWN.to_string()),
            full_os_version: self.full_os_version.unwrap_or_else(|| UNKNOWN.to_string()),
            os_nickname: self.os_nickname.unwrap_or_else(|| UNKNOWN.to_string()),
            architecture: self.architecture.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// Map a raw OS family name to its canonical label.
///
/// Accepts both Rust target names (`macos`) and uname-style spellings
/// (`darwin`, `sunos`); unrecognized families pass through lowercased.
pub fn canonical_os_family(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "darwin" | "macos" => "macosx".to_string(),
        "sunos" | "illumos" => "solaris".to_string(),
        other => other.to_string(),
    }
}

/// Normalize a raw machine architecture string to its canonical label.
/// Unrecognized input passes through unchanged.
pub fn normalize_arch(raw: &str) -> String {
    match raw {
        "amd64" | "x86_64" => "x64".to_string(),
        "i386" | "i686" | "i86pc" => "x86".to_string(),
        "aarch64" => "arm64v8".to_string(),
        "armv7l" => "arm32v7".to_string(),
        other => other.to_string(),
    }
}

/// Codename for a macOS major.minor version, for releases that had one.
fn macos_codename(major_minor: &str) -> Option<&'static str> {
    Some(match major_minor {
        "10.15" => "catalina",
        "10.14" => "mojave",
        "10.13" => "highsierra",
        "10.12" => "sierra",
        "10.11" => "elcapitan",
        "10.10" => "yosemite",
        "10.9" => "mavericks",
        "10.8" => "mountainlion",
        "10.7" => "lion",
        "10.6" => "snowleopard",
        "10.5" => "leopard",
        "10.4" => "tiger",
        "10.3" => "panther",
        "10.2" => "jaguar",
        "10.1" => "puma",
        "10.0" => "cheetah",
        _ => return None,
    })
}

/// Extract the release component from `freebsd-version` output,
/// e.g. `13.2-RELEASE-p4` yields `13.2`.
fn parse_freebsd_version(raw: &str) -> Option<String> {
    let re = Regex::new(r"([^-]*)-(.*)").ok()?;
    let caps = re.captures(raw.trim())?;
    Some(caps[1].to_string())
}

fn apply_freebsd(builder: PlatformInfoBuilder, strict: bool) -> Result<PlatformInfoBuilder> {
    let output = Command::new("freebsd-version").output()?;
    let raw = String::from_utf8_lossy(&output.stdout);

    match parse_freebsd_version(&raw) {
        Some(version) => Ok(builder
            .distribution("")
            .os_version(&version)
            .full_os_version(&version)
            .os_nickname(format!("freebsd{version}"))),
        None => {
            if strict {
                return Err(HostkindError::Detection {
                    what: "FreeBSD version".to_string(),
                });
            }
            warn!(output = %raw.trim(), "unparseable freebsd-version output");
            Ok(builder.distribution(""))
        }
    }
}

fn cgroup_mentions_docker(content: &str) -> bool {
    content.lines().any(|line| line.contains("docker"))
}
