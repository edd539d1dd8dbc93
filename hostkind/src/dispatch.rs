use tracing::debug;

use crate::error::{HostkindError, Result};
use crate::info::PlatformInfo;

/// Per-platform customization hooks.
///
/// Every method is a default no-op; consumers implement only the hooks
/// their provisioning flow needs. Staged hooks receive the stage identifier
/// so multi-pass flows can branch on it. A hook returning an error aborts
/// the remainder of the sequence.
pub trait PlatformHooks {
    /// Runs once, before the stage loop.
    fn common_first(&mut self, _info: &PlatformInfo) -> Result<()> {
        Ok(())
    }

    /// Runs once, after the stage loop.
    fn common_last(&mut self, _info: &PlatformInfo) -> Result<()> {
        Ok(())
    }

    /// Runs at the start of every stage, on every platform.
    fn common(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn linux(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    /// Debian-family hook (debian, ubuntu, linuxmint).
    fn debian_compat(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    /// RedHat-family hook (redhat, centos, amzn).
    fn redhat_compat(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn fedora(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn ubuntu(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn debian(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn centos(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn redhat(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn suse(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn arch_linux(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn linuxmint(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn amzn(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn macosx(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }

    fn freebsd(&mut self, _info: &PlatformInfo, _stage: u32) -> Result<()> {
        Ok(())
    }
}

/// Runs a [`PlatformHooks`] implementation in a fixed, platform-gated order.
///
/// Per invocation: `common_first`, then for each stage `common`, the OS
/// hook, the compatibility hooks, and exactly one distribution hook, then
/// `common_last`. Non-Linux/macOS/FreeBSD families get only the common
/// hooks; that is not an error. A Linux distribution with no matching hook
/// is always fatal, independent of detection strictness.
pub struct PlatformDispatcher<H: PlatformHooks> {
    pub hooks: H,
    stages: Vec<u32>,
    info: PlatformInfo,
}

impl<H: PlatformHooks> PlatformDispatcher<H> {
    /// Single-stage dispatcher (stage `0`).
    pub fn new(info: PlatformInfo, hooks: H) -> Self {
        Self {
            hooks,
            stages: vec![0],
            info,
        }
    }

    /// Replace the stage list. Stages run in the order given.
    pub fn with_stages(mut self, stages: Vec<u32>) -> Self {
        self.stages = stages;
        self
    }

    pub fn info(&self) -> &PlatformInfo {
        &self.info
    }

    /// Run the full hook sequence.
    pub fn invoke(&mut self) -> Result<()> {
        debug!(
            os = %self.info.os,
            distribution = %self.info.distribution,
            stages = self.stages.len(),
            "dispatching platform hooks"
        );

        self.hooks.common_first(&self.info)?;

        for &stage in &self.stages {
            self.hooks.common(&self.info, stage)?;

            match self.info.os.as_str() {
                "linux" => {
                    self.hooks.linux(&self.info, stage)?;

                    if self.info.is_debian_compatible() {
                        self.hooks.debian_compat(&self.info, stage)?;
                    }
                    if self.info.is_redhat_compatible() {
                        self.hooks.redhat_compat(&self.info, stage)?;
                    }

                    match self.info.distribution.as_str() {
                        "fedora" => self.hooks.fedora(&self.info, stage)?,
                        "ubuntu" => self.hooks.ubuntu(&self.info, stage)?,
                        "debian" => self.hooks.debian(&self.info, stage)?,
                        "centos" => self.hooks.centos(&self.info, stage)?,
                        "redhat" => self.hooks.redhat(&self.info, stage)?,
                        "suse" => self.hooks.suse(&self.info, stage)?,
                        "arch" => self.hooks.arch_linux(&self.info, stage)?,
                        "linuxmint" => self.hooks.linuxmint(&self.info, stage)?,
                        "amzn" => self.hooks.amzn(&self.info, stage)?,
                        other => {
                            return Err(HostkindError::UnknownInstaller {
                                distribution: other.to_string(),
                            });
                        }
                    }
                }
                "macosx" => self.hooks.macosx(&self.info, stage)?,
                "freebsd" => self.hooks.freebsd(&self.info, stage)?,
                _ => {}
            }
        }

        self.hooks.common_last(&self.info)?;
        Ok(())
    }
}
