//! Decides whether a descriptor is the loopback device we were told to patch.

use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::PathBuf;

/// Maps an open descriptor back to the path it was opened with.
pub trait FdPathResolver {
    fn resolve(&self, fd: RawFd) -> io::Result<PathBuf>;
}

/// Resolves descriptors through `/proc/self/fd`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcSelfFd;

impl FdPathResolver for ProcSelfFd {
    fn resolve(&self, fd: RawFd) -> io::Result<PathBuf> {
        std::fs::read_link(format!("/proc/self/fd/{fd}"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeviceMatcher<R = ProcSelfFd> {
    target: Option<PathBuf>,
    resolver: R,
}

impl DeviceMatcher<ProcSelfFd> {
    pub fn new(target: Option<PathBuf>) -> Self {
        Self::with_resolver(target, ProcSelfFd)
    }
}

impl<R: FdPathResolver> DeviceMatcher<R> {
    pub fn with_resolver(target: Option<PathBuf>, resolver: R) -> Self {
        Self { target, resolver }
    }

    /// Without a target every descriptor matches. Otherwise the resolved path
    /// must equal the target byte for byte; resolution failures never match.
    pub fn matches(&self, fd: RawFd) -> bool {
        let Some(target) = &self.target else {
            return true;
        };
        match self.resolver.resolve(fd) {
            Ok(path) => path.as_os_str().as_bytes() == target.as_os_str().as_bytes(),
            Err(err) => {
                tracing::trace!(fd, %err, "cannot resolve descriptor, not patching");
                false
            }
        }
    }
}
