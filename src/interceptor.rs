//! The `ioctl` override and the patch rule behind it.

use std::ffi::{c_int, c_void};
use std::os::unix::io::RawFd;

use crate::config::ShimConfig;
use crate::matcher::{DeviceMatcher, FdPathResolver};
use crate::resolver::{self, IoctlRequest};
use crate::state::ShimState;
use crate::v4l2::{BufType, Colorimetry, FormatRequest, VIDIOC_S_FMT};

/// What `inspect` did to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The colour fields were rewritten to [`Colorimetry::HDR10`].
    Patched { previous: Colorimetry },
    /// The payload was left untouched.
    PassThrough(Skip),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    Disabled,
    OtherRequest,
    NullPayload,
    NotOutput(BufType),
    DeviceMismatch,
}

impl Verdict {
    pub fn is_patched(&self) -> bool {
        matches!(self, Verdict::Patched { .. })
    }
}

/// Applies the patch rule to one `ioctl` call without forwarding it.
///
/// The pixel format is not consulted: NV12 and P010 output requests are
/// patched alike.
///
/// # Safety
///
/// When `request` is `VIDIOC_S_FMT`, a non-null `arg` must point to a
/// writable `struct v4l2_format`.
pub unsafe fn inspect<R: FdPathResolver>(
    config: &ShimConfig,
    matcher: &DeviceMatcher<R>,
    fd: RawFd,
    request: IoctlRequest,
    arg: *mut c_void,
) -> Verdict {
    if config.disabled {
        return Verdict::PassThrough(Skip::Disabled);
    }
    if request != VIDIOC_S_FMT {
        return Verdict::PassThrough(Skip::OtherRequest);
    }
    let Some(format) = (unsafe { FormatRequest::from_raw(arg) }) else {
        return Verdict::PassThrough(Skip::NullPayload);
    };
    let pix = match format {
        FormatRequest::VideoOutput(pix) => pix,
        FormatRequest::Other(buf_type) => return Verdict::PassThrough(Skip::NotOutput(buf_type)),
    };
    if !matcher.matches(fd) {
        return Verdict::PassThrough(Skip::DeviceMismatch);
    }
    Verdict::Patched {
        previous: Colorimetry::HDR10.apply_to(pix),
    }
}

/// Body of the exported `ioctl`.
///
/// # Safety
///
/// Same contract as libc's `ioctl`.
pub unsafe fn intercept(fd: c_int, request: IoctlRequest, arg: *mut c_void) -> c_int {
    crate::with_hook_protection(
        || unsafe { ShimState::global().dispatch(fd, request, arg) },
        || unsafe { forward_unhooked(fd, request, arg) },
    )
}

// Re-entrant calls from the shim itself. Before the real symbol is known,
// go to the kernel directly rather than through the resolver.
unsafe fn forward_unhooked(fd: c_int, request: IoctlRequest, arg: *mut c_void) -> c_int {
    match resolver::try_real_ioctl() {
        Some(real) => unsafe { real(fd, request, arg) },
        None => unsafe { libc::syscall(libc::SYS_ioctl, fd, request, arg) as c_int },
    }
}
