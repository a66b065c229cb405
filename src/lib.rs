//! HDR colorimetry shim for v4l2loopback writers.
//!
//! FFmpeg's v4l2 output muxer always negotiates `V4L2_COLORSPACE_DEFAULT` when
//! it issues `VIDIOC_S_FMT` on a loopback device. This crate interposes
//! `ioctl` and rewrites the four colour fields of an output-direction format
//! request to BT.2020 / PQ / limited range before the kernel sees it, so every
//! reader of the loopback device observes HDR metadata.
//!
//! The decision logic ([`interceptor::inspect`], [`matcher::DeviceMatcher`],
//! [`config::ShimConfig`]) is plain Rust and can be driven directly. Installing
//! the override is a separate step: expand [`install_ioctl_hook!`] in a
//! `cdylib` (see the `preload` crate) and load it with `LD_PRELOAD`.
//!
//! | Variable | Effect |
//! |---|---|
//! | `V4L2_HDR_SHIM_DISABLE` | `1`/`true`/`yes`/`on` turns the shim into a pure pass-through |
//! | `V4L2_HDR_SHIM_DEVICE` | only patch descriptors that resolve to exactly this path |

use std::cell::Cell;

pub mod config;
pub mod error;
pub mod interceptor;
pub mod logging;
pub mod matcher;
pub mod reset;
pub mod resolver;
pub mod state;
pub mod v4l2;

pub use config::ShimConfig;
pub use error::{Error, Result};
pub use interceptor::{Skip, Verdict};
pub use matcher::{DeviceMatcher, FdPathResolver, ProcSelfFd};
pub use resolver::{IoctlFn, IoctlRequest};
pub use state::ShimState;
pub use v4l2::{BufType, Colorimetry, FormatRequest, V4l2Format, V4l2PixFormat, VIDIOC_S_FMT};

// Set while a thread is inside the hook, so calls made by the shim itself
// go straight to the real function.
thread_local! {
    static IN_HOOK: Cell<bool> = const { Cell::new(false) };
}

/// Runs `hooked` unless the current thread is already inside the hook, in
/// which case `bypass` runs instead.
///
/// Threads whose thread-local storage has already been torn down always take
/// `bypass`.
pub fn with_hook_protection<F, G, R>(hooked: F, bypass: G) -> R
where
    F: FnOnce() -> R,
    G: FnOnce() -> R,
{
    let entered = IN_HOOK.try_with(|flag| !flag.replace(true)).unwrap_or(false);
    if !entered {
        return bypass();
    }
    let result = hooked();
    let _ = IN_HOOK.try_with(|flag| flag.set(false));
    result
}

/// Exports the `ioctl` override from the crate that expands it.
///
/// The exported symbol takes precedence over libc's when the crate is a
/// preloaded `cdylib`, or when it is linked into an executable.
#[macro_export]
macro_rules! install_ioctl_hook {
    () => {
        #[allow(dead_code)]
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn ioctl(
            fd: ::std::ffi::c_int,
            request: $crate::IoctlRequest,
            arg: *mut ::std::ffi::c_void,
        ) -> ::std::ffi::c_int {
            unsafe { $crate::interceptor::intercept(fd, request, arg) }
        }
    };
}
