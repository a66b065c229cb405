//! Process-wide shim state.

use std::ffi::{c_int, c_void};
use std::sync::OnceLock;

use crate::config::ShimConfig;
use crate::interceptor::{self, Verdict};
use crate::matcher::{DeviceMatcher, FdPathResolver, ProcSelfFd};
use crate::resolver::{self, IoctlFn, IoctlRequest};
use crate::v4l2::{Colorimetry, V4l2Format, fourcc_to_string};

static SHIM_STATE: OnceLock<ShimState> = OnceLock::new();

/// Everything the override needs, fixed once the first call has set it up.
pub struct ShimState<R = ProcSelfFd> {
    real: IoctlFn,
    config: ShimConfig,
    matcher: DeviceMatcher<R>,
}

impl ShimState<ProcSelfFd> {
    /// The process singleton, initialised by whichever thread gets here first.
    /// Concurrent first callers wait for that initialisation to finish.
    pub fn global() -> &'static ShimState {
        get_or_init_with(&SHIM_STATE, || {
            let real = resolver::real_ioctl();
            ShimState::new(real, ShimConfig::from_env())
        })
    }

    pub fn new(real: IoctlFn, config: ShimConfig) -> Self {
        Self::with_resolver(real, config, ProcSelfFd)
    }
}

impl<R: FdPathResolver> ShimState<R> {
    pub fn with_resolver(real: IoctlFn, config: ShimConfig, resolver: R) -> Self {
        let matcher = DeviceMatcher::with_resolver(config.target_device.clone(), resolver);
        Self {
            real,
            config,
            matcher,
        }
    }

    pub fn config(&self) -> &ShimConfig {
        &self.config
    }

    /// Applies the patch rule, then forwards the call to the real `ioctl`.
    /// The result and `errno` are whatever the real call left behind.
    ///
    /// # Safety
    ///
    /// Same contract as libc's `ioctl`.
    pub unsafe fn dispatch(&self, fd: c_int, request: IoctlRequest, arg: *mut c_void) -> c_int {
        let verdict = unsafe { interceptor::inspect(&self.config, &self.matcher, fd, request, arg) };
        match verdict {
            Verdict::Patched { previous } => {
                let format = unsafe { &*arg.cast::<V4l2Format>() };
                let pix = *format.pix();
                let Colorimetry {
                    colorspace,
                    xfer_func,
                    ycbcr_enc,
                    quantization,
                } = Colorimetry::of(&pix);
                tracing::info!(
                    fd,
                    pixelformat = %fourcc_to_string(pix.pixelformat),
                    colorspace,
                    xfer_func,
                    ycbcr_enc,
                    quantization,
                    previous_colorspace = previous.colorspace,
                    "patched VIDIOC_S_FMT"
                );
            }
            Verdict::PassThrough(skip) => {
                tracing::trace!(fd, request = request as u64, ?skip, "forwarding ioctl");
            }
        }
        unsafe { (self.real)(fd, request, arg) }
    }
}

fn get_or_init_with<R, F>(cell: &OnceLock<ShimState<R>>, init: F) -> &ShimState<R>
where
    F: FnOnce() -> ShimState<R>,
{
    cell.get_or_init(|| {
        let state = init();
        tracing::debug!(
            disabled = state.config.disabled,
            target = ?state.config.target_device,
            "v4l2-hdr-shim initialised"
        );
        state
    })
}
