//! Preloadable build of the shim.
//!
//! ```sh
//! LD_PRELOAD=target/release/libv4l2_hdr_preload.so ffmpeg ... -f v4l2 /dev/video5
//! ```

v4l2_hdr_shim::install_ioctl_hook!();

#[cfg(feature = "trace")]
use ctor::ctor;

#[cfg(feature = "trace")]
#[ctor]
fn init() {
    v4l2_hdr_shim::logging::init(v4l2_hdr_shim::logging::SHIM_LOG_ENV, "info");
}
