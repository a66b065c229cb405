//! The override installed into a real process.
//!
//! Expanding the hook here makes every `ioctl` in this test binary, including
//! the ones below, go through the shim. The shim reads the real environment,
//! so tests that expect patching skip when it is configured.

use std::ffi::c_int;
use std::fs::OpenOptions;
use std::io;
use std::os::unix::io::AsRawFd;

use v4l2_hdr_shim::config::{ENV_DEVICE, ENV_DISABLE};
use v4l2_hdr_shim::v4l2::{V4L2_COLORSPACE_SRGB, V4L2_PIX_FMT_P010};
use v4l2_hdr_shim::{
    BufType, Colorimetry, IoctlRequest, ShimState, V4l2Format, V4l2PixFormat, VIDIOC_S_FMT,
};

v4l2_hdr_shim::install_ioctl_hook!();

fn format(buf_type: BufType) -> V4l2Format {
    V4l2Format::with_pix(
        buf_type,
        V4l2PixFormat {
            width: 1280,
            height: 720,
            pixelformat: V4L2_PIX_FMT_P010,
            colorspace: V4L2_COLORSPACE_SRGB,
            ..Default::default()
        },
    )
}

// True when the environment leaves the shim patching any output device.
fn shim_env_is_default() -> bool {
    for var in [ENV_DISABLE, ENV_DEVICE] {
        if let Some(value) = std::env::var_os(var) {
            if !value.is_empty() {
                eprintln!("skipping: {var}={value:?} is set");
                return false;
            }
        }
    }
    true
}

#[test]
fn output_format_patched_and_kernel_error_returned() {
    if !shim_env_is_default() {
        return;
    }
    let null = OpenOptions::new().write(true).open("/dev/null").unwrap();
    let mut fmt = format(BufType::VideoOutput);

    let ret = unsafe {
        ioctl(
            null.as_raw_fd(),
            VIDIOC_S_FMT,
            (&mut fmt as *mut V4l2Format).cast(),
        )
    };
    let errno = io::Error::last_os_error().raw_os_error();

    assert_eq!(ret, -1);
    assert_eq!(errno, Some(libc::ENOTTY));
    assert_eq!(Colorimetry::of(fmt.pix()), Colorimetry::HDR10);
    assert!(ShimState::global().config().target_device.is_none());
}

#[test]
fn capture_format_untouched() {
    let null = OpenOptions::new().write(true).open("/dev/null").unwrap();
    let mut fmt = format(BufType::VideoCapture);
    let before = *fmt.raw_data();

    let ret = unsafe {
        libc::ioctl(
            null.as_raw_fd(),
            VIDIOC_S_FMT,
            (&mut fmt as *mut V4l2Format).cast::<libc::c_void>(),
        )
    };

    assert_eq!(ret, -1);
    assert_eq!(*fmt.raw_data(), before);
}

#[test]
fn unrelated_request_matches_raw_syscall() {
    let mut hooked: c_int = -7;
    let mut raw: c_int = -7;
    let (r1, r2) = unsafe {
        (
            ioctl(-1, libc::FIONREAD as IoctlRequest, (&mut hooked as *mut c_int).cast()),
            libc::syscall(libc::SYS_ioctl, -1, libc::FIONREAD, &mut raw as *mut c_int) as c_int,
        )
    };

    assert_eq!(r1, r2);
    assert_eq!(hooked, raw);
    assert_eq!(io::Error::last_os_error().raw_os_error(), Some(libc::EBADF));
}
