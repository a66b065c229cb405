//! Lookup of the real `ioctl` behind the shim.

use std::ffi::{CStr, c_int, c_void};
use std::ptr::NonNull;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Request argument type of libc's `ioctl`.
#[cfg(target_env = "musl")]
pub type IoctlRequest = libc::c_int;
/// Request argument type of libc's `ioctl`.
#[cfg(not(target_env = "musl"))]
pub type IoctlRequest = libc::c_ulong;

/// Signature used to call the real `ioctl`.
///
/// libc declares `ioctl` variadic. Every request this shim forwards carries at
/// most one pointer-sized argument, which the Linux calling conventions pass
/// the same way for fixed and variadic parameters.
pub type IoctlFn = unsafe extern "C" fn(c_int, IoctlRequest, *mut c_void) -> c_int;

static REAL_IOCTL: OnceLock<IoctlFn> = OnceLock::new();

/// Looks up `name` in the objects loaded after the caller's.
pub fn next_symbol(name: &CStr) -> Result<NonNull<c_void>> {
    let ptr = unsafe { libc::dlsym(libc::RTLD_NEXT, name.as_ptr()) };
    NonNull::new(ptr).ok_or_else(|| Error::SymbolNotFound {
        symbol: name.to_string_lossy().into_owned(),
        reason: last_dl_error(),
    })
}

fn last_dl_error() -> String {
    let msg = unsafe { libc::dlerror() };
    if msg.is_null() {
        return "symbol not found".to_string();
    }
    unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
}

/// Returns the real `ioctl`, resolving it on first use.
///
/// Aborts the process if no `ioctl` exists behind the shim: forwarding would
/// otherwise land back in the shim.
pub fn real_ioctl() -> IoctlFn {
    *REAL_IOCTL.get_or_init(|| match next_symbol(c"ioctl") {
        Ok(ptr) => {
            tracing::debug!(address = ?ptr, "resolved real ioctl");
            unsafe { std::mem::transmute::<*mut c_void, IoctlFn>(ptr.as_ptr()) }
        }
        Err(err) => {
            tracing::error!(%err, "cannot forward ioctl");
            eprintln!("[v4l2-hdr-shim] FATAL: {err}");
            std::process::abort();
        }
    })
}

/// The real `ioctl` if it has already been resolved.
pub fn try_real_ioctl() -> Option<IoctlFn> {
    REAL_IOCTL.get().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_libc_symbol() {
        assert!(next_symbol(c"getpid").is_ok());
    }

    #[test]
    fn missing_symbol_reports_name_and_reason() {
        match next_symbol(c"v4l2_hdr_shim_no_such_symbol").unwrap_err() {
            Error::SymbolNotFound { symbol, reason } => {
                assert_eq!(symbol, "v4l2_hdr_shim_no_such_symbol");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn real_ioctl_is_cached() {
        let first = real_ioctl();
        assert_eq!(try_real_ioctl().map(|f| f as usize), Some(first as usize));
        assert_eq!(real_ioctl() as usize, first as usize);
    }

    #[test]
    fn real_ioctl_reaches_the_kernel() {
        let real = real_ioctl();
        let mut nread: c_int = 0;
        let ret = unsafe {
            real(
                -1,
                libc::FIONREAD as IoctlRequest,
                (&mut nread as *mut c_int).cast(),
            )
        };
        assert_eq!(ret, -1);
        assert_eq!(
            std::io::Error::last_os_error().raw_os_error(),
            Some(libc::EBADF)
        );
    }
}
