//! USB device reset used to recover a wedged capture card.

use std::fs::OpenOptions;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use crate::error::{Error, Result};

// USBDEVFS_RESET = _IO('U', 20)
nix::ioctl_none!(usbdevfs_reset, b'U', 20);

/// Opens `device` for writing and issues `USBDEVFS_RESET` on it.
pub fn reset_device(device: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .open(device)
        .map_err(|source| Error::OpenDevice {
            path: device.to_path_buf(),
            source,
        })?;

    tracing::debug!(device = %device.display(), "issuing USBDEVFS_RESET");
    unsafe { usbdevfs_reset(file.as_raw_fd()) }?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;

    #[test]
    fn missing_device_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("001");

        match reset_device(&missing) {
            Err(Error::OpenDevice { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_usb_device_rejects_reset() {
        match reset_device(Path::new("/dev/null")) {
            Err(Error::ResetRequest(errno)) => assert_eq!(errno, Errno::ENOTTY),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn error_messages() {
        let err = Error::ResetRequest(Errno::ENOTTY);
        assert!(err.to_string().starts_with("Error in ioctl: "));
    }
}
