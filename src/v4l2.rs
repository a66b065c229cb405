//! Mirrors of the `linux/videodev2.h` structures the shim touches.
//!
//! Only the single-planar pixel format is modelled; every other member of the
//! `v4l2_format` union is reachable through `raw_data` alone.

use std::ffi::c_void;
use std::fmt;
use std::mem;

use crate::resolver::IoctlRequest;

pub const V4L2_BUF_TYPE_VIDEO_CAPTURE: u32 = 1;
pub const V4L2_BUF_TYPE_VIDEO_OUTPUT: u32 = 2;
pub const V4L2_BUF_TYPE_VIDEO_OVERLAY: u32 = 3;
pub const V4L2_BUF_TYPE_VIDEO_CAPTURE_MPLANE: u32 = 9;
pub const V4L2_BUF_TYPE_VIDEO_OUTPUT_MPLANE: u32 = 10;

pub const V4L2_COLORSPACE_DEFAULT: u32 = 0;
pub const V4L2_COLORSPACE_SRGB: u32 = 8;
pub const V4L2_COLORSPACE_BT2020: u32 = 9;

pub const V4L2_XFER_FUNC_DEFAULT: u32 = 0;
pub const V4L2_XFER_FUNC_SMPTE2084: u32 = 6;

pub const V4L2_YCBCR_ENC_BT2020: u32 = 10;

pub const V4L2_QUANTIZATION_LIM_RANGE: u32 = 2;

pub const V4L2_PIX_FMT_NV12: u32 = fourcc(b"NV12");
pub const V4L2_PIX_FMT_P010: u32 = fourcc(b"P010");

/// `_IOWR('V', 4, struct v4l2_format)`
pub const VIDIOC_G_FMT: IoctlRequest =
    nix::request_code_readwrite!(b'V', 4, mem::size_of::<V4l2Format>()) as IoctlRequest;
/// `_IOWR('V', 5, struct v4l2_format)`
pub const VIDIOC_S_FMT: IoctlRequest =
    nix::request_code_readwrite!(b'V', 5, mem::size_of::<V4l2Format>()) as IoctlRequest;

pub const fn fourcc(code: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*code)
}

/// Printable form of a fourcc, with non-ASCII bytes replaced by `.`.
pub fn fourcc_to_string(code: u32) -> String {
    code.to_le_bytes()
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect()
}

/// `enum v4l2_buf_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufType {
    VideoCapture,
    VideoOutput,
    VideoOverlay,
    VideoCaptureMplane,
    VideoOutputMplane,
    Other(u32),
}

impl From<u32> for BufType {
    fn from(raw: u32) -> Self {
        match raw {
            V4L2_BUF_TYPE_VIDEO_CAPTURE => BufType::VideoCapture,
            V4L2_BUF_TYPE_VIDEO_OUTPUT => BufType::VideoOutput,
            V4L2_BUF_TYPE_VIDEO_OVERLAY => BufType::VideoOverlay,
            V4L2_BUF_TYPE_VIDEO_CAPTURE_MPLANE => BufType::VideoCaptureMplane,
            V4L2_BUF_TYPE_VIDEO_OUTPUT_MPLANE => BufType::VideoOutputMplane,
            other => BufType::Other(other),
        }
    }
}

impl From<BufType> for u32 {
    fn from(buf_type: BufType) -> Self {
        match buf_type {
            BufType::VideoCapture => V4L2_BUF_TYPE_VIDEO_CAPTURE,
            BufType::VideoOutput => V4L2_BUF_TYPE_VIDEO_OUTPUT,
            BufType::VideoOverlay => V4L2_BUF_TYPE_VIDEO_OVERLAY,
            BufType::VideoCaptureMplane => V4L2_BUF_TYPE_VIDEO_CAPTURE_MPLANE,
            BufType::VideoOutputMplane => V4L2_BUF_TYPE_VIDEO_OUTPUT_MPLANE,
            BufType::Other(raw) => raw,
        }
    }
}

/// `struct v4l2_pix_format`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V4l2PixFormat {
    pub width: u32,
    pub height: u32,
    pub pixelformat: u32,
    pub field: u32,
    pub bytesperline: u32,
    pub sizeimage: u32,
    pub colorspace: u32,
    pub priv_: u32,
    pub flags: u32,
    /// Shares storage with `hsv_enc`.
    pub ycbcr_enc: u32,
    pub quantization: u32,
    pub xfer_func: u32,
}

/// The `fmt` union of `struct v4l2_format`.
#[repr(C)]
#[derive(Clone, Copy)]
union V4l2FormatUnion {
    pix: V4l2PixFormat,
    raw_data: [u8; 200],
    // The kernel union holds pointers (v4l2_window), which sets its alignment.
    _align: [libc::c_ulong; 0],
}

/// `struct v4l2_format`
///
/// Only built through [`V4l2Format::zeroed`] and [`V4l2Format::with_pix`], so
/// all 200 bytes of the union are always initialised.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct V4l2Format {
    pub type_: u32,
    fmt: V4l2FormatUnion,
}

impl V4l2Format {
    pub fn zeroed() -> Self {
        Self {
            type_: 0,
            fmt: V4l2FormatUnion { raw_data: [0; 200] },
        }
    }

    /// A single-planar format request for `buf_type`.
    pub fn with_pix(buf_type: BufType, pix: V4l2PixFormat) -> Self {
        let mut format = Self::zeroed();
        format.type_ = buf_type.into();
        *format.pix_mut() = pix;
        format
    }

    pub fn buf_type(&self) -> BufType {
        BufType::from(self.type_)
    }

    /// The union viewed as a single-planar pixel format.
    pub fn pix(&self) -> &V4l2PixFormat {
        // Initialised bytes, and any bit pattern is a valid pix format.
        unsafe { &self.fmt.pix }
    }

    pub fn pix_mut(&mut self) -> &mut V4l2PixFormat {
        unsafe { &mut self.fmt.pix }
    }

    /// The whole union as bytes.
    pub fn raw_data(&self) -> &[u8; 200] {
        unsafe { &self.fmt.raw_data }
    }
}

impl fmt::Debug for V4l2Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("V4l2Format")
            .field("type", &self.buf_type())
            .field("pix", self.pix())
            .finish()
    }
}

/// The four identifiers describing how sample values map to colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colorimetry {
    pub colorspace: u32,
    pub xfer_func: u32,
    pub ycbcr_enc: u32,
    pub quantization: u32,
}

impl Colorimetry {
    /// BT.2020 primaries and matrix, SMPTE 2084 (PQ), limited range.
    pub const HDR10: Colorimetry = Colorimetry {
        colorspace: V4L2_COLORSPACE_BT2020,
        xfer_func: V4L2_XFER_FUNC_SMPTE2084,
        ycbcr_enc: V4L2_YCBCR_ENC_BT2020,
        quantization: V4L2_QUANTIZATION_LIM_RANGE,
    };

    pub fn of(pix: &V4l2PixFormat) -> Self {
        Self {
            colorspace: pix.colorspace,
            xfer_func: pix.xfer_func,
            ycbcr_enc: pix.ycbcr_enc,
            quantization: pix.quantization,
        }
    }

    /// Overwrites all four fields of `pix`, returning the previous values.
    pub fn apply_to(self, pix: &mut V4l2PixFormat) -> Colorimetry {
        let previous = Colorimetry::of(pix);
        pix.colorspace = self.colorspace;
        pix.xfer_func = self.xfer_func;
        pix.ycbcr_enc = self.ycbcr_enc;
        pix.quantization = self.quantization;
        previous
    }
}

/// A `VIDIOC_S_FMT` payload, decoded by its buffer type.
#[derive(Debug)]
pub enum FormatRequest<'a> {
    VideoOutput(&'a mut V4l2PixFormat),
    Other(BufType),
}

impl<'a> FormatRequest<'a> {
    pub fn decode(format: &'a mut V4l2Format) -> Self {
        match format.buf_type() {
            BufType::VideoOutput => FormatRequest::VideoOutput(format.pix_mut()),
            other => FormatRequest::Other(other),
        }
    }

    /// Decodes the payload of an `ioctl` call. Returns `None` for null.
    ///
    /// # Safety
    ///
    /// A non-null `arg` must point to a writable, fully initialised
    /// `struct v4l2_format` that is not accessed elsewhere for `'a`.
    pub unsafe fn from_raw(arg: *mut c_void) -> Option<Self> {
        unsafe { arg.cast::<V4l2Format>().as_mut() }.map(FormatRequest::decode)
    }
}
