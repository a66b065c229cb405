//! Configuration snapshot read from the process environment

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Set to an affirmative value to turn the shim into a pure pass-through.
pub const ENV_DISABLE: &str = "V4L2_HDR_SHIM_DISABLE";
/// Loopback device path to patch. Unset or empty patches any output device.
pub const ENV_DEVICE: &str = "V4L2_HDR_SHIM_DEVICE";

/// Settings fixed for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShimConfig {
    /// Skip all inspection and forward every call untouched.
    pub disabled: bool,
    /// Only patch descriptors resolving to this path. `None` matches any.
    pub target_device: Option<PathBuf>,
}

impl ShimConfig {
    /// Reads the configuration from the current process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if is_affirmative(lookup(ENV_DISABLE).as_deref()) {
            return Self {
                disabled: true,
                target_device: None,
            };
        }

        let target_device = lookup(ENV_DEVICE)
            .filter(|dev| !dev.is_empty())
            .map(PathBuf::from);

        Self {
            disabled: false,
            target_device,
        }
    }
}

fn is_affirmative(value: Option<&OsStr>) -> bool {
    let Some(value) = value.and_then(OsStr::to_str) else {
        return false;
    };
    // Anything starting with '1' counts, like the shell scripts that set it.
    value.starts_with('1')
        || ["true", "yes", "on"]
            .iter()
            .any(|word| value.eq_ignore_ascii_case(word))
}
