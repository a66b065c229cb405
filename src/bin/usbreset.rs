//! usbreset - reset a USB device node
//!
//! Usage: usbreset /dev/bus/usb/001/002

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use v4l2_hdr_shim::{logging, reset};

#[derive(Parser, Debug)]
#[command(name = "usbreset")]
#[command(version, about = "Issue USBDEVFS_RESET on a USB device node")]
struct Cli {
    /// Device node, e.g. /dev/bus/usb/001/002
    device: PathBuf,
}

fn main() -> ExitCode {
    logging::init("RUST_LOG", "warn");

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match reset::reset_device(&cli.device) {
        Ok(()) => {
            println!("Reset successful on {}", cli.device.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
