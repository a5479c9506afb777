//! Command-line argument parsing for the fit reporter
//!
//! Supports:
//! - A one-off fit for a viewport/image size pair
//! - Fitting every view declared in a viewer config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Headless cover-fit reports for imagemap views
#[derive(Parser, Debug)]
#[command(name = "imagemap-app", version, about = "Headless cover-fit reports for imagemap views")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Fit one image into one viewport
    Fit {
        /// Container size in pixels
        #[arg(long, value_name = "WxH", value_parser = parse_size)]
        viewport: (f64, f64),

        /// Natural image size in pixels
        #[arg(long, value_name = "WxH", value_parser = parse_size)]
        image: (f64, f64),

        /// Zoom added on top of cover zoom (profile default when omitted)
        #[arg(long, value_name = "B", allow_negative_numbers = true)]
        boost: Option<f64>,

        /// Treat the image as a z/x/y tile pyramid
        #[arg(long)]
        tiled: bool,
    },
    /// Fit every view declared in a viewer config
    Views {
        /// Viewer config (JSON); relative locators resolve against its directory
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Container size in pixels
        #[arg(long, value_name = "WxH", value_parser = parse_size)]
        viewport: (f64, f64),
    },
}

/// Parse `WxH` (or `WXH`) into a positive, finite width and height
pub fn parse_size(value: &str) -> Result<(f64, f64), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{value}'"))?;
    let parse = |s: &str| -> Result<f64, String> {
        let n: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{s}' is not a number"))?;
        if n.is_finite() && n > 0.0 {
            Ok(n)
        } else {
            Err(format!("'{s}' must be a positive size"))
        }
    };
    Ok((parse(w)?, parse(h)?))
}
