//! Image info command.

use crate::InfoArgs;
use anyhow::Result;
use std::fs;

/// Prints dimensions, maximum channel value and file size of each input.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    for path in &args.input {
        let file_size = fs::metadata(path)?.len();
        let image = super::load_image(path)?;

        println!("{}", path.display());
        println!("  Resolution: {}x{}", image.width(), image.height());
        println!("  Max value:  {}", image.max_value());
        println!("  Pixels:     {}", image.len());
        println!("  File size:  {}", super::format_size(file_size));
        if verbose > 0 {
            println!("  Body bytes: {}", image.len() * 3);
        }

        if args.input.len() > 1 {
            println!();
        }
    }

    Ok(())
}
