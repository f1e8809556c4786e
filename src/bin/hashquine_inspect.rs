use std::fs;
use std::path::PathBuf;

use clap::Parser;
use hashquine::{
    gif::walk,
    io_utils::{hashquine_cli_error, io_cli_error},
};
use md5::{Digest, Md5};

/// List the image frames a GIF decoder renders from a file and print the
/// file's MD5 digest.
#[derive(Parser)]
struct Args {
    /// GIF file to inspect
    input: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let data =
        fs::read(&args.input).map_err(|e| io_cli_error("reading input file", &args.input, e))?;
    let layout = walk(&data).map_err(|e| hashquine_cli_error("walking GIF", e))?;

    println!("md5 {}", hex::encode(Md5::digest(&data)));
    println!(
        "screen {}x{}, {} extensions ({} comments), {} images",
        layout.screen_width,
        layout.screen_height,
        layout.extensions,
        layout.comments,
        layout.images.len()
    );
    for img in &layout.images {
        println!(
            "image @{:#08x} at ({}, {}) size {}x{} data {} bytes",
            img.offset,
            img.left,
            img.top,
            img.width,
            img.height,
            img.data.len()
        );
    }
    Ok(())
}
