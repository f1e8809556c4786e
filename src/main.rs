use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use hashquine::{
    io_utils::{hashquine_cli_error, io_cli_error, persist_output, simple_cli_error},
    Config, FastcollOracle, Hashquine, TemplateSet,
};
use indicatif::{ProgressBar, ProgressStyle};

/// Build a GIF that displays its own MD5 digest.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Directory holding bg.gif, char_0.gif .. char_f.gif and an optional
    /// hashquine.json
    template_dir: PathBuf,
    /// Output GIF path
    output: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let start = Instant::now();
    if args.output.is_dir() {
        return Err(simple_cli_error(&format!(
            "output path '{}' is a directory",
            args.output.display()
        ))
        .into());
    }

    let config = Config::load(&args.template_dir)
        .map_err(|e| hashquine_cli_error("loading configuration", e))?;
    let templates = TemplateSet::load(&args.template_dir)
        .map_err(|e| hashquine_cli_error("loading templates", e))?;
    eprintln!(
        "Loaded templates from {} ({}x{} glyphs)",
        args.template_dir.display(),
        templates.glyphs.width(),
        templates.glyphs.height()
    );

    let progress = ProgressBar::new(0).with_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40} {pos}/{len} collisions {msg}",
        )?,
    );
    let oracle = FastcollOracle::new(&config.fastcoll);
    let mut generator = Hashquine::<FastcollOracle>::new(templates, &config, oracle)
        .map_err(|e| hashquine_cli_error("preparing layout", e))?
        .with_progress(progress);

    let generated = generator
        .generate()
        .map_err(|e| hashquine_cli_error("generating hashquine", e))?;
    persist_output(&args.output, &generated.bytes)
        .map_err(|e| io_cli_error("writing output file", &args.output, e))?;

    generated.stats.report();
    eprintln!("Final md5: {}", generated.digest);
    eprintln!(
        "Wrote {} bytes to {} in {:.2?}",
        generated.bytes.len(),
        args.output.display(),
        start.elapsed()
    );
    Ok(())
}
