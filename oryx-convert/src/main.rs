use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use oryx_convert::{OutputFormat, convert};

#[derive(Parser, Debug)]
#[command(
    name = "oryx-convert",
    version,
    about = "Convert a ZSA Oryx keymap.c export into an OLKB Planck rev6 keymap"
)]
struct Args {
    /// Oryx `keymap.c` export
    input: PathBuf,

    /// Directory the generated files are written to
    #[arg(short, long, value_name = "DIR", default_value = "olkb_firmware")]
    output: PathBuf,

    /// Kind of keymap to generate
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Rust)]
    format: OutputFormat,

    /// Print debug logs
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .format_timestamp(None)
        .init();

    info!("Reading {}", args.input.display());
    let text = fs::read_to_string(&args.input).with_context(|| format!("failed to read {}", args.input.display()))?;
    let files = convert(&text, args.format).with_context(|| format!("failed to convert {}", args.input.display()))?;

    fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    for file in files {
        let path = args.output.join(file.name);
        fs::write(&path, file.contents).with_context(|| format!("failed to write {}", path.display()))?;
        info!("Generated {}", path.display());
    }
    Ok(())
}
