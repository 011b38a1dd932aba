use std::process;

use anyhow::{Context, Result};
use apk_janus::cli::{init_logger, parse_or_exit, PatchArgs};
use apk_janus::patch_files;

fn run(args: &PatchArgs) -> Result<()> {
    let outcome = patch_files(&args.input_data, &args.input_apk, &args.output_apk, &args.to_config())
        .with_context(|| format!("Failed to generate {}", args.output_apk.display()))?;
    log::info!("Shifted {} central directory entries", outcome.entries);
    Ok(())
}

fn main() {
    let args: PatchArgs = parse_or_exit();
    init_logger(args.verbose);

    if let Err(err) = run(&args) {
        println!("{:#}", err);
        process::exit(1);
    }
    println!("Successfully generated {}.", args.output_apk.display());
}
