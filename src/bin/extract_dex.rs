use std::process;

use anyhow::{Context, Result};
use apk_janus::cli::{init_logger, parse_or_exit, ExtractArgs};
use apk_janus::extract_dex_file;

fn run(args: &ExtractArgs) -> Result<usize> {
    let dex = extract_dex_file(&args.input_apk, &args.output_dex)
        .with_context(|| format!("Failed to extract DEX from {}", args.input_apk.display()))?;
    Ok(dex.len())
}

fn main() {
    let args: ExtractArgs = parse_or_exit();
    init_logger(args.verbose);

    match run(&args) {
        Ok(len) => println!("Extracted {} bytes to {}.", len, args.output_dex.display()),
        Err(err) => {
            println!("{:#}", err);
            process::exit(1);
        }
    }
}
