use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use crate::config::PatchConfig;

#[derive(Parser, Debug)]
#[command(
    name = "janus",
    about = "Prepend data (e.g. a DEX) to an APK while keeping the archive valid",
    version
)]
pub struct PatchArgs {
    /// Use this flag to correct the input DEX's checksums.
    #[arg(
        short = 'c',
        long = "fix-checksum",
        visible_alias = "dex",
        short_alias = 'd',
        action = ArgAction::SetTrue
    )]
    pub fix_checksum: bool,

    /// Refuse to fix checksums when the input data has no DEX magic.
    #[arg(long = "strict-dex", action = ArgAction::SetTrue, requires = "fix_checksum")]
    pub strict_dex: bool,

    /// Re-read the output archive and check every local header offset.
    #[arg(long, action = ArgAction::SetTrue)]
    pub verify: bool,

    /// Increase output verbosity (e.g., -vv is more than -v).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// This can be a DEX file or custom data, like a TXT file.
    pub input_data: PathBuf,

    /// The APK you want to inject the data into.
    pub input_apk: PathBuf,

    /// The output APK filename.
    pub output_apk: PathBuf,
}

impl PatchArgs {
    pub fn to_config(&self) -> PatchConfig {
        PatchConfig {
            fix_checksum: self.fix_checksum,
            strict_dex: self.strict_dex,
            verify: self.verify,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "extract-dex",
    about = "Extract a DEX prepended to an APK and fix its header",
    version
)]
pub struct ExtractArgs {
    /// Increase output verbosity (e.g., -vv is more than -v).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Patched APK carrying a DEX in front of its first entry.
    pub input_apk: PathBuf,

    /// Where to write the extracted DEX.
    pub output_dex: PathBuf,
}

pub fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the logger; `RUST_LOG` wins over the `-v` count when set.
pub fn init_logger(verbose: u8) {
    let _ = env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Like `Parser::parse` but argument errors go to stdout and exit with status 1.
/// `--help` and `--version` still print normally and exit 0.
pub fn parse_or_exit<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            println!("{}", err.render());
            process::exit(1);
        }
        Err(err) => {
            let _ = err.print();
            process::exit(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<PatchArgs, clap::Error> {
        let mut argv = vec!["janus"];
        argv.extend(args);
        PatchArgs::try_parse_from(&argv)
    }

    #[test]
    fn positionals_map_in_order() {
        let args = parse(&["classes.dex", "in.apk", "out.apk"]).expect("parse");
        assert_eq!(args.input_data, PathBuf::from("classes.dex"));
        assert_eq!(args.input_apk, PathBuf::from("in.apk"));
        assert_eq!(args.output_apk, PathBuf::from("out.apk"));
        assert_eq!(args.to_config(), PatchConfig::default());
    }

    #[test]
    fn checksum_flag_spellings() {
        for flag in ["-c", "--fix-checksum", "--dex", "-d"] {
            let args = parse(&[flag, "a", "b", "c"]).expect("parse");
            assert!(args.to_config().fix_checksum, "{} should enable repair", flag);
        }
    }

    #[test]
    fn extra_options_map_into_config() {
        let args = parse(&["-c", "--strict-dex", "--verify", "-vv", "a", "b", "c"]).expect("parse");
        let cfg = args.to_config();
        assert!(cfg.fix_checksum);
        assert!(cfg.strict_dex);
        assert!(cfg.verify);
        assert_eq!(args.verbose, 2);
        assert_eq!(log_level(args.verbose), LevelFilter::Debug);
    }

    #[test]
    fn strict_needs_checksum_flag() {
        assert!(parse(&["--strict-dex", "a", "b", "c"]).is_err());
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        assert!(parse(&["a", "b"]).is_err());
        assert!(parse(&["a", "b", "c", "d"]).is_err());
    }

    #[test]
    fn extract_args_parse() {
        let args = ExtractArgs::try_parse_from(["extract-dex", "-v", "in.apk", "out.dex"]).expect("parse");
        assert_eq!(args.verbose, 1);
        assert_eq!(args.output_dex, PathBuf::from("out.dex"));
    }

    #[test]
    fn verbosity_caps_at_trace() {
        assert_eq!(log_level(0), LevelFilter::Warn);
        assert_eq!(log_level(1), LevelFilter::Info);
        assert_eq!(log_level(7), LevelFilter::Trace);
    }
}
