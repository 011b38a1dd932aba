pub mod apk_zip;
pub mod cli;
pub mod config;
pub mod dex;
pub mod error;
pub mod patcher;
mod utils;

pub use config::PatchConfig;
pub use error::{PatchError, Result};
pub use patcher::{
    assemble, extract_dex, extract_dex_file, extract_payload, patch, patch_files, PatchOutcome,
};
