/// Options for one patch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchConfig {
    /// Treat the prepended data as a DEX and fix its size, signature and checksum
    pub fix_checksum: bool,
    /// With `fix_checksum`, refuse data that does not start with the DEX magic
    pub strict_dex: bool,
    /// Re-read the output's central directory and check every local header offset
    pub verify: bool,
}

impl PatchConfig {
    pub fn dex() -> Self {
        PatchConfig {
            fix_checksum: true,
            ..PatchConfig::default()
        }
    }
}
