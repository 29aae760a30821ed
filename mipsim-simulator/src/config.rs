use mipsim_types::constants::TEXT_OFFSET;

/// The config for `Processor`
#[derive(Debug, Clone)]
pub struct Config {
    /// Memory size in bytes
    pub memory_size: usize,
    /// Where programs are loaded and execution starts
    pub text_offset: u32,
    /// Stop a runaway program after this many executed instructions
    pub step_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            memory_size: 16 * 1024 * 1024,
            text_offset: TEXT_OFFSET,
            step_limit: 100_000,
        }
    }
}
