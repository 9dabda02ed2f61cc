/// ## Processor configuration
///
/// `legacy_jump` makes a taken jump also run its target line in the same
/// step. `legacy_var` makes a `var` line assign only the first time it
/// runs. Both reproduce older script behavior and are off by default.

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub instructions_per_tick: usize,
    pub max_variables: usize,
    /// Size of the processor-local memory device. Zero for none.
    pub memory_size: usize,
    pub sweep_period: u32,
    pub legacy_jump: bool,
    pub legacy_var: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instructions_per_tick: 10,
            max_variables: 1024,
            memory_size: 0,
            sweep_period: 1000,
            legacy_jump: false,
            legacy_var: false,
        }
    }
}
