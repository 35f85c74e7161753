//! aixi-core: bit codec, seeded RNG, agent configuration, environment
//! contract, and the action-conditional CTW predictor.

pub mod bits;
pub mod config;
pub mod ctw;
pub mod env;
pub mod rng;

pub use bits::{bits_required, decode, encode, Symbol, SymbolList};
pub use config::{AgentConfig, ConfigError};
pub use ctw::ContextTree;
pub use env::{EnvSpec, Environment};
pub use rng::AgentRng;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
