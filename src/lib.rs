pub mod cli;
pub mod cmd;
pub mod config;
pub mod delegate;
pub mod error;
pub mod interrupt;
pub mod layer;
pub mod logging;
pub mod preflight;
pub mod prompt;
pub mod publish;
pub mod region;
pub mod stage;
pub mod tools;
pub mod util;

pub use error::{LayerError, LayerResult};
