// error.rs - Configuration errors

use thiserror::Error;

/// Rejected configuration values. Nothing past construction can fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid width must be non-zero")]
    ZeroWidth,
    #[error("grid height must be non-zero")]
    ZeroHeight,
    #[error("initial live cell count must be non-zero")]
    ZeroInitialLiveCells,
    #[error("alive colour must differ from the background colour")]
    IndistinctPalette,
    #[error("overlay step size must be non-zero")]
    ZeroStepSize,
    #[error("disruption interval must be non-zero")]
    ZeroDisruptionInterval,
    #[error("{field} range {min}..={max} is empty or inverted")]
    InvalidRange {
        field: &'static str,
        min: usize,
        max: usize,
    },
}
