use crate::device::DeviceError;
use crate::timing::TimingError;
use dtmfrx_detect::{ConfigError, TransformError};
use thiserror::Error;

/// Failures that stop the detector before it reaches steady state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("transform initialization failed: {0}")]
    Transform(#[from] TransformError),
    #[error("timing source initialization failed: {0}")]
    Timing(#[from] TimingError),
    #[error("audio input initialization failed: {0}")]
    Device(#[from] DeviceError),
}
