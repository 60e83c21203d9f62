//! Sampling side of the detector: the acquisition buffer, the
//! buffering/processing state machine and the timing sources that drive it.

pub mod buffer;
pub mod device;
pub mod error;
pub mod scheduler;
pub mod sink;
pub mod source;
pub mod timing;

pub use buffer::AcquisitionBuffer;
pub use device::{list_input_devices, DeviceError, DeviceInput};
pub use error::StartupError;
pub use scheduler::{Pipeline, ProcessingState, TickOutcome};
pub use sink::{ChangeSink, DetectionEvent, LineSink, ResultSink};
pub use source::SampleSource;
pub use timing::{IntervalTimer, Paced, Suspension, Ticker, TimingError, TimingSource};
