use crate::buffer::AcquisitionBuffer;
use crate::error::StartupError;
use crate::sink::{DetectionEvent, ResultSink};
use crate::source::SampleSource;
use crate::timing::{Suspension, Ticker, TimingSource};
use dtmfrx_detect::{
    BlockAnalyzer, Detection, DetectorConfig, FftMagnitude, SpectralTransform,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingState {
    /// Constructed, not yet started.
    Idle,
    Buffering,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The sample was stored and the block is still filling.
    Stored,
    /// The sample completed the block; call [`Pipeline::process`].
    BlockReady,
    /// Not buffering, nothing was read.
    Ignored,
}

/// The acquisition buffer, the state flag and the analysis stages, owned together.
///
/// [`on_tick`](Self::on_tick) is the periodic sampling callback and
/// [`process`](Self::process) the compute routine. They never overlap on the
/// buffer: the timing source is suspended for the whole of `process`, so
/// audio arriving during analysis is lost.
pub struct Pipeline<K, T = FftMagnitude> {
    state: ProcessingState,
    buffer: AcquisitionBuffer,
    analyzer: BlockAnalyzer<T>,
    sink: K,
    cycles: u64,
}

impl<K: ResultSink> Pipeline<K, FftMagnitude> {
    pub fn new(config: &DetectorConfig, sink: K) -> Result<Self, StartupError> {
        let analyzer = BlockAnalyzer::new(config)?;
        Self::with_analyzer(config, analyzer, sink)
    }
}

impl<K: ResultSink, T: SpectralTransform> Pipeline<K, T> {
    pub fn with_transform(
        config: &DetectorConfig,
        transform: T,
        sink: K,
    ) -> Result<Self, StartupError> {
        let analyzer = BlockAnalyzer::with_transform(config, transform)?;
        Self::with_analyzer(config, analyzer, sink)
    }

    fn with_analyzer(
        config: &DetectorConfig,
        analyzer: BlockAnalyzer<T>,
        sink: K,
    ) -> Result<Self, StartupError> {
        let buffer = AcquisitionBuffer::new(config.block_size());
        if analyzer.block_size() != buffer.capacity() {
            return Err(dtmfrx_detect::TransformError::SizeMismatch {
                transform: analyzer.block_size(),
                block: buffer.capacity(),
            }
            .into());
        }
        Ok(Self {
            state: ProcessingState::Idle,
            buffer,
            analyzer,
            sink,
            cycles: 0,
        })
    }

    pub fn state(&self) -> ProcessingState {
        self.state
    }

    /// Number of completed analysis cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn buffer(&self) -> &AcquisitionBuffer {
        &self.buffer
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Leave `Idle`, enable the timing source and start buffering.
    pub fn start<M: TimingSource + ?Sized>(&mut self, timer: &mut M) {
        if self.state != ProcessingState::Idle {
            return;
        }
        self.buffer.reset();
        self.state = ProcessingState::Buffering;
        timer.resume();
        info!(block = self.buffer.capacity(), "sampling started");
    }

    /// Periodic sampling callback: at most one read and one store.
    pub fn on_tick<S: SampleSource + ?Sized>(&mut self, source: &mut S) -> TickOutcome {
        if self.state != ProcessingState::Buffering {
            return TickOutcome::Ignored;
        }
        if self.buffer.push(source.read_sample()) {
            self.state = ProcessingState::Processing;
            TickOutcome::BlockReady
        } else {
            TickOutcome::Stored
        }
    }

    /// Analyze a full block with `timer` suspended, then report the result.
    ///
    /// Does nothing unless a block is ready. The result reaches the sink
    /// after the timing source has been resumed.
    pub fn process<M: TimingSource + ?Sized>(&mut self, timer: &mut M) -> Option<Detection> {
        if self.state != ProcessingState::Processing {
            return None;
        }

        let detection = {
            let _suspended = Suspension::new(timer);
            let detection = self.analyzer.analyze(self.buffer.as_slice());
            self.state = ProcessingState::Buffering;
            detection
        };

        let cycle = self.cycles;
        self.cycles += 1;
        debug!(cycle, symbol = ?detection.symbol(), "analysis complete");
        self.sink.emit(DetectionEvent { cycle, detection });
        Some(detection)
    }

    /// Drive ticks from `input` until it stops or `max_cycles` analyses complete.
    ///
    /// Returns the number of cycles completed by this call.
    pub fn run<I>(&mut self, input: &mut I, max_cycles: Option<u64>) -> u64
    where
        I: SampleSource + Ticker + ?Sized,
    {
        self.start(input);
        let first = self.cycles;
        while max_cycles.map_or(true, |max| self.cycles - first < max) {
            if !input.wait_tick() {
                break;
            }
            if self.on_tick(input) == TickOutcome::BlockReady {
                self.process(input);
            }
        }
        self.cycles - first
    }
}
