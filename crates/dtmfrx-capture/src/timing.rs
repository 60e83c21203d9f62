use crate::source::SampleSource;
use dtmfrx_detect::Sample;
use std::time::{Duration, Instant};
use thiserror::Error;

/// A periodic tick source that can be switched off while a block is analyzed.
pub trait TimingSource {
    fn suspend(&mut self);
    fn resume(&mut self);
}

/// A timing source the driver loop can block on.
pub trait Ticker: TimingSource {
    /// Wait for the next tick. Returns false once no further ticks will come.
    fn wait_tick(&mut self) -> bool;
}

/// Keeps a timing source suspended for as long as it is alive.
///
/// The source is resumed on drop, including during unwinding.
pub struct Suspension<'a, T: TimingSource + ?Sized> {
    timer: &'a mut T,
}

impl<'a, T: TimingSource + ?Sized> Suspension<'a, T> {
    pub fn new(timer: &'a mut T) -> Self {
        timer.suspend();
        Self { timer }
    }
}

impl<T: TimingSource + ?Sized> Drop for Suspension<'_, T> {
    fn drop(&mut self) {
        self.timer.resume();
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimingError {
    #[error("tick rate must be a positive finite number, got {0} Hz")]
    InvalidRate(f32),
}

/// Software periodic timer.
///
/// Paced timers sleep until each deadline; unpaced timers tick as fast as the
/// caller asks. Deadlines missed while the caller was busy are skipped, not
/// reported.
#[derive(Debug)]
pub struct IntervalTimer {
    period: Option<Duration>,
    next: Instant,
    running: bool,
}

impl IntervalTimer {
    /// Timer that ticks in real time at `rate_hz`.
    pub fn new(rate_hz: f32) -> Result<Self, TimingError> {
        let period = period_for(rate_hz)?;
        Ok(Self {
            period: Some(period),
            next: Instant::now(),
            running: false,
        })
    }

    /// Timer that never sleeps, for offline runs.
    pub fn unpaced(rate_hz: f32) -> Result<Self, TimingError> {
        period_for(rate_hz)?;
        Ok(Self {
            period: None,
            next: Instant::now(),
            running: false,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

fn period_for(rate_hz: f32) -> Result<Duration, TimingError> {
    if !(rate_hz.is_finite() && rate_hz > 0.0) {
        return Err(TimingError::InvalidRate(rate_hz));
    }
    Ok(Duration::from_secs_f64(1.0 / f64::from(rate_hz)))
}

impl TimingSource for IntervalTimer {
    fn suspend(&mut self) {
        self.running = false;
    }

    fn resume(&mut self) {
        self.running = true;
        if let Some(period) = self.period {
            self.next = Instant::now() + period;
        }
    }
}

impl Ticker for IntervalTimer {
    fn wait_tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let Some(period) = self.period else {
            return true;
        };
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
            self.next += period;
        } else if now - self.next > period {
            self.next = now + period;
        } else {
            self.next += period;
        }
        true
    }
}

/// A sample source clocked by an [`IntervalTimer`].
pub struct Paced<S> {
    source: S,
    timer: IntervalTimer,
}

impl<S: SampleSource> Paced<S> {
    pub fn new(source: S, timer: IntervalTimer) -> Self {
        Self { source, timer }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: SampleSource> SampleSource for Paced<S> {
    fn read_sample(&mut self) -> Sample {
        self.source.read_sample()
    }
}

impl<S> TimingSource for Paced<S> {
    fn suspend(&mut self) {
        self.timer.suspend();
    }

    fn resume(&mut self) {
        self.timer.resume();
    }
}

impl<S> Ticker for Paced<S> {
    fn wait_tick(&mut self) -> bool {
        self.timer.wait_tick()
    }
}
