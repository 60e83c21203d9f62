use dtmfrx_detect::Detection;
use std::io::Write;
use std::sync::mpsc::Sender;
use tracing::warn;

/// One classification outcome, numbered by completed analysis cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionEvent {
    pub cycle: u64,
    pub detection: Detection,
}

/// Receives one event per completed analysis cycle.
pub trait ResultSink {
    fn emit(&mut self, event: DetectionEvent);
}

impl ResultSink for Vec<DetectionEvent> {
    fn emit(&mut self, event: DetectionEvent) {
        self.push(event);
    }
}

impl ResultSink for Sender<DetectionEvent> {
    fn emit(&mut self, event: DetectionEvent) {
        let _ = self.send(event);
    }
}

impl<K: ResultSink + ?Sized> ResultSink for Box<K> {
    fn emit(&mut self, event: DetectionEvent) {
        (**self).emit(event);
    }
}

/// Writes one text line per event.
pub struct LineSink<W> {
    out: W,
}

impl<W: Write> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for LineSink<W> {
    fn emit(&mut self, event: DetectionEvent) {
        let written = writeln!(self.out, "{}", event.detection).and_then(|_| self.out.flush());
        if let Err(err) = written {
            warn!("failed to write detection: {}", err);
        }
    }
}

/// Forwards an event only when its detection differs from the previous one.
pub struct ChangeSink<K> {
    inner: K,
    last: Option<Detection>,
}

impl<K: ResultSink> ChangeSink<K> {
    pub fn new(inner: K) -> Self {
        Self { inner, last: None }
    }

    pub fn into_inner(self) -> K {
        self.inner
    }
}

impl<K: ResultSink> ResultSink for ChangeSink<K> {
    fn emit(&mut self, event: DetectionEvent) {
        if self.last == Some(event.detection) {
            return;
        }
        self.last = Some(event.detection);
        self.inner.emit(event);
    }
}
