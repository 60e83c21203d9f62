use dtmfrx_detect::Sample;

/// Reads the current sample from the audio channel, once per tick.
///
/// Reads never block and never fail.
pub trait SampleSource {
    fn read_sample(&mut self) -> Sample;
}

impl<F> SampleSource for F
where
    F: FnMut() -> Sample,
{
    fn read_sample(&mut self) -> Sample {
        self()
    }
}
