use crate::source::SampleSource;
use crate::timing::{Ticker, TimingSource};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use dtmfrx_detect::fixed::q31_from_f32;
use dtmfrx_detect::{DetectorConfig, Sample};
use regex::Regex;
use ringbuf::{HeapConsumer, HeapRb};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, trace, warn};

const RING_BLOCKS: usize = 4;
const POLL_INTERVAL: Duration = Duration::from_micros(250);

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("invalid device pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("no input device matched {0:?}")]
    NoMatch(String),
    #[error("no default input device available")]
    NoDefault,
    #[error("failed to enumerate input devices: {0}")]
    Devices(#[from] cpal::DevicesError),
    #[error("failed to query input configurations: {0}")]
    Configs(#[from] cpal::SupportedStreamConfigsError),
    #[error("input device does not offer {0} Hz f32 capture")]
    UnsupportedRate(u32),
    #[error("failed to build input stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
}

/// Names of the host's input devices.
pub fn list_input_devices() -> Result<Vec<String>, DeviceError> {
    let host = cpal::default_host();
    Ok(host
        .input_devices()?
        .map(|dev| dev.name().unwrap_or_else(|_| "<unknown>".to_string()))
        .collect())
}

/// Live audio input used as both the sample source and the timing source.
///
/// The device callback converts the first channel to Q31 and queues it in a
/// ring; each queued sample is one tick. While suspended the stream is paused
/// and anything queued is discarded on resume.
pub struct DeviceInput {
    stream: cpal::Stream,
    consumer: HeapConsumer<Sample>,
    name: String,
}

impl DeviceInput {
    /// Open an input device at the configured sample rate.
    ///
    /// `device_regex` selects the first device whose name matches; otherwise
    /// the host default is used. The stream stays stopped until resumed.
    pub fn open(config: &DetectorConfig, device_regex: Option<&str>) -> Result<Self, DeviceError> {
        let host = cpal::default_host();
        let device = select_input_device(&host, device_regex)?;
        let name = device.name().unwrap_or_else(|_| "<unknown>".to_string());

        let rate = config.sample_rate_hz().round() as u32;
        let supported = device
            .supported_input_configs()?
            .find(|cfg| {
                cfg.sample_format() == cpal::SampleFormat::F32
                    && cfg.min_sample_rate().0 <= rate
                    && cfg.max_sample_rate().0 >= rate
            })
            .ok_or(DeviceError::UnsupportedRate(rate))?;
        let stream_config: cpal::StreamConfig =
            supported.with_sample_rate(cpal::SampleRate(rate)).into();
        let channels = stream_config.channels as usize;

        let ring = HeapRb::<Sample>::new(config.block_size() * RING_BLOCKS);
        let (mut producer, consumer) = ring.split();

        let err_fn = |err: cpal::StreamError| error!("audio stream error: {}", err);
        let stream = device.build_input_stream(
            &stream_config,
            move |data: &[f32], _info| {
                for frame in data.chunks(channels) {
                    // A full ring drops the sample.
                    let _ = producer.push(q31_from_f32(frame[0]));
                }
            },
            err_fn,
            None,
        )?;
        if let Err(err) = stream.pause() {
            warn!("could not hold input stream before start: {}", err);
        }

        info!(device = %name, rate, channels, "audio input opened");
        Ok(Self {
            stream,
            consumer,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SampleSource for DeviceInput {
    fn read_sample(&mut self) -> Sample {
        self.consumer.pop().unwrap_or(0)
    }
}

impl TimingSource for DeviceInput {
    fn suspend(&mut self) {
        if let Err(err) = self.stream.pause() {
            warn!("failed to pause input stream: {}", err);
        }
    }

    fn resume(&mut self) {
        let mut dropped = 0usize;
        while self.consumer.pop().is_some() {
            dropped += 1;
        }
        if dropped > 0 {
            trace!(dropped, "discarded samples queued during analysis");
        }
        if let Err(err) = self.stream.play() {
            warn!("failed to resume input stream: {}", err);
        }
    }
}

impl Ticker for DeviceInput {
    fn wait_tick(&mut self) -> bool {
        while self.consumer.is_empty() {
            std::thread::sleep(POLL_INTERVAL);
        }
        true
    }
}

fn select_input_device(
    host: &cpal::Host,
    device_regex: Option<&str>,
) -> Result<cpal::Device, DeviceError> {
    if let Some(pattern) = device_regex {
        let re = Regex::new(pattern)?;
        for dev in host.input_devices()? {
            let name = dev.name().unwrap_or_else(|_| "<unknown>".to_string());
            if re.is_match(&name) {
                return Ok(dev);
            }
        }
        return Err(DeviceError::NoMatch(pattern.to_string()));
    }

    host.default_input_device().ok_or(DeviceError::NoDefault)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_pattern_is_reported() {
        let host = cpal::default_host();
        let err = select_input_device(&host, Some("(")).err();
        assert!(matches!(err, Some(DeviceError::Pattern(_))));
    }
}
