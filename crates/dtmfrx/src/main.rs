use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dtmfrx_capture::{
    list_input_devices, ChangeSink, DeviceInput, IntervalTimer, LineSink, Paced, Pipeline,
    ResultSink, StartupError,
};
use dtmfrx_detect::DetectorConfig;
use dtmfrx_tone::ToneSequence;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dtmfrx", version, about = "Block-based DTMF tone detector")]
struct Cli {
    #[command(flatten)]
    detector: DetectorArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct DetectorArgs {
    /// Sampling rate in Hz
    #[arg(long, default_value_t = 8000.0, global = true)]
    sample_rate: f32,

    /// Samples per analysis block (power of two)
    #[arg(long, default_value_t = 1024, global = true)]
    block_size: usize,

    /// Transform length; must equal the block size
    #[arg(long, global = true)]
    transform_size: Option<usize>,

    /// Q31 magnitude a tone must exceed to count
    #[arg(long, default_value_t = 10_000, global = true)]
    threshold: i32,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect tones from an audio input device
    Listen {
        /// Regex selecting the input device by name
        #[arg(short, long)]
        device: Option<String>,

        /// Only print when the detection changes
        #[arg(long)]
        changes_only: bool,

        /// Stop after this many analysis cycles
        #[arg(long)]
        cycles: Option<u64>,
    },
    /// Feed synthesized tones through the detector
    Loopback {
        /// Keys to play, from 0-9, * and #
        #[arg(short, long)]
        keys: String,

        /// Tone duration per key in milliseconds
        #[arg(long, default_value_t = 300)]
        tone_ms: u32,

        /// Silence after each key in milliseconds
        #[arg(long, default_value_t = 100)]
        gap_ms: u32,

        /// Combined tone level as a fraction of full scale
        #[arg(long, default_value_t = 0.001)]
        level: f32,

        /// Run as fast as possible instead of in real time
        #[arg(long)]
        unpaced: bool,

        /// Only print when the detection changes
        #[arg(long)]
        changes_only: bool,

        /// Stop after this many analysis cycles (default: until the keys are played)
        #[arg(long)]
        cycles: Option<u64>,
    },
    /// List audio input devices
    Devices,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Devices => {
            for name in list_input_devices().context("listing input devices")? {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Listen {
            device,
            changes_only,
            cycles,
        } => {
            let config = detector_config(&cli.detector)?;
            let mut input = DeviceInput::open(&config, device.as_deref())
                .map_err(StartupError::from)?;
            info!("DTMF Detection Demo ({} Hz sampling)", config.sample_rate_hz());
            info!("Using input device: {}", input.name());
            let mut pipeline = Pipeline::new(&config, stdout_sink(changes_only))?;
            info!("Listening for DTMF tones...");
            pipeline.run(&mut input, cycles);
            Ok(())
        }
        Command::Loopback {
            keys,
            tone_ms,
            gap_ms,
            level,
            unpaced,
            changes_only,
            cycles,
        } => {
            let config = detector_config(&cli.detector)?;
            let rate = config.sample_rate_hz();
            let tone_samples = ms_to_samples(tone_ms, rate);
            let gap_samples = ms_to_samples(gap_ms, rate);
            let mut sequence = ToneSequence::new(rate, &keys, tone_samples, gap_samples, level)
                .context("building tone sequence")?;
            let cycles = cycles.unwrap_or_else(|| {
                sequence.len_samples().div_ceil(config.block_size()) as u64
            });

            let timer = if unpaced {
                IntervalTimer::unpaced(rate)
            } else {
                IntervalTimer::new(rate)
            }
            .map_err(StartupError::from)?;
            let mut input = Paced::new(move || sequence.next_sample(), timer);

            info!("DTMF Detection Demo ({} Hz sampling)", rate);
            info!("Playing {:?} through the detector", keys);
            let mut pipeline = Pipeline::new(&config, stdout_sink(changes_only))?;
            let done = pipeline.run(&mut input, Some(cycles));
            info!("{} analysis cycles completed", done);
            Ok(())
        }
    }
}

fn detector_config(args: &DetectorArgs) -> Result<DetectorConfig, StartupError> {
    let mut builder = DetectorConfig::builder()
        .sample_rate_hz(args.sample_rate)
        .block_size(args.block_size)
        .threshold(args.threshold);
    if let Some(transform_size) = args.transform_size {
        builder = builder.transform_size(transform_size);
    }
    Ok(builder.build()?)
}

fn stdout_sink(changes_only: bool) -> Box<dyn ResultSink> {
    let lines = LineSink::new(std::io::stdout());
    if changes_only {
        Box::new(ChangeSink::new(lines))
    } else {
        Box::new(lines)
    }
}

fn ms_to_samples(ms: u32, sample_rate_hz: f32) -> usize {
    let len = (sample_rate_hz * (ms as f32 / 1000.0)).round() as usize;
    len.max(1)
}
