use anyhow::Context;
use cpal::{
    BufferSize, Device, OutputCallbackInfo, SampleRate, StreamConfig,
    SupportedBufferSize,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use phosphor_core::{SAMPLE_RATE, frame::NUM_CHANNELS};

mod cursor;

pub use cpal::Stream;
pub use cursor::{PcmCursor, Pull};

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// default: 0.1
    pub target_latency_s: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_latency_s: 0.1,
        }
    }
}

pub struct Player {
    device: Device,
}

impl Player {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());
        let device = host
            .default_output_device()
            .ok_or(anyhow::anyhow!("no output device"))?;
        if let Ok(name) = device.name() {
            log::info!("cpal device: {}", name);
        } else {
            log::info!("cpal device: (no name)");
        }
        Ok(Self { device })
    }

    fn choose_config(&self, config: Config) -> anyhow::Result<StreamConfig> {
        let default_config = self.device.default_output_config()?;
        let channels = NUM_CHANNELS as u32;
        let ideal_buffer_size =
            (SAMPLE_RATE as f32 * config.target_latency_s) as u32;
        // Round down to a multiple of 4. It's not clear why this is necessary but alsa complains
        // if the buffer size is not evenly divisible by 4.
        let ideal_buffer_size = ideal_buffer_size & (!3);
        let buffer_size = match default_config.buffer_size() {
            SupportedBufferSize::Range { min, max } => {
                BufferSize::Fixed(ideal_buffer_size.clamp(*min, *max))
            }
            SupportedBufferSize::Unknown => BufferSize::Default,
        };
        Ok(StreamConfig {
            channels: channels as u16,
            sample_rate: SampleRate(SAMPLE_RATE as u32),
            buffer_size,
        })
    }

    /// Start playing `cursor` from its current position. Playback continues
    /// for as long as the returned stream is alive, and plays silence once
    /// the cursor runs out.
    pub fn play(
        &self,
        mut cursor: PcmCursor,
        config: Config,
    ) -> anyhow::Result<Stream> {
        let config = self.choose_config(config)?;
        log::info!("sample rate: {}", config.sample_rate.0);
        log::info!("num channels: {}", config.channels);
        log::info!("buffer size: {:?}", config.buffer_size);
        let channels = config.channels as usize;
        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &OutputCallbackInfo| {
                    cursor.fill_interleaved(data, channels);
                },
                |err| log::error!("stream error: {}", err),
                None,
            )
            .context("failed to open audio stream")?;
        stream.play().context("failed to start audio stream")?;
        Ok(stream)
    }
}
