// Copyright (c) 2026 The minute-minder Authors. All rights reserved.

use crate::StereoSample;
use anyhow::anyhow;
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, SizedSample, Stream, SupportedStreamConfig,
};
use crossbeam::queue::ArrayQueue;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::{fmt::Debug, sync::Arc, thread::JoinHandle};

/// Commands the application sends to the audio service.
pub enum AudioInterfaceInput {
    Play,
    Pause,
    Quit,
}

/// Events the audio service sends back to the application.
#[derive(Clone, Debug)]
pub enum AudioInterfaceEvent {
    /// The stream is up. Carries the sample rate and the queue to fill.
    Reset(usize, AudioQueue),

    /// The interface consumed samples and has room for this many more.
    NeedsAudio(usize),

    /// The stream could not be created. This is the activation-failure
    /// signal: the application logs it and leaves the session stopped.
    StartupFailed(String),
}

/// The producer-consumer queue of stereo samples that the audio stream
/// consumes.
pub type AudioQueue = Arc<ArrayQueue<StereoSample>>;

/// Runs an [AudioStream] on its own thread, commanded and observed over
/// crossbeam channels. Creating the service is the session's one-time audio
/// activation step: the first event is either Reset (ready) or
/// StartupFailed.
pub struct AudioStreamService {
    input_sender: Sender<AudioInterfaceInput>,
    event_receiver: Receiver<AudioInterfaceEvent>,

    #[allow(dead_code)]
    handler: JoinHandle<()>,
}
impl AudioStreamService {
    pub fn start() -> Self {
        // Sends input from the app to the service.
        let (input_sender, input_receiver) = unbounded();

        // Sends events from the service to the app.
        let (event_sender, event_receiver) = unbounded();

        let handler = std::thread::spawn(move || {
            match AudioStream::create_default_stream(
                AudioStream::REASONABLE_BUFFER_SIZE,
                event_sender.clone(),
            ) {
                Ok(audio_stream) => {
                    while let Ok(input) = input_receiver.recv() {
                        match input {
                            AudioInterfaceInput::Play => audio_stream.play(),
                            AudioInterfaceInput::Pause => audio_stream.pause(),
                            AudioInterfaceInput::Quit => break,
                        }
                    }
                }
                Err(e) => {
                    let _ = event_sender.send(AudioInterfaceEvent::StartupFailed(e.to_string()));
                }
            }
        });
        Self {
            input_sender,
            event_receiver,
            handler,
        }
    }

    pub fn sender(&self) -> &Sender<AudioInterfaceInput> {
        &self.input_sender
    }

    pub fn receiver(&self) -> &Receiver<AudioInterfaceEvent> {
        &self.event_receiver
    }
}

/// Encapsulates the connection to the audio interface.
pub struct AudioStream {
    // cpal config describing the current audio stream.
    config: SupportedStreamConfig,

    // The cpal audio stream.
    stream: Stream,

    // The queue of samples that the stream consumes.
    queue: AudioQueue,

    // The sending half of the channel that the audio stream uses to report
    // back to the service's owner.
    sender: Sender<AudioInterfaceEvent>,
}
impl Debug for AudioStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStream")
            .field("config", &"(skipped)")
            .field("stream", &"(skipped)")
            .field("queue", &self.queue)
            .field("sender", &self.sender)
            .finish()
    }
}
impl AudioStream {
    /// How many samples the interface can buffer ahead. At 44.1KHz, 2048
    /// stereo samples is about 46 milliseconds of latency, which is plenty
    /// tight for a once-a-minute chime.
    pub const REASONABLE_BUFFER_SIZE: usize = 2048;

    pub fn create_default_stream(
        buffer_size: usize,
        audio_stream_event_sender: Sender<AudioInterfaceEvent>,
    ) -> anyhow::Result<Self> {
        let (_host, device, config) = Self::host_device_setup()?;
        let queue = Arc::new(ArrayQueue::new(buffer_size));
        let stream = Self::stream_setup_for(
            &device,
            &config,
            &queue,
            audio_stream_event_sender.clone(),
        )?;
        let r = Self {
            config,
            stream,
            queue,
            sender: audio_stream_event_sender,
        };
        r.send_reset();
        Ok(r)
    }

    /// Returns the sample rate of the current audio stream.
    pub fn sample_rate(&self) -> usize {
        let config: &cpal::StreamConfig = &self.config.clone().into();
        config.sample_rate.0 as usize
    }

    /// Tells the audio stream to start playing audio (and consuming samples
    /// from the queue).
    pub fn play(&self) {
        let _ = self.stream.play();
    }

    /// Tells the audio stream to stop playing audio (which means it will
    /// also stop consuming samples from the queue).
    pub fn pause(&self) {
        let _ = self.stream.pause();
    }

    /// Returns the default host, device, and stream config (all of which
    /// are cpal concepts).
    fn host_device_setup(
    ) -> anyhow::Result<(cpal::Host, cpal::Device, cpal::SupportedStreamConfig)> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("Default output device is not available"))?;
        let config = device.default_output_config()?;
        Ok((host, device, config))
    }

    /// Creates and returns a Stream for the given device and config. The
    /// Stream will consume the supplied queue of [StereoSample]s. This
    /// function is a wrapper around the generic stream_make<T>().
    fn stream_setup_for(
        device: &cpal::Device,
        config: &SupportedStreamConfig,
        queue: &AudioQueue,
        audio_stream_event_sender: Sender<AudioInterfaceEvent>,
    ) -> anyhow::Result<Stream> {
        let config = config.clone();

        match config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::stream_make::<f32>(&config.into(), device, queue, audio_stream_event_sender)
            }
            other => Err(anyhow!("Unsupported sample format {other:?}")),
        }
    }

    /// Generic portion of stream_setup_for().
    fn stream_make<T>(
        config: &cpal::StreamConfig,
        device: &cpal::Device,
        queue: &AudioQueue,
        audio_stream_event_sender: Sender<AudioInterfaceEvent>,
    ) -> anyhow::Result<Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let err_fn = |err| log::error!("Error building output sound stream: {err}");

        let queue = Arc::clone(queue);
        let channel_count = config.channels as usize;
        let stream = device.build_output_stream(
            config,
            move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
                Self::on_window(
                    output,
                    channel_count,
                    &queue,
                    audio_stream_event_sender.clone(),
                )
            },
            err_fn,
            None,
        )?;
        Ok(stream)
    }

    /// cpal callback that supplies samples from the queue, substituting
    /// silence on underrun, then asks the owner for a refill.
    fn on_window<T>(
        output: &mut [T],
        channel_count: usize,
        queue: &AudioQueue,
        audio_stream_event_sender: Sender<AudioInterfaceEvent>,
    ) where
        T: cpal::Sample + FromSample<f32>,
    {
        for frame in output.chunks_exact_mut(channel_count) {
            let sample = queue.pop().unwrap_or_default();
            frame[0] = T::from_sample(sample.0 .0 as f32);
            if channel_count > 1 {
                frame[1] = T::from_sample(sample.1 .0 as f32);
            }
        }
        let capacity = queue.capacity();
        let len = queue.len();
        if len < capacity {
            let _ = audio_stream_event_sender.send(AudioInterfaceEvent::NeedsAudio(capacity - len));
        }
    }

    fn send_reset(&self) {
        let _ = self.sender.send(AudioInterfaceEvent::Reset(
            self.sample_rate(),
            Arc::clone(&self.queue),
        ));
    }
}
