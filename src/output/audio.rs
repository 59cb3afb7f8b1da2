use crate::output::rodio::buffer;
use crate::output::rodio::queue::{queue, SourcesQueueInput};
use crate::output::rodio::{self, Sample, Sink};
use crate::prelude::*;
use std::sync::Arc;

/// A node that plays received sample buffers out on audio. Currently
/// this only uses the default output device on the system.
#[derive(Node)]
pub struct AudioNode<T>
where
    T: Sample + Send + 'static,
{
    pub input: NodeReceiver<Vec<T>>,
    _sink: Sink,
    in_queue: Arc<SourcesQueueInput<T>>,
    channels: u16,
    sample_rate: u32,
}

impl<T> AudioNode<T>
where
    T: Sample + Send + 'static,
{
    /// Tosses the received samples into the sink for output.
    pub fn run(&mut self, samples: Vec<T>) -> Result<(), NodeError> {
        let samplebuffer = buffer::SamplesBuffer::new(
            self.channels,
            self.sample_rate,
            samples,
        );
        self.in_queue.append(samplebuffer);
        Ok(())
    }
}

/// Creates an AudioNode with the given parameters.
pub fn audio<T>(channels: u16, sample_rate: u32, volume: f32) -> AudioNode<T>
where
    T: Sample + Send + 'static,
{
    let device = rodio::default_output_device().unwrap();
    let mut sink = Sink::new(&device);
    let (in_queue, out_queue) = queue::<T>(true);
    sink.set_volume(volume);
    sink.append(out_queue);
    AudioNode::new(sink, in_queue, channels, sample_rate)
}

/// Plays a mono buffer on the default output device and blocks until
/// playback completes, MATLAB-style.
///
/// # Arguments
///
/// * `samples` - The sound buffer to play.
/// * `sample_rate` - The sampling frequency in Hz.
/// * `pan` - Stereo position: -1 pans all the way left, +1 all the way
/// right, 0 plays centered.
pub fn play_blocking(samples: &[f32], sample_rate: u32, pan: f32) {
    let device = rodio::default_output_device().unwrap();
    let sink = Sink::new(&device);
    let stereo = pan_stereo(samples, pan);
    sink.append(buffer::SamplesBuffer::new(2, sample_rate, stereo));
    sink.sleep_until_end();
}

/// Interleaves a mono buffer into a stereo one with constant-power
/// panning. Values of `pan` outside [-1, 1] are clamped.
pub fn pan_stereo(samples: &[f32], pan: f32) -> Vec<f32> {
    let pan = pan.max(-1.0).min(1.0);
    let theta = (pan + 1.0) * std::f32::consts::PI / 4.0;
    let (gain_l, gain_r) = (theta.cos(), theta.sin());
    let mut stereo = Vec::with_capacity(samples.len() * 2);
    for &samp in samples {
        stereo.push(samp * gain_l);
        stereo.push(samp * gain_r);
    }
    stereo
}
