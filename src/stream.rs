//! The frame loop: draw, serialise, write, advance.
//!
//! Frames are written back to back as raw ARGB32 with no header, so the
//! consumer must be told the size and rate out of band, e.g.
//! `ffmpeg -f rawvideo -pix_fmt bgra -s 256x256 -r 15 -i - out.mp4`.

use crate::draw::Canvas;
use crate::error::Result;
use crate::sketches::Sketch;
use image::RgbaImage;
use std::io::Write;
use tracing::{debug, info};

/// Surface size, frame rate and duration of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSettings {
    pub width: u32,
    pub height: u32,
    /// Frames per second.
    pub framerate: u32,
    /// Duration in seconds.
    pub length: u32,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            framerate: 15,
            length: 6,
        }
    }
}

impl FrameSettings {
    pub const fn new(width: u32, height: u32, framerate: u32, length: u32) -> Self {
        Self {
            width,
            height,
            framerate,
            length,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.framerate as u64 * self.length as u64
    }

    /// Bytes in one serialised frame.
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    pub fn clock(&self, frame: u64) -> FrameClock {
        FrameClock {
            frame,
            framerate: self.framerate,
            length: self.length,
        }
    }
}

/// Where a render is in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    pub frame: u64,
    pub framerate: u32,
    /// Total duration in seconds.
    pub length: u32,
}

impl FrameClock {
    /// Seconds since the first frame.
    pub fn time(&self) -> f64 {
        if self.framerate == 0 {
            return 0.0;
        }
        self.frame as f64 / self.framerate as f64
    }

    /// Fraction of the render elapsed, in `[0, 1)`.
    pub fn progress(&self) -> f64 {
        if self.length == 0 {
            return 0.0;
        }
        self.time() / self.length as f64
    }
}

/// Render every frame of `sketch` into `sink`; returns the frame count.
pub fn render<W: Write>(
    sketch: &mut dyn Sketch,
    settings: &FrameSettings,
    sink: &mut W,
) -> Result<u64> {
    let mut canvas = Canvas::new(settings.width, settings.height)?;
    let frame_count = settings.frame_count();
    let mut buf = Vec::with_capacity(settings.frame_bytes());

    info!(
        sketch = sketch.name(),
        width = settings.width,
        height = settings.height,
        framerate = settings.framerate,
        frames = frame_count,
        "rendering"
    );

    for frame in 0..frame_count {
        let clock = settings.clock(frame);
        canvas.begin_frame();
        sketch.draw(&mut canvas, &clock)?;
        canvas.argb32_into(&mut buf);
        sink.write_all(&buf)?;
        debug!(frame, time = clock.time(), "frame written");
    }
    sink.flush()?;

    info!(sketch = sketch.name(), frames = frame_count, "done");
    Ok(frame_count)
}

/// Render up to and including `frame` and return that frame as an image.
///
/// Earlier frames are drawn too, since sketches may carry state from one
/// frame to the next.
pub fn render_still(
    sketch: &mut dyn Sketch,
    settings: &FrameSettings,
    frame: u64,
) -> Result<RgbaImage> {
    let mut canvas = Canvas::new(settings.width, settings.height)?;
    for f in 0..=frame {
        canvas.begin_frame();
        sketch.draw(&mut canvas, &settings.clock(f))?;
    }
    info!(sketch = sketch.name(), frame, "still rendered");
    canvas.to_rgba_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::palette;

    /// Paints white on even frames and black on odd ones.
    struct Blink {
        frames_seen: u64,
    }

    impl Sketch for Blink {
        fn name(&self) -> &'static str {
            "blink"
        }

        fn draw(&mut self, canvas: &mut Canvas, clock: &FrameClock) -> Result<()> {
            self.frames_seen += 1;
            let color = if clock.frame % 2 == 0 {
                palette::WHITE
            } else {
                palette::BLACK
            };
            canvas.paint(color);
            Ok(())
        }
    }

    #[test]
    fn clock_time_and_progress() {
        let settings = FrameSettings::default();
        assert_eq!(settings.frame_count(), 90);
        let clock = settings.clock(45);
        assert_eq!(clock.time(), 3.0);
        assert_eq!(clock.progress(), 0.5);
    }

    #[test]
    fn zero_rate_clock_stays_at_zero() {
        let clock = FrameSettings::new(8, 8, 0, 6).clock(3);
        assert_eq!(clock.time(), 0.0);
    }

    #[test]
    fn stream_writes_every_frame_in_order() {
        let settings = FrameSettings::new(4, 2, 3, 2);
        let mut sketch = Blink { frames_seen: 0 };
        let mut out = Vec::new();
        let frames = render(&mut sketch, &settings, &mut out).unwrap();
        assert_eq!(frames, 6);
        assert_eq!(sketch.frames_seen, 6);
        assert_eq!(out.len(), 6 * settings.frame_bytes());
        let frame = settings.frame_bytes();
        assert!(out[..frame].iter().all(|&b| b == 255));
        assert_eq!(&out[frame..frame + 4], &0xff000000u32.to_ne_bytes());
    }

    #[test]
    fn still_replays_earlier_frames() {
        let settings = FrameSettings::new(4, 4, 15, 1);
        let mut sketch = Blink { frames_seen: 0 };
        let img = render_still(&mut sketch, &settings, 3).unwrap();
        assert_eq!(sketch.frames_seen, 4);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn zero_sized_render_fails_before_writing() {
        let settings = FrameSettings::new(0, 4, 15, 1);
        let mut out = Vec::new();
        assert!(render(&mut Blink { frames_seen: 0 }, &settings, &mut out).is_err());
        assert!(out.is_empty());
    }
}
