use sketchbook::draw::{palette, Canvas, Point};
use sketchbook::nn::{self, ModelKind, Params, Shape, Tensor};
use sketchbook::sketches::{Sketch, SketchContext, SketchKind};
use sketchbook::stream::{render, render_still, FrameClock, FrameSettings};
use sketchbook::{SketchError, SketchbookConfig};

/// One red pixel in the top-left corner on a blue field.
struct Corner;

impl Sketch for Corner {
    fn name(&self) -> &'static str {
        "corner"
    }

    fn draw(&mut self, canvas: &mut Canvas, _clock: &FrameClock) -> sketchbook::Result<()> {
        canvas.paint(sketchbook::draw::Rgba::rgb(0.0, 0.0, 1.0));
        // NDC (-1, -1) is the top-left corner; one pixel of a 4x4 surface is 0.5 wide
        canvas.fill_rect(-1.0, -1.0, 0.5, 0.5, sketchbook::draw::Rgba::rgb(1.0, 0.0, 0.0));
        Ok(())
    }
}

#[test]
fn stream_length_is_frames_times_frame_bytes() {
    let settings = FrameSettings::new(8, 6, 5, 2);
    let mut out = Vec::new();
    let frames = render(&mut Corner, &settings, &mut out).unwrap();
    assert_eq!(frames, 10);
    assert_eq!(out.len(), 10 * 8 * 6 * 4);
}

#[test]
fn pixels_are_native_endian_argb() {
    let settings = FrameSettings::new(4, 4, 1, 1);
    let mut out = Vec::new();
    render(&mut Corner, &settings, &mut out).unwrap();

    let first = u32::from_ne_bytes([out[0], out[1], out[2], out[3]]);
    let second = u32::from_ne_bytes([out[4], out[5], out[6], out[7]]);
    assert_eq!(first, 0xffff0000);
    assert_eq!(second, 0xff0000ff);
    if cfg!(target_endian = "little") {
        assert_eq!(&out[0..4], &[0, 0, 255, 255]);
    }
}

/// Accepts `room` bytes, then behaves like a reader that went away.
struct ClosedAfter {
    room: usize,
}

impl std::io::Write for ClosedAfter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.room == 0 {
            return Err(std::io::ErrorKind::BrokenPipe.into());
        }
        let n = buf.len().min(self.room);
        self.room -= n;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn closed_sink_surfaces_as_io_error() {
    let settings = FrameSettings::new(4, 4, 2, 1);
    let mut sink = ClosedAfter {
        room: settings.frame_bytes() + 10,
    };
    let err = render(&mut Corner, &settings, &mut sink).unwrap_err();
    match err {
        SketchError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
        other => panic!("expected an io error, got {other:?}"),
    }
}

#[test]
fn every_raster_sketch_streams_its_defaults_scaled_down() {
    let ctx = SketchContext::new(21);
    for kind in SketchKind::all() {
        if kind == SketchKind::Quadrants {
            continue;
        }
        let mut sketch = kind.build(&ctx).unwrap();
        let settings = FrameSettings::new(24, 24, 2, 1);
        let mut out = Vec::new();
        render(sketch.as_mut(), &settings, &mut out).unwrap();
        assert_eq!(out.len(), 2 * settings.frame_bytes(), "{}", kind.name());
    }
}

#[test]
fn stills_match_the_streamed_frame() {
    let ctx = SketchContext::new(4);
    let settings = FrameSettings::new(16, 16, 4, 1);

    let mut streamed = Vec::new();
    let mut sketch = SketchKind::Pendulum.build(&ctx).unwrap();
    render(sketch.as_mut(), &settings, &mut streamed).unwrap();

    let mut sketch = SketchKind::Pendulum.build(&ctx).unwrap();
    let still = render_still(sketch.as_mut(), &settings, 2).unwrap();

    let frame = &streamed[2 * settings.frame_bytes()..3 * settings.frame_bytes()];
    let px = u32::from_ne_bytes([frame[0], frame[1], frame[2], frame[3]]);
    let [r, g, b, a] = still.get_pixel(0, 0).0;
    assert_eq!(a, 255);
    assert_eq!(px, u32::from_be_bytes([a, r, g, b]));
}

#[test]
fn init_and_eval_agree_on_parameter_count() {
    for kind in [ModelKind::Dense, ModelKind::ResNet, ModelKind::Transformer] {
        let model = kind.build(2);
        let source = Shape::new(1, 5);
        let count = nn::param_count(model.as_ref(), source).unwrap();
        let params = nn::init(model.as_ref(), source, &mut sketchbook::seed::rng(0, "it")).unwrap();
        assert_eq!(params.len(), count);

        let out = nn::eval(model.as_ref(), &params, Tensor::zeros(source)).unwrap();
        assert_eq!(out.shape(), source);

        let short = Params::new(params.model.clone(), source, params.as_slice()[..count - 1].to_vec());
        let err = nn::eval(model.as_ref(), &short, Tensor::zeros(source)).unwrap_err();
        assert!(matches!(err, SketchError::ParamsExhausted { .. }));
    }
}

#[test]
fn canvas_corners_map_to_ndc_corners() {
    let mut canvas = Canvas::new(10, 20).unwrap();
    canvas.begin_frame();
    assert_eq!(canvas.to_device(Point::new(-1.0, -1.0)), Point::new(0.0, 0.0));
    assert_eq!(canvas.to_device(Point::new(1.0, 1.0)), Point::new(10.0, 20.0));
    canvas.paint(palette::WHITE);
    assert_eq!(canvas.pixel(9, 19), Some(palette::WHITE));
}

#[test]
fn config_defaults_without_files() {
    let config = SketchbookConfig::load(std::path::Path::new("no-such-sketchbook.toml")).unwrap();
    let settings = config.output.apply(SketchKind::Quadrants.defaults());
    assert_eq!(settings, FrameSettings::new(1024, 1024, 15, 6));
}
