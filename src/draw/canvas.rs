//! Pixel surface with a cairo-style transform stack.

use super::color::Rgba;
use super::Point;
use crate::error::{Result, SketchError};
use image::RgbaImage;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// A drawing surface plus the current user-space transform.
///
/// After [`Canvas::begin_frame`] user space is normalised device
/// coordinates: `(-1, -1)` is the top-left corner, `(1, 1)` the
/// bottom-right, whatever the pixel size.
pub struct Canvas {
    pixmap: Pixmap,
    transform: Transform,
    stack: Vec<Transform>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(SketchError::Surface { width, height })?;
        let mut canvas = Self {
            pixmap,
            transform: Transform::identity(),
            stack: Vec::new(),
        };
        canvas.begin_frame();
        Ok(canvas)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Drop any saved state and enter normalised device coordinates.
    pub fn begin_frame(&mut self) {
        self.stack.clear();
        let half_w = self.pixmap.width() as f32 / 2.0;
        let half_h = self.pixmap.height() as f32 / 2.0;
        self.transform = Transform::from_translate(half_w, half_h).pre_scale(half_w, half_h);
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn save(&mut self) {
        self.stack.push(self.transform);
    }

    /// Pop the last saved transform. An unmatched restore is ignored.
    pub fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    /// Run `f` between a save and a restore.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Canvas) -> T) -> T {
        self.save();
        let out = f(self);
        self.restore();
        out
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.transform = self.transform.pre_translate(x as f32, y as f32);
    }

    /// Scale user space; a negative factor mirrors that axis.
    pub fn scale(&mut self, x: f64, y: f64) {
        self.transform = self.transform.pre_scale(x as f32, y as f32);
    }

    /// Rotate user space by `theta` radians.
    pub fn rotate(&mut self, theta: f64) {
        self.transform = self.transform.pre_rotate(theta.to_degrees() as f32);
    }

    /// Map a user-space point to pixel coordinates.
    pub fn to_device(&self, p: Point) -> Point {
        let mut pts = [tiny_skia::Point::from_xy(p.x as f32, p.y as f32)];
        self.transform.map_points(&mut pts);
        Point::new(pts[0].x as f64, pts[0].y as f64)
    }

    /// Cover the whole surface with `color`, ignoring the transform.
    pub fn paint(&mut self, color: Rgba) {
        let w = self.pixmap.width() as f32;
        let h = self.pixmap.height() as f32;
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, w, h) {
            self.pixmap
                .fill_rect(rect, &paint_for(color), Transform::identity(), None);
        }
    }

    /// Fill a circle. Non-positive radii draw nothing.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        if !(radius > 0.0) {
            return;
        }
        if let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        {
            self.pixmap.fill_path(
                &path,
                &paint_for(color),
                FillRule::Winding,
                self.transform,
                None,
            );
        }
    }

    /// Fill the rectangle with top-left corner `(x, y)`; negative sizes
    /// extend up or left, as in cairo.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        if let Some(rect) = rect_from(x, y, width, height) {
            self.pixmap
                .fill_rect(rect, &paint_for(color), self.transform, None);
        }
    }

    /// Stroke a rectangle outline; the line width is in user units.
    pub fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
        color: Rgba,
    ) {
        if let Some(rect) = rect_from(x, y, width, height) {
            let path = PathBuilder::from_rect(rect);
            self.pixmap.stroke_path(
                &path,
                &paint_for(color),
                &stroke(line_width),
                self.transform,
                None,
            );
        }
    }

    pub fn stroke_line(&mut self, from: Point, to: Point, line_width: f64, color: Rgba) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &paint_for(color),
                &stroke(line_width),
                self.transform,
                None,
            );
        }
    }

    /// Demultiplied color of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Rgba::from_rgba8(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    /// Write the surface as ARGB32 into `buf`, replacing its contents.
    ///
    /// ARGB32 is a native-endian premultiplied `u32` per pixel, so on
    /// little-endian machines the bytes run B, G, R, A with a stride of
    /// `width * 4`.
    pub fn argb32_into(&self, buf: &mut Vec<u8>) {
        buf.clear();
        buf.reserve(self.pixmap.data().len());
        for px in self.pixmap.data().chunks_exact(4) {
            let argb = u32::from_be_bytes([px[3], px[0], px[1], px[2]]);
            buf.extend_from_slice(&argb.to_ne_bytes());
        }
    }

    pub fn argb32(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.argb32_into(&mut buf);
        buf
    }

    /// Copy the surface into a straight-alpha RGBA image.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let mut raw = Vec::with_capacity(self.pixmap.data().len());
        for p in self.pixmap.pixels() {
            let c = p.demultiply();
            raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        RgbaImage::from_raw(self.width(), self.height(), raw).ok_or(SketchError::Surface {
            width: self.width(),
            height: self.height(),
        })
    }
}

fn paint_for(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

fn stroke(width: f64) -> Stroke {
    Stroke {
        width: width as f32,
        ..Stroke::default()
    }
}

fn rect_from(x: f64, y: f64, width: f64, height: f64) -> Option<Rect> {
    let (left, right) = if width < 0.0 { (x + width, x) } else { (x, x + width) };
    let (top, bottom) = if height < 0.0 { (y + height, y) } else { (y, y + height) };
    Rect::from_ltrb(left as f32, top as f32, right as f32, bottom as f32)
}
