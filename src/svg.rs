//! A small SVG document builder.
//!
//! Elements are appended as strings and wrapped into a document by
//! [`SvgBuilder::finish`]. Coordinates are written with four decimals,
//! enough for a 2048 px poster drawn in unit coordinates.

use crate::draw::Rgba;
use std::fmt;

/// Fill and stroke of one element. `None` paints nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
    pub stroke_width: f64,
}

impl Style {
    pub fn fill(color: Rgba) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn stroke(color: Rgba, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        }
    }

    fn attributes(&self) -> String {
        let paint = |c: Option<Rgba>| c.map_or_else(|| "none".to_string(), |c| c.to_string());
        let mut attrs = format!(
            r#"fill="{}" stroke="{}""#,
            paint(self.fill),
            paint(self.stroke)
        );
        if self.stroke.is_some() {
            attrs.push_str(&format!(r#" stroke-width="{}""#, num(self.stroke_width)));
        }
        attrs
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SvgTransform {
    Translate(f64, f64),
    Scale(f64, f64),
    /// Degrees, as SVG expects.
    Rotate(f64),
}

impl fmt::Display for SvgTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgTransform::Translate(x, y) => write!(f, "translate({}, {})", num(*x), num(*y)),
            SvgTransform::Scale(x, y) => write!(f, "scale({}, {})", num(*x), num(*y)),
            SvgTransform::Rotate(deg) => write!(f, "rotate({})", num(*deg)),
        }
    }
}

/// Format with at most four decimals and no trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{v:.4}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub struct SvgBuilder {
    width: u32,
    height: u32,
    elements: Vec<String>,
    open_groups: usize,
}

impl SvgBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
            open_groups: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: &Style) {
        self.elements.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
            num(x),
            num(y),
            num(width),
            num(height),
            style.attributes()
        ));
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, style: &Style) {
        self.elements.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
            num(cx),
            num(cy),
            num(r),
            style.attributes()
        ));
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &Style) {
        self.elements.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            style.attributes()
        ));
    }

    /// Open a `<g>` whose transforms apply left to right, outermost first.
    pub fn begin_group(&mut self, transforms: &[SvgTransform]) {
        let transform: Vec<String> = transforms.iter().map(|t| t.to_string()).collect();
        self.elements
            .push(format!(r#"<g transform="{}">"#, transform.join(" ")));
        self.open_groups += 1;
    }

    /// Close the innermost group. Extra calls are ignored.
    pub fn end_group(&mut self) {
        if self.open_groups > 0 {
            self.elements.push("</g>".to_string());
            self.open_groups -= 1;
        }
    }

    /// The finished document. Groups left open are closed.
    pub fn finish(mut self) -> String {
        while self.open_groups > 0 {
            self.end_group();
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">
{}
</svg>
"#,
            self.elements.join("\n"),
            w = self.width,
            h = self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::palette;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.125), "0.125");
        assert_eq!(num(1.0 / 3.0), "0.3333");
        assert_eq!(num(-0.00001), "0");
        assert_eq!(num(-2.5), "-2.5");
    }

    #[test]
    fn styles_render_none_for_missing_paint() {
        let filled = Style::fill(palette::SLATE).attributes();
        assert_eq!(filled, r##"fill="#31393c" stroke="none""##);
        let ring = Style::stroke(palette::SLATE, 0.01).attributes();
        assert_eq!(ring, r##"fill="none" stroke="#31393c" stroke-width="0.01""##);
    }

    #[test]
    fn document_wraps_elements_and_closes_groups() {
        let mut svg = SvgBuilder::new(64, 32);
        svg.begin_group(&[SvgTransform::Translate(32.0, 16.0), SvgTransform::Scale(2.0, 2.0)]);
        svg.circle(0.0, 0.5, 0.25, &Style::fill(palette::TEAL));
        let doc = svg.finish();
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains(r#"width="64" height="32""#));
        assert!(doc.contains(r#"<g transform="translate(32, 16) scale(2, 2)">"#));
        assert!(doc.contains(r##"<circle cx="0" cy="0.5" r="0.25" fill="#2b879e" stroke="none"/>"##));
        assert_eq!(doc.matches("<g ").count(), doc.matches("</g>").count());
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn unmatched_end_group_is_ignored() {
        let mut svg = SvgBuilder::new(8, 8);
        svg.end_group();
        assert!(svg.is_empty());
        svg.rect(0.0, 0.0, 8.0, 8.0, &Style::fill(palette::BLUSH));
        assert_eq!(svg.len(), 1);
    }
}
