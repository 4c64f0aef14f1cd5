//! SVG backend for [`Scene`].

use super::scene::{Anchor, DrawCommand, Scene};
use std::fmt::Write;

impl Scene {
    /// Serialize the scene to a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let (w, h) = (self.canvas.width, self.canvas.height);
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#
        );
        let _ = writeln!(out, r#"  <rect width="100%" height="100%" fill="{}"/>"#, self.background);

        for cmd in &self.commands {
            match cmd {
                DrawCommand::Rect { rect, style } => {
                    let _ = writeln!(
                        out,
                        r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                        rect.x, rect.y, rect.width, rect.height, style.fill, style.stroke, style.stroke_width
                    );
                }
                DrawCommand::Text { x, y, text, size, color, anchor } => {
                    let _ = writeln!(
                        out,
                        r#"  <text x="{x:.2}" y="{y:.2}" font-size="{size:.1}" fill="{color}" text-anchor="{}" font-family="sans-serif">{}</text>"#,
                        anchor_name(*anchor),
                        escape(text)
                    );
                }
                DrawCommand::ScaleBar { x, y, length_px, label } => {
                    let end = x + length_px;
                    let _ = writeln!(
                        out,
                        r##"  <line x1="{x:.2}" y1="{y:.2}" x2="{end:.2}" y2="{y:.2}" stroke="#111827" stroke-width="2"/>"##
                    );
                    for tick in [*x, end] {
                        let _ = writeln!(
                            out,
                            r##"  <line x1="{tick:.2}" y1="{:.2}" x2="{tick:.2}" y2="{:.2}" stroke="#111827" stroke-width="2"/>"##,
                            y - 4.0,
                            y + 4.0
                        );
                    }
                    let _ = writeln!(
                        out,
                        r##"  <text x="{x:.2}" y="{:.2}" font-size="11.0" fill="#111827" text-anchor="{}" font-family="sans-serif">{}</text>"##,
                        y - 8.0,
                        anchor_name(Anchor::Start),
                        escape(label)
                    );
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }
}

fn anchor_name(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{render, Canvas, ViewTransform};

    #[test]
    fn test_placeholder_svg() {
        let svg = render(None, &ViewTransform::default(), Canvas::default()).to_svg();
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("generate a plan"));
        assert!(svg.contains(r#"width="800""#));
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape("A & <B>"), "A &amp; &lt;B&gt;");
    }
}
