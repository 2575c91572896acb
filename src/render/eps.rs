//! Encapsulated PostScript output for canvases.

use crate::container::{Canvas, Primitive};
use crate::error::{Error, Result};
use crate::render::Renderer;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct EpsRenderer {
    pub font: String,
    pub line_width: f64,
}

impl Default for EpsRenderer {
    fn default() -> Self {
        Self {
            font: "Helvetica".to_string(),
            line_width: 1.0,
        }
    }
}

impl EpsRenderer {
    /// Build the EPS document for a canvas.
    pub fn document(&self, canvas: &Canvas) -> Result<String> {
        for (i, prim) in canvas.primitives.iter().enumerate() {
            check_finite(prim).map_err(|what| {
                Error::render(
                    &canvas.name,
                    format!("primitive #{} has a non-finite {}", i, what),
                )
            })?;
        }

        let mut out = String::new();
        self.write_document(&mut out, canvas)
            .map_err(|_| Error::render(&canvas.name, "formatting the document failed"))?;
        Ok(out)
    }

    fn write_document(&self, out: &mut impl fmt::Write, canvas: &Canvas) -> fmt::Result {
        writeln!(out, "%!PS-Adobe-3.0 EPSF-3.0")?;
        writeln!(out, "%%BoundingBox: 0 0 {} {}", canvas.width, canvas.height)?;
        writeln!(out, "%%Title: {}", dsc_text(&canvas.title))?;
        writeln!(out, "%%Creator: plotdex")?;
        writeln!(out, "%%Pages: 1")?;
        writeln!(out, "%%EndComments")?;
        writeln!(out, "gsave")?;
        writeln!(out, "{} setlinewidth", num(self.line_width))?;

        for prim in &canvas.primitives {
            self.write_primitive(out, prim)?;
        }

        writeln!(out, "grestore")?;
        writeln!(out, "showpage")?;
        writeln!(out, "%%EOF")
    }

    fn write_primitive(&self, out: &mut impl fmt::Write, prim: &Primitive) -> fmt::Result {
        match prim {
            Primitive::Line { x1, y1, x2, y2 } => writeln!(
                out,
                "newpath {} {} moveto {} {} lineto stroke",
                num(*x1),
                num(*y1),
                num(*x2),
                num(*y2)
            ),
            Primitive::Polyline { points } => {
                let Some((first, rest)) = points.split_first() else {
                    return Ok(());
                };
                if rest.is_empty() {
                    return Ok(());
                }
                write!(out, "newpath {} {} moveto", num(first[0]), num(first[1]))?;
                for p in rest {
                    write!(out, " {} {} lineto", num(p[0]), num(p[1]))?;
                }
                writeln!(out, " stroke")
            }
            Primitive::Rect { x, y, w, h } => writeln!(
                out,
                "newpath {} {} {} {} rectstroke",
                num(*x),
                num(*y),
                num(*w),
                num(*h)
            ),
            Primitive::Text { x, y, body, size } => writeln!(
                out,
                "/{} findfont {} scalefont setfont {} {} moveto ({}) show",
                self.font,
                num(*size),
                num(*x),
                num(*y),
                ps_string(body)
            ),
        }
    }
}

impl Renderer<Arc<Canvas>> for EpsRenderer {
    fn save_vector(&self, object: &Arc<Canvas>, path: &Path) -> Result<()> {
        let doc = self.document(object)?;
        std::fs::write(path, doc).map_err(|e| Error::io(path, e))
    }
}

fn check_finite(prim: &Primitive) -> std::result::Result<(), &'static str> {
    let finite = |v: &[f64]| v.iter().all(|x| x.is_finite());
    let ok = match prim {
        Primitive::Line { x1, y1, x2, y2 } => finite(&[*x1, *y1, *x2, *y2]),
        Primitive::Polyline { points } => points.iter().all(|p| finite(p)),
        Primitive::Rect { x, y, w, h } => finite(&[*x, *y, *w, *h]),
        Primitive::Text { x, y, size, .. } => finite(&[*x, *y, *size]),
    };
    if ok { Ok(()) } else { Err("coordinate") }
}

fn num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.4}", v)
    }
}

/// Escape text for a PostScript `( ... )` string literal.
fn ps_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// DSC comment values must stay on one line.
fn dsc_text(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn canvas(primitives: Vec<Primitive>) -> Canvas {
        Canvas {
            name: "h1".into(),
            title: "pt (GeV)".into(),
            width: 600,
            height: 450,
            primitives,
        }
    }

    #[test]
    fn document_has_header_body_and_trailer() {
        let doc = EpsRenderer::default()
            .document(&canvas(vec![
                Primitive::Line { x1: 0.0, y1: 0.0, x2: 10.0, y2: 20.5 },
                Primitive::Polyline {
                    points: vec![[0.0, 0.0], [1.0, 2.0], [3.0, 1.0]],
                },
                Primitive::Rect { x: 1.0, y: 1.0, w: 4.0, h: 2.0 },
                Primitive::Text {
                    x: 20.0,
                    y: 430.0,
                    body: "pt (GeV)".into(),
                    size: 12.0,
                },
            ]))
            .unwrap();

        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines[0], "%!PS-Adobe-3.0 EPSF-3.0");
        assert_eq!(lines[1], "%%BoundingBox: 0 0 600 450");
        assert_eq!(lines[2], "%%Title: pt (GeV)");
        assert!(lines.contains(&"newpath 0 0 moveto 10 20.5000 lineto stroke"));
        assert!(lines.contains(&"newpath 0 0 moveto 1 2 lineto 3 1 lineto stroke"));
        assert!(lines.contains(&"newpath 1 1 4 2 rectstroke"));
        assert!(lines.contains(&"/Helvetica findfont 12 scalefont setfont 20 430 moveto (pt \\(GeV\\)) show"));
        assert_eq!(&lines[lines.len() - 2..], &["showpage", "%%EOF"]);
    }

    #[test]
    fn degenerate_polyline_is_skipped() {
        let doc = EpsRenderer::default()
            .document(&canvas(vec![Primitive::Polyline {
                points: vec![[1.0, 1.0]],
            }]))
            .unwrap();
        assert!(!doc.contains("moveto"));
    }

    #[test]
    fn non_finite_coordinates_fail() {
        let err = EpsRenderer::default()
            .document(&canvas(vec![Primitive::Rect {
                x: f64::NAN,
                y: 0.0,
                w: 1.0,
                h: 1.0,
            }]))
            .unwrap_err();
        assert!(matches!(err, Error::Render { .. }));
    }

    #[test]
    fn sink_errors_are_propagated() {
        struct Full(usize);

        impl fmt::Write for Full {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.0 = self.0.checked_sub(s.len()).ok_or(fmt::Error)?;
                Ok(())
            }
        }

        let canvas = canvas(vec![Primitive::Line { x1: 0.0, y1: 0.0, x2: 1.0, y2: 1.0 }]);
        let renderer = EpsRenderer::default();
        let full_len = renderer.document(&canvas).unwrap().len();

        assert!(renderer.write_document(&mut Full(full_len), &canvas).is_ok());
        assert!(renderer.write_document(&mut Full(full_len - 1), &canvas).is_err());
        assert!(renderer.write_document(&mut Full(40), &canvas).is_err());
    }

    #[test]
    fn saves_to_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("h1.eps");
        EpsRenderer::default()
            .save_vector(&Arc::new(canvas(vec![])), &path)
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("%!PS-Adobe-3.0 EPSF-3.0\n"));
    }

    #[test]
    fn escapes_postscript_strings() {
        assert_eq!(ps_string(r"a\b(c)"), r"a\\b\(c\)");
        assert_eq!(ps_string("x\ny"), "x\\ny");
    }
}
