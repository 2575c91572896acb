//! Artifact rendering: per-object images and the per-file index page.

pub mod eps;
pub mod html;

pub use eps::EpsRenderer;
pub use html::{render_index_html, IndexData, IndexGroup, IndexPlot};

use crate::error::{Error, Result};
use crate::naming;
use crate::output;
use std::path::{Path, PathBuf};

pub const VECTOR_EXT: &str = "eps";
pub const RASTER_EXT: &str = "png";

/// Writes image files for one kind of object.
pub trait Renderer<O> {
    fn save_vector(&self, object: &O, path: &Path) -> Result<()>;

    fn save_raster(&self, _object: &O, path: &Path) -> Result<()> {
        Err(Error::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "raster output is not supported by this renderer",
            ),
        ))
    }
}

/// Files produced for one object. `raster` is set only when it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub vector: PathBuf,
    pub raster: Option<PathBuf>,
}

/// Vector and raster paths for an output base path.
pub fn artifact_paths(base: &Path) -> (PathBuf, PathBuf) {
    (
        naming::with_suffix(base, VECTOR_EXT),
        naming::with_suffix(base, RASTER_EXT),
    )
}

/// Materializes output directories and drives a renderer, one object at a time.
#[derive(Debug)]
pub struct Dispatcher<'r, R> {
    renderer: &'r R,
    raster: bool,
}

impl<'r, R> Dispatcher<'r, R> {
    /// `raster` also requests the `.png` sibling; only `.eps` is written otherwise.
    pub fn new(renderer: &'r R, raster: bool) -> Self {
        Self { renderer, raster }
    }

    pub fn render<O>(&self, object: &O, full_path: &str, base: &Path) -> Result<Artifacts>
    where
        R: Renderer<O>,
    {
        let (vector, raster) = artifact_paths(base);
        let wrap = |e: Error| Error::render(full_path, e.to_string());

        output::ensure_parent_dir(base).map_err(wrap)?;
        self.renderer.save_vector(object, &vector).map_err(wrap)?;

        let raster = if self.raster {
            self.renderer.save_raster(object, &raster).map_err(wrap)?;
            Some(raster)
        } else {
            None
        };

        Ok(Artifacts { vector, raster })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records calls and writes a marker file.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, PathBuf)>>,
    }

    impl Renderer<&str> for Recorder {
        fn save_vector(&self, object: &&str, path: &Path) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((format!("vector {}", object), path.to_path_buf()));
            std::fs::write(path, object).map_err(|e| Error::io(path, e))
        }
    }

    #[test]
    fn writes_vector_under_materialized_dir() {
        let tmp = TempDir::new().unwrap();
        let rec = Recorder::default();
        let base = tmp.path().join("run1/A/h1");

        let out = Dispatcher::new(&rec, false).render(&"h1", "A/h1", &base).unwrap();

        assert_eq!(
            out,
            Artifacts {
                vector: tmp.path().join("run1/A/h1.eps"),
                raster: None,
            }
        );
        assert_eq!(std::fs::read_to_string(&out.vector).unwrap(), "h1");
        assert_eq!(rec.calls.borrow().len(), 1);
        assert!(!tmp.path().join("run1/A/h1.png").exists());
    }

    #[test]
    fn raster_request_surfaces_unsupported_renderer() {
        let tmp = TempDir::new().unwrap();
        let rec = Recorder::default();
        let base = tmp.path().join("run1/h1");

        let err = Dispatcher::new(&rec, true)
            .render(&"h1", "h1", &base)
            .unwrap_err();

        match err {
            Error::Render { full_path, message } => {
                assert_eq!(full_path, "h1");
                assert!(message.contains("not supported"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn artifact_paths_share_the_base() {
        let (v, r) = artifact_paths(Path::new("out/A/h1"));
        assert_eq!(v, PathBuf::from("out/A/h1.eps"));
        assert_eq!(r, PathBuf::from("out/A/h1.png"));
    }
}
