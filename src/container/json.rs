//! JSON container files.
//!
//! JSON shape:
//! {
//!   "keys": [
//!     {
//!       "name": "A",
//!       "class": "directory",
//!       "keys": [
//!         {
//!           "name": "h1",
//!           "class": "canvas",
//!           "title": "pt spectrum",    // optional, defaults to name
//!           "width": 600,             // optional
//!           "height": 450,            // optional
//!           "primitives": [
//!             { "line": { "x1": 0, "y1": 0, "x2": 10, "y2": 10 } },
//!             { "polyline": { "points": [[0, 0], [5, 8]] } },
//!             { "rect": { "x": 1, "y": 1, "w": 4, "h": 2 } },
//!             { "text": { "x": 20, "y": 430, "body": "pt", "size": 12 } }
//!           ]
//!         },
//!         { "name": "t1", "class": "tree" }
//!       ]
//!     }
//!   ]
//! }
//!
//! Key order is whatever the file says; sorting is the walker's business.
//! Sibling uniqueness and the name rules of `naming::is_mirrorable_name` are
//! checked when a group is listed, so a broken subtree fails only once the walk
//! reaches it.

use crate::container::{Container, ContainerReader, Drawable, Group, Listing, Node};
use crate::error::{Error, Result};
use crate::naming::{self, SEP};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

const DIRECTORY_CLASS: &str = "directory";
const CANVAS_CLASS: &str = "canvas";

const DEFAULT_WIDTH: u32 = 600;
const DEFAULT_HEIGHT: u32 = 450;

#[derive(Debug, Clone, Deserialize)]
struct RawFile {
    #[serde(default)]
    keys: Vec<RawKey>,
}

/// Raw key shape as it appears in the file.
#[derive(Debug, Clone, Deserialize)]
struct RawKey {
    name: String,

    class: String,

    #[serde(default)]
    keys: Vec<RawKey>,

    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    width: Option<u32>,

    #[serde(default)]
    height: Option<u32>,

    #[serde(default)]
    primitives: Vec<Primitive>,
}

/// Drawing primitives, in canvas coordinates (origin bottom left).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polyline { points: Vec<[f64; 2]> },
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Text {
        x: f64,
        y: f64,
        body: String,
        #[serde(default = "default_font_size")]
        size: f64,
    },
}

fn default_font_size() -> f64 {
    12.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub name: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub primitives: Vec<Primitive>,
}

impl Drawable for Arc<Canvas> {
    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug)]
enum Entry {
    Canvas(Arc<Canvas>),
    Other { class: String },
}

/// A directory with its keys split by namespace, still in file order.
#[derive(Debug, Default)]
struct Dir {
    groups: Vec<(String, Arc<Dir>)>,
    objects: Vec<(String, Entry)>,
}

impl Dir {
    fn build(keys: Vec<RawKey>) -> Dir {
        let mut dir = Dir::default();
        for key in keys {
            if key.class == DIRECTORY_CLASS {
                dir.groups.push((key.name, Arc::new(Dir::build(key.keys))));
            } else if key.class == CANVAS_CLASS {
                let canvas = Canvas {
                    title: key.title.unwrap_or_else(|| key.name.clone()),
                    name: key.name.clone(),
                    width: key.width.unwrap_or(DEFAULT_WIDTH),
                    height: key.height.unwrap_or(DEFAULT_HEIGHT),
                    primitives: key.primitives,
                };
                dir.objects.push((key.name, Entry::Canvas(Arc::new(canvas))));
            } else {
                dir.objects.push((key.name, Entry::Other { class: key.class }));
            }
        }
        dir
    }
}

/// Opens JSON container files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl ContainerReader for JsonReader {
    type Container = JsonContainer;

    fn open(&self, path: &Path) -> Result<JsonContainer> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let file = path.display().to_string();
        JsonContainer::parse(&file, &text)
    }
}

#[derive(Debug)]
pub struct JsonContainer {
    file: Arc<str>,
    root: Arc<Dir>,
}

impl JsonContainer {
    /// Parse a container from text; `file` names it in native paths and errors.
    pub fn parse(file: &str, text: &str) -> Result<JsonContainer> {
        let raw: RawFile =
            serde_json::from_str(text).map_err(|e| Error::container(file, e.to_string()))?;
        Ok(JsonContainer {
            file: Arc::from(file),
            root: Arc::new(Dir::build(raw.keys)),
        })
    }
}

impl Container for JsonContainer {
    type Group = JsonGroup;

    fn root(&self) -> JsonGroup {
        JsonGroup {
            file: Arc::clone(&self.file),
            rel: String::new(),
            dir: Arc::clone(&self.root),
        }
    }

    fn close(self) {
        tracing::trace!(file = %self.file, "closing container");
    }
}

#[derive(Debug, Clone)]
pub struct JsonGroup {
    file: Arc<str>,
    rel: String,
    dir: Arc<Dir>,
}

impl JsonGroup {
    fn not_found(&self, what: &str, name: &str) -> Error {
        Error::container(
            self.path(),
            format!("no {} named {:?} in this directory", what, name),
        )
    }
}

impl Group for JsonGroup {
    type Object = Arc<Canvas>;

    fn path(&self) -> String {
        format!("{}:/{}", self.file, self.rel)
    }

    fn rel_path(&self) -> String {
        self.rel.clone()
    }

    fn list(&self) -> Result<Listing> {
        let groups = unique_names(self, "directory", self.dir.groups.iter().map(|(n, _)| n))?;
        let objects = unique_names(self, "object", self.dir.objects.iter().map(|(n, _)| n))?;
        Ok(Listing { groups, objects })
    }

    fn group(&self, name: &str) -> Result<JsonGroup> {
        let (_, dir) = self
            .dir
            .groups
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| self.not_found("directory", name))?;
        let rel = if self.rel.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", self.rel, SEP, name)
        };
        Ok(JsonGroup {
            file: Arc::clone(&self.file),
            rel,
            dir: Arc::clone(dir),
        })
    }

    fn object(&self, name: &str) -> Result<Node<Arc<Canvas>>> {
        let (_, entry) = self
            .dir
            .objects
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| self.not_found("object", name))?;
        Ok(match entry {
            Entry::Canvas(canvas) => Node::Drawable(Arc::clone(canvas)),
            Entry::Other { class } => Node::Other {
                class: class.clone(),
            },
        })
    }
}

fn unique_names<'a>(
    group: &JsonGroup,
    what: &str,
    names: impl Iterator<Item = &'a String>,
) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for name in names {
        if !naming::is_mirrorable_name(name) {
            return Err(Error::container(
                group.path(),
                format!("unsupported {} name {:?}", what, name),
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(Error::container(
                group.path(),
                format!("duplicate {} name {:?}", what, name),
            ));
        }
        out.push(name.clone());
    }
    Ok(out)
}
