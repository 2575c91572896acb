//! Read-only view of a hierarchical plot container.
//!
//! The core only sees these traits: a container hands out its root group, a
//! group lists its child groups and child objects (separate namespaces) and
//! resolves them by name. Objects come back tagged as drawable or not, so the
//! walker and the filter never inspect concrete types.

pub mod json;

use crate::error::Result;
use std::path::Path;

pub use json::{Canvas, JsonReader, Primitive};

/// Direct children of one group, in the container's native order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub groups: Vec<String>,
    pub objects: Vec<String>,
}

/// A resolved leaf object.
#[derive(Debug, Clone)]
pub enum Node<O> {
    Drawable(O),
    Other { class: String },
}

pub trait Group: Sized {
    type Object;

    /// Container-native path, e.g. `run1.root:/A/B`.
    fn path(&self) -> String;

    /// FullPath of the group inside its container, e.g. `A/B`; empty at the root.
    fn rel_path(&self) -> String;

    fn list(&self) -> Result<Listing>;

    fn group(&self, name: &str) -> Result<Self>;

    fn object(&self, name: &str) -> Result<Node<Self::Object>>;
}

/// What the index needs to know about a drawable object.
pub trait Drawable {
    fn title(&self) -> &str;
}

pub trait Container {
    type Group: Group;

    fn root(&self) -> Self::Group;

    /// Release the container. Dropping it has the same effect.
    fn close(self);
}

pub trait ContainerReader {
    type Container: Container;

    fn open(&self, path: &Path) -> Result<Self::Container>;
}

/// Object type produced by a reader's groups.
pub type ObjectOf<R> =
    <<<R as ContainerReader>::Container as Container>::Group as Group>::Object;
