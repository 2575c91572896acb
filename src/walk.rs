//! Top-down traversal of a container's groups.
//!
//! `walk(root)` yields one `Visit` per group, parent before children, with
//! child group and object names sorted. Siblings are visited in sorted order
//! too, so the output (and the progress log) never depends on the container's
//! native key order. Traversal uses an explicit stack; depth is bounded only by
//! the container.

use crate::container::{Group, Listing};
use crate::error::Result;
use std::iter::FusedIterator;

/// One visited group.
#[derive(Debug)]
pub struct Visit<G> {
    /// Container-native path of the group.
    pub path: String,
    /// FullPath of the group; empty at the root.
    pub rel_path: String,
    pub groups: Vec<String>,
    pub objects: Vec<String>,
    pub group: G,
}

/// Lazy traversal. A listing failure is yielded once, then the walk ends.
pub struct Walk<G> {
    stack: Vec<G>,
    failed: bool,
}

pub fn walk<G: Group>(root: G) -> Walk<G> {
    Walk {
        stack: vec![root],
        failed: false,
    }
}

impl<G: Group> Walk<G> {
    fn visit(&mut self, group: G) -> Result<Visit<G>> {
        let Listing {
            mut groups,
            mut objects,
        } = group.list()?;
        groups.sort();
        objects.sort();

        // Push in reverse so the smallest name is popped first.
        for name in groups.iter().rev() {
            self.stack.push(group.group(name)?);
        }

        Ok(Visit {
            path: group.path(),
            rel_path: group.rel_path(),
            groups,
            objects,
            group,
        })
    }
}

impl<G: Group> Iterator for Walk<G> {
    type Item = Result<Visit<G>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let group = self.stack.pop()?;
        match self.visit(group) {
            Ok(visit) => Some(Ok(visit)),
            Err(e) => {
                self.failed = true;
                self.stack.clear();
                Some(Err(e))
            }
        }
    }
}

impl<G: Group> FusedIterator for Walk<G> {}
