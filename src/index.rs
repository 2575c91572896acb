//! One pass over one container file: walk, filter, render, index.

use crate::Result;
use crate::container::{Container, ContainerReader, Drawable, Group, Node, ObjectOf};
use crate::filter::PathFilter;
use crate::naming;
use crate::output;
use crate::render::{
    Dispatcher, IndexData, IndexGroup, IndexPlot, RASTER_EXT, Renderer, VECTOR_EXT,
    render_index_html,
};
use crate::walk::walk;

use anyhow::{Context, anyhow, bail};
use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "index.html";

/// Output state for one input container.
///
/// The output root is the input path minus its `.root` suffix; every rendered
/// object lands below it at its FullPath, and `index.html` sits at its top.
#[derive(Debug)]
pub struct FileIndex {
    input: PathBuf,
    output_root: PathBuf,
    index_path: PathBuf,
    groups: Vec<IndexGroup>,
    plots: usize,
    failed: usize,
}

impl FileIndex {
    /// Derive the output root from `input` and create it.
    pub fn new(input: &Path) -> Result<FileIndex> {
        let input_str = input.to_string_lossy();
        let root = naming::strip_input_suffix(&input_str)?;
        let output_root = PathBuf::from(root);
        let index_path = output_root.join(INDEX_FILE);
        output::ensure_parent_dir(&index_path)?;

        Ok(FileIndex {
            input: input.to_path_buf(),
            output_root,
            index_path,
            groups: Vec::new(),
            plots: 0,
            failed: 0,
        })
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn plots(&self) -> usize {
        self.plots
    }

    /// Objects that matched but failed to render and were skipped.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Render every matching drawable object of the container; returns how
    /// many were written by this call.
    ///
    /// Listing or lookup failures abort the file; output already written
    /// stays. A render failure is logged with the object's FullPath and the
    /// object is skipped.
    pub fn write_container<R, D>(
        &mut self,
        reader: &R,
        dispatcher: &Dispatcher<'_, D>,
        filter: &PathFilter,
    ) -> Result<usize>
    where
        R: ContainerReader,
        D: Renderer<ObjectOf<R>>,
        ObjectOf<R>: Drawable,
    {
        let container = reader
            .open(&self.input)
            .with_context(|| format!("open container {}", self.input.display()))?;

        let before = self.plots;
        let result = self.write_groups(container.root(), dispatcher, filter);
        container.close();
        result.with_context(|| format!("walk container {}", self.input.display()))?;

        Ok(self.plots - before)
    }

    fn write_groups<G, D>(
        &mut self,
        root: G,
        dispatcher: &Dispatcher<'_, D>,
        filter: &PathFilter,
    ) -> Result<()>
    where
        G: Group,
        G::Object: Drawable,
        D: Renderer<G::Object>,
    {
        for visit in walk(root) {
            let visit = visit?;
            let group_path = visit.rel_path.clone();
            tracing::debug!(
                group = %visit.path,
                groups = visit.groups.len(),
                objects = visit.objects.len(),
                "indexing group"
            );
            let mut plots = Vec::new();

            for name in &visit.objects {
                let object = match visit.group.object(name)? {
                    Node::Drawable(object) => object,
                    Node::Other { class } => {
                        tracing::trace!(path = %visit.path, %name, %class, "skipping non-drawable");
                        continue;
                    }
                };

                let full_path = naming::full_path(&group_path, name);
                if !filter.matches(&full_path) {
                    continue;
                }

                println!("{}", native_object_path(&visit.path, name));

                let written = match clashing_group(&visit.groups, name) {
                    Some(group) => Err(anyhow!(
                        "artifact of {:?} collides with sibling group {:?}",
                        name,
                        group
                    )),
                    None => self.write_object(&object, &full_path, &group_path, name, dispatcher),
                };
                match written {
                    Ok(plot) => {
                        self.plots += 1;
                        plots.push(plot);
                    }
                    Err(e) => {
                        let error = format!("{:#}", e);
                        tracing::error!(%full_path, %error, "render failed, skipping");
                        self.failed += 1;
                    }
                }
            }

            if !plots.is_empty() {
                self.groups.push(IndexGroup {
                    depth: depth(&group_path),
                    path: group_path,
                    plots,
                });
            }
        }
        Ok(())
    }

    fn write_object<O, D>(
        &self,
        object: &O,
        full_path: &str,
        group_path: &str,
        name: &str,
        dispatcher: &Dispatcher<'_, D>,
    ) -> Result<IndexPlot>
    where
        O: Drawable,
        D: Renderer<O>,
    {
        let base = naming::join_output_path(&self.output_root, group_path, name);
        if !naming::is_under_root(&base, &self.output_root) {
            bail!(
                "output path {} escapes {}",
                base.display(),
                self.output_root.display()
            );
        }

        let artifacts = dispatcher.render(object, full_path, &base)?;
        let href = self.link(&artifacts.vector)?;
        let raster = artifacts
            .raster
            .as_deref()
            .map(|p| self.link(p))
            .transpose()?;

        Ok(IndexPlot {
            name: name.to_string(),
            full_path: full_path.to_string(),
            title: object.title().to_string(),
            href,
            raster,
        })
    }

    /// `/`-separated link to `target` from the index page.
    fn link(&self, target: &Path) -> Result<String> {
        let rel = naming::relpath(target, &self.output_root)
            .with_context(|| format!("relative path of {}", target.display()))?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(parts.join("/"))
    }

    /// Write `index.html` for everything rendered so far.
    /// Write `index.html`. The highslide gallery only opens raster images, so
    /// its assets are linked only when at least one plot has one.
    pub fn write_index(&self, highslide: &str) -> Result<()> {
        let has_raster = self
            .groups
            .iter()
            .flat_map(|g| &g.plots)
            .any(|p| p.raster.is_some());
        if !has_raster && !highslide.is_empty() {
            tracing::debug!(%highslide, "no raster plots, gallery not linked");
        }
        let data = IndexData {
            source: self.input.display().to_string(),
            highslide: if has_raster { highslide.to_string() } else { String::new() },
            total_plots: self.plots,
            groups: self.groups.clone(),
        };
        let html = render_index_html(&data)?;
        std::fs::write(&self.index_path, html)
            .with_context(|| format!("write {}", self.index_path.display()))?;
        tracing::debug!(path = %self.index_path.display(), plots = self.plots, "wrote index");
        Ok(())
    }
}

/// Container-native object path, as shown in progress output.
fn native_object_path(group: &str, name: &str) -> String {
    if group.ends_with(naming::SEP) {
        format!("{}{}", group, name)
    } else {
        format!("{}{}{}", group, naming::SEP, name)
    }
}

/// Sibling group whose directory would occupy one of `object`'s artifact paths.
///
/// `groups` must be sorted, as the walker reports them.
fn clashing_group<'a>(groups: &'a [String], object: &str) -> Option<&'a str> {
    [VECTOR_EXT, RASTER_EXT].iter().find_map(|ext| {
        let file = format!("{}.{}", object, ext);
        groups
            .binary_search(&file)
            .ok()
            .map(|i| groups[i].as_str())
    })
}

fn depth(group_path: &str) -> usize {
    group_path.split(naming::SEP).filter(|s| !s.is_empty()).count()
}
