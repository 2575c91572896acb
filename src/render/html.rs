use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndexPlot {
    pub name: String,
    pub full_path: String,
    pub title: String,
    /// Link to the vector artifact, relative to the index page.
    pub href: String,
    /// Link to the raster artifact when one was written.
    pub raster: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndexGroup {
    /// Group FullPath; empty for the container root.
    pub path: String,
    pub depth: usize,
    pub plots: Vec<IndexPlot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexData {
    pub source: String,
    pub highslide: String,
    pub total_plots: usize,
    pub groups: Vec<IndexGroup>,
}

/// Render a self-contained index page (data embedded as JSON).
///
/// Important: we avoid `format!()` because the HTML contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_index_html(data: &IndexData) -> anyhow::Result<String> {
    // Embedded as a JS object literal; `</` must not close the script element.
    let json = serde_json::to_string(data)?.replace("</", "<\\/");

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>plotdex</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  main { padding: 12px 16px; }
  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .group { margin: 12px 0 4px 0; font-weight: 600; }
  .plots { display: flex; flex-wrap: wrap; gap: 8px; margin-bottom: 8px; }
  .plot { padding: 6px 10px; border: 1px solid #eee; border-radius: 6px; }
  .plot:hover { background: #f3f3f3; }
  .muted { color: #777; font-size: 12px; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 13px; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>

<main id="groups"></main>

<script>
// Embedded index data (JSON object literal)
const DATA = __DATA__;

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function loadHighslide() {
  if (!DATA.highslide) return;
  const css = document.createElement("link");
  css.rel = "stylesheet";
  css.href = DATA.highslide + "/highslide.css";
  document.head.appendChild(css);
  const js = document.createElement("script");
  js.src = DATA.highslide + "/highslide.js";
  js.onload = () => {
    if (window.hs) hs.graphicsDir = DATA.highslide + "/graphics/";
  };
  document.head.appendChild(js);
}

function renderSummary() {
  const el = document.getElementById("summary");
  el.innerHTML = `
    <span class="pill">source: <code>${escapeHtml(DATA.source)}</code></span>
    <span class="pill">plots: <b>${DATA.total_plots}</b></span>
    <span class="pill">groups: <b>${DATA.groups.length}</b></span>
  `;
}

function plotLink(p) {
  if (p.raster) {
    return `<a class="plot highslide" href="${escapeHtml(p.raster)}" onclick="return window.hs ? hs.expand(this) : true"
      title="${escapeHtml(p.full_path)}">${escapeHtml(p.title)}</a>
      <a class="muted" href="${escapeHtml(p.href)}">eps</a>`;
  }
  return `<a class="plot" href="${escapeHtml(p.href)}" title="${escapeHtml(p.full_path)}">${escapeHtml(p.title)}</a>`;
}

function renderGroups() {
  const root = document.getElementById("groups");
  root.innerHTML = "";
  if (DATA.groups.length === 0) {
    root.innerHTML = `<p class="muted">No plots matched.</p>`;
    return;
  }
  for (const g of DATA.groups) {
    const head = document.createElement("div");
    head.className = "group";
    head.style.marginLeft = (g.depth * 16) + "px";
    head.innerHTML = g.path ? escapeHtml(g.path) : `<span class="muted">(top level)</span>`;
    root.appendChild(head);

    const list = document.createElement("div");
    list.className = "plots";
    list.style.marginLeft = (g.depth * 16) + "px";
    list.innerHTML = g.plots.map(plotLink).join("\n");
    root.appendChild(list);
  }
}

loadHighslide();
renderSummary();
renderGroups();
</script>
</body>
</html>
"#;

    Ok(TEMPLATE.replace("__DATA__", &json))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> IndexData {
        IndexData {
            source: "run1.root".into(),
            highslide: "highslide".into(),
            total_plots: 1,
            groups: vec![IndexGroup {
                path: "A".into(),
                depth: 1,
                plots: vec![IndexPlot {
                    name: "h1".into(),
                    full_path: "A/h1".into(),
                    title: "</script><b>".into(),
                    href: "A/h1.eps".into(),
                    raster: None,
                }],
            }],
        }
    }

    #[test]
    fn embeds_data_as_json() {
        let html = render_index_html(&data()).unwrap();
        assert!(!html.contains("__DATA__"));
        assert!(html.contains(r#""href":"A/h1.eps""#));
        assert!(html.contains(r#""total_plots":1"#));
    }

    #[test]
    fn embedded_data_cannot_close_the_script() {
        let html = render_index_html(&data()).unwrap();
        assert_eq!(html.matches("</script>").count(), 1);
    }
}
