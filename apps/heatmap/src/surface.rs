//! Element tree standing in for the host document body.
//!
//! The chart renderer appends into [`Surface::body`] and keeps the paths of
//! the elements it needs to touch again (cells, tooltip). Serialisation
//! produces either a full HTML page or a standalone SVG document.

use std::fmt::Write as _;
use std::io;
use std::path::Path;

/// Child indexes from the body down to an element.
pub type ElementPath = Vec<usize>;

// Leaf SVG shapes are written self-closing; everything else gets a close tag.
const SELF_CLOSING: [&str; 5] = ["rect", "line", "path", "circle", "meta"];

const PAGE_STYLE: &str = r"
      body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 2rem; color: #222; }
      #chart { overflow: visible; }
      #title { font-size: 22px; font-weight: 600; }
      #description { font-size: 14px; fill: #555; }
      .tick text { font-size: 11px; }
      .cell:hover { stroke: #111; stroke-width: 1; }
      .legend-label { font-size: 11px; }
      #tooltip { position: absolute; pointer-events: none; padding: 6px 10px; border-radius: 4px; background: rgba(20, 20, 20, 0.85); color: #fff; font-size: 12px; text-align: center; }
";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Replaces an existing attribute in place, otherwise appends it.
    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        if let Some(slot) = self.attributes.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name.to_string(), value));
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let position = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(position).1)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn add_class(&mut self, class: &str) {
        match self.get_attr("class") {
            Some(existing) if existing.split_whitespace().any(|c| c == class) => {}
            Some(existing) => {
                let joined = format!("{existing} {class}");
                self.set_attr("class", joined);
            }
            None => self.set_attr("class", class),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Appends a child and returns its index.
    pub fn push(&mut self, child: Self) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    pub fn get(&self, path: &[usize]) -> Option<&Self> {
        path.iter()
            .try_fold(self, |element, index| element.children.get(*index))
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Self> {
        path.iter()
            .try_fold(self, |element, index| element.children.get_mut(*index))
    }

    /// Depth-first search for the first element carrying `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Self> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Self> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_by_id_mut(id))
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Self> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_tag(tag))
    }

    /// Every element with `class`, in document order.
    pub fn find_all_by_class(&self, class: &str) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Self>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_class(class, found);
        }
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out, 0);
        out
    }

    fn write_markup(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}<{}", self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(
                out,
                " {name}=\"{}\"",
                html_escape::encode_double_quoted_attribute(value)
            );
        }

        let text = self.text.as_deref().map(html_escape::encode_text);
        if self.children.is_empty() {
            match text {
                Some(text) => {
                    let _ = writeln!(out, ">{text}</{}>", self.tag);
                }
                None if SELF_CLOSING.contains(&self.tag.as_str()) => out.push_str("/>\n"),
                None => {
                    let _ = writeln!(out, "></{}>", self.tag);
                }
            }
            return;
        }

        out.push_str(">\n");
        if let Some(text) = text {
            let _ = writeln!(out, "{indent}  {text}");
        }
        for child in &self.children {
            child.write_markup(out, depth + 1);
        }
        let _ = writeln!(out, "{indent}</{}>", self.tag);
    }
}

/// The mount point the chart is injected into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    body: Element,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
        }
    }

    pub const fn body(&self) -> &Element {
        &self.body
    }

    /// Appends to the body and returns the new element's path.
    pub fn append(&mut self, element: Element) -> ElementPath {
        vec![self.body.push(element)]
    }

    pub fn get(&self, path: &[usize]) -> Option<&Element> {
        self.body.get(path)
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        self.body.get_mut(path)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.body.find_by_id(id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.find_by_id_mut(id)
    }

    pub fn find_all_by_class(&self, class: &str) -> Vec<&Element> {
        self.body.find_all_by_class(class)
    }

    pub fn to_html(&self, title: &str) -> String {
        let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("  <meta charset=\"UTF-8\">\n");
        let _ = writeln!(out, "  <title>{}</title>", html_escape::encode_text(title));
        let _ = writeln!(out, "  <style>{PAGE_STYLE}  </style>");
        out.push_str("</head>\n");
        out.push_str(&self.body.to_markup());
        out.push_str("</html>\n");
        out
    }

    /// The first `svg` under the body as a standalone document.
    pub fn to_svg(&self) -> Option<String> {
        let mut svg = self.body.find_by_tag("svg")?.clone();
        if svg.get_attr("xmlns").is_none() {
            svg.set_attr("xmlns", "http://www.w3.org/2000/svg");
        }
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&svg.to_markup());
        Some(out)
    }

    /// Writes the surface to `path`: a bare SVG document for `.svg`, an HTML page otherwise.
    pub fn write_document(&self, path: &Path, title: &str) -> io::Result<()> {
        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        let document = if is_svg {
            self.to_svg()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "surface holds no svg element"))?
        } else {
            self.to_html(title)
        };
        std::fs::write(path, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut element = Element::new("rect").attr("x", 1).attr("y", 2);
        element.set_attr("x", 10);
        assert_eq!(element.get_attr("x"), Some("10"));
        assert_eq!(element.to_markup(), "<rect x=\"10\" y=\"2\"/>\n");
    }

    #[test]
    fn test_classes_accumulate_without_duplicates() {
        let element = Element::new("g").class("tick").class("major").class("tick");
        assert_eq!(element.get_attr("class"), Some("tick major"));
        assert!(element.has_class("major"));
        assert!(!element.has_class("tic"));
    }

    #[test]
    fn test_lookup_by_id_class_and_path() {
        let mut surface = Surface::new();
        let path = surface.append(
            Element::new("svg").child(
                Element::new("g")
                    .id("legend")
                    .child(Element::new("rect").class("legend-scale-cell"))
                    .child(Element::new("rect").class("legend-scale-cell")),
            ),
        );

        assert_eq!(path, vec![0]);
        assert_eq!(surface.find_by_id("legend").map(Element::tag), Some("g"));
        assert_eq!(surface.find_all_by_class("legend-scale-cell").len(), 2);
        assert_eq!(surface.get(&[0, 0, 1]).map(Element::tag), Some("rect"));
        assert!(surface.get(&[0, 3]).is_none());

        if let Some(legend) = surface.find_by_id_mut("legend") {
            legend.set_attr("transform", "translate(60,540)");
        }
        assert_eq!(
            surface
                .find_by_id("legend")
                .and_then(|legend| legend.get_attr("transform")),
            Some("translate(60,540)")
        );
    }

    #[test]
    fn test_markup_escapes_attributes_and_text() {
        let element = Element::new("text")
            .attr("data-note", "a \"quoted\" <value>")
            .text("1753 - 2015 <base>");
        let markup = element.to_markup();
        assert!(markup.contains("data-note=\"a &quot;quoted&quot; &lt;value&gt;\""));
        assert!(markup.contains(">1753 - 2015 &lt;base&gt;</text>"));
    }

    #[test]
    fn test_leaf_shapes_self_close_and_divs_do_not() {
        assert_eq!(Element::new("rect").attr("x", 0).to_markup(), "<rect x=\"0\"/>\n");
        assert_eq!(Element::new("div").id("tooltip").to_markup(), "<div id=\"tooltip\"></div>\n");
    }

    #[test]
    fn test_svg_export_adds_namespace() {
        let mut surface = Surface::new();
        assert!(surface.to_svg().is_none());

        surface.append(Element::new("svg").attr("width", 10));
        surface.append(Element::new("div").id("tooltip"));

        let svg = surface.to_svg().unwrap_or_default();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(!svg.contains("tooltip"));

        let html = surface.to_html("Heat <map>");
        assert!(html.contains("<title>Heat &lt;map&gt;</title>"));
        assert!(html.contains("<div id=\"tooltip\"></div>"));
    }

    #[test]
    fn test_write_document_picks_format_from_extension() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut surface = Surface::new();

        let svg_path = dir.path().join("chart.SVG");
        assert!(surface.write_document(&svg_path, "Heatmap").is_err());

        surface.append(Element::new("svg").attr("width", 10));
        surface.write_document(&svg_path, "Heatmap")?;
        assert!(std::fs::read_to_string(&svg_path)?.starts_with("<?xml"));

        let html_path = dir.path().join("chart.html");
        surface.write_document(&html_path, "Heatmap")?;
        assert!(std::fs::read_to_string(&html_path)?.starts_with("<!DOCTYPE html>"));
        Ok(())
    }
}
