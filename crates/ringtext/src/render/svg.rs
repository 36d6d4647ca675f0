use super::{RenderError, Renderer};
use crate::layout::{ArcPath, TextOnPath};
use quick_xml::escape::escape;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Collects one `<path>` plus `<text><textPath>` pair per phrase, either as
/// inline `<svg>` fragments to put back into the page or as one standalone image.
pub struct SvgRenderer {
    container: f64,
    bodies: Vec<String>,
}

impl SvgRenderer {
    pub fn new(container: f64) -> Self {
        Self {
            container,
            bodies: Vec::new(),
        }
    }

    fn view_box(&self) -> String {
        format!("0 0 {} {}", self.container, self.container)
    }

    /// One positioned `<svg>` per rendered phrase, in render order.
    pub fn fragments(&self) -> Vec<String> {
        let size = self.container;
        self.bodies
            .iter()
            .map(|body| {
                format!(
                    "<svg class=\"phrase-svg\" xmlns=\"{}\" viewBox=\"{}\" style=\"position: absolute; top: 0; left: 0; width: {size}px; height: {size}px; overflow: visible;\">{}</svg>",
                    SVG_NS,
                    self.view_box(),
                    body
                )
            })
            .collect()
    }

    pub fn to_document(&self) -> String {
        format!(
            "<svg xmlns=\"{}\" viewBox=\"{}\" width=\"{}\" height=\"{}\">\n{}\n</svg>\n",
            SVG_NS,
            self.view_box(),
            self.container,
            self.container,
            self.bodies.join("\n")
        )
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, path: &ArcPath, text: &TextOnPath) -> Result<(), RenderError> {
        let id = escape(path.id.as_str());
        let class = escape(text.class.as_str());
        let body = format!(
            "<path id=\"{}\" d=\"{}\" fill=\"none\"/><text class=\"phrase-text {}-text\"><textPath href=\"#{}\" startOffset=\"{}%\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</textPath></text>",
            id,
            path.svg_data(),
            class,
            escape(text.path_id.as_str()),
            text.start_offset * 100.0,
            escape(text.text.as_str())
        );
        log::debug!("Rendered {} as SVG", path.id);
        self.bodies.push(body);
        Ok(())
    }
}
