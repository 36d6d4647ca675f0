pub mod painter;
pub mod svg;
pub mod theme;

use crate::layout::{ArcPath, LayoutResult, TextOnPath};
use thiserror::Error;

pub use painter::{CairoMeasure, CairoRenderer};
pub use svg::SvgRenderer;
pub use theme::ThemeColors;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("Cairo output error: {0}")]
    CairoIo(#[from] cairo::IoError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Draws one phrase: its arc and the text attached to it.
pub trait Renderer {
    fn render(&mut self, path: &ArcPath, text: &TextOnPath) -> Result<(), RenderError>;
}

pub fn render_all<R: Renderer + ?Sized>(
    renderer: &mut R,
    results: &[LayoutResult],
) -> Result<(), RenderError> {
    results
        .iter()
        .try_for_each(|r| renderer.render(&r.path(), &r.text_on_path()))
}
