use crate::config::{Config, MeasureMode};
use crate::layout::{ArcLayout, HeuristicMeasure, LayoutError, LayoutResult, TextMeasure};
use crate::render::painter::FontSpec;
use crate::render::{
    CairoMeasure, CairoRenderer, RenderError, SvgRenderer, ThemeColors, render_all,
};
use cairo::{Context, Format, ImageSurface, SvgSurface};
use ringdoc::markup::{self, MarkupError, PhraseElement};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub fn text_measure(config: &Config) -> Box<dyn TextMeasure> {
    let heuristic = HeuristicMeasure::new(config.layout.char_width_factor);
    match config.layout.measure {
        MeasureMode::Heuristic => Box::new(heuristic),
        MeasureMode::Cairo => match CairoMeasure::new(&config.layout.font_family, heuristic) {
            Ok(m) => Box::new(m),
            Err(e) => {
                log::warn!("Cairo measurement unavailable, estimating instead: {}", e);
                Box::new(heuristic)
            }
        },
    }
}

/// A document whose phrases have been laid out once.
pub struct Page {
    source: String,
    elements: Vec<PhraseElement>,
    results: Vec<LayoutResult>,
    container: f64,
}

impl Page {
    pub fn load(source: String, config: &Config) -> Result<Self, PageError> {
        let elements = markup::read_phrases(&source)?;
        let phrases = config.phrases(&elements)?;

        let measure = text_measure(config);
        let results = ArcLayout::new(
            config.circle(),
            config.layout.span_rules(),
            measure.as_ref(),
        )
        .compute(&phrases)?;

        Ok(Self {
            source,
            elements,
            results,
            container: config.geometry.container,
        })
    }

    pub fn results(&self) -> &[LayoutResult] {
        &self.results
    }

    fn svg(&self) -> Result<SvgRenderer, RenderError> {
        let mut svg = SvgRenderer::new(self.container);
        render_all(&mut svg, &self.results)?;
        Ok(svg)
    }

    /// The source document with an inline `<svg>` inside every phrase element.
    pub fn to_markup(&self) -> Result<String, PageError> {
        let fragments = self.svg()?.fragments();
        Ok(markup::splice(
            &self.source,
            self.elements
                .iter()
                .zip(fragments.iter().map(String::as_str)),
        ))
    }

    pub fn to_svg(&self) -> Result<String, PageError> {
        Ok(self.svg()?.to_document())
    }

    pub fn paint(&self, cr: &Context, config: &Config) -> Result<(), RenderError> {
        let font = FontSpec {
            family: config.layout.font_family.clone(),
            size: config.geometry.font_size,
        };
        let mut renderer = CairoRenderer::new(cr, ThemeColors::from_config(&config.theme), font);
        render_all(&mut renderer, &self.results)
    }

    fn pixel_size(&self) -> i32 {
        self.container.ceil() as i32
    }

    pub fn write_png(&self, config: &Config, path: &Path) -> Result<(), PageError> {
        let size = self.pixel_size();
        let surface = ImageSurface::create(Format::ARgb32, size, size).map_err(RenderError::from)?;
        {
            let cr = Context::new(&surface).map_err(RenderError::from)?;
            self.paint(&cr, config)?;
        }
        let mut file = fs_err::File::create(path).map_err(RenderError::from)?;
        surface
            .write_to_png(&mut file)
            .map_err(RenderError::from)?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }

    pub fn write_cairo_svg(&self, config: &Config, path: &Path) -> Result<(), PageError> {
        let size = self.container;
        let surface = SvgSurface::new(size, size, Some(path)).map_err(RenderError::from)?;
        {
            let cr = Context::new(&surface).map_err(RenderError::from)?;
            self.paint(&cr, config)?;
        }
        surface.finish();
        // write errors only surface once the stream is flushed
        surface.status().map_err(RenderError::from)?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }
}
