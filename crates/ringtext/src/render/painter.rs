use super::theme::ThemeColors;
use super::{RenderError, Renderer};
use crate::layout::{ArcPath, HeuristicMeasure, TextMeasure, TextOnPath};
use cairo::{Context, FontSlant, FontWeight, Format, ImageSurface};
use ringdoc::geom::Point;
use ringdoc::text::PhraseText;
use std::f64::consts::PI;

const GUIDE_WIDTH: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
}

/// Measures text with cairo's toy font API. Falls back to the fixed-width
/// estimate when cairo cannot measure.
pub struct CairoMeasure {
    cr: Context,
    family: String,
    fallback: HeuristicMeasure,
}

impl CairoMeasure {
    pub fn new(family: &str, fallback: HeuristicMeasure) -> Result<Self, cairo::Error> {
        let surface = ImageSurface::create(Format::ARgb32, 1, 1)?;
        let cr = Context::new(&surface)?;
        cr.select_font_face(family, FontSlant::Normal, FontWeight::Normal);
        Ok(Self {
            cr,
            family: family.to_string(),
            fallback,
        })
    }
}

impl TextMeasure for CairoMeasure {
    fn path_length(&self, text: &PhraseText, font_size: f64) -> f64 {
        self.cr.set_font_size(font_size);
        match self.cr.text_extents(text) {
            Ok(ext) => ext.x_advance(),
            Err(e) => {
                log::warn!("Could not measure '{}' in {}: {}", text, self.family, e);
                self.fallback.path_length(text, font_size)
            }
        }
    }
}

/// Paints phrases on a cairo context, glyph by glyph along each arc.
pub struct CairoRenderer<'a> {
    cr: &'a Context,
    colors: ThemeColors,
    font: FontSpec,
}

impl<'a> CairoRenderer<'a> {
    pub fn new(cr: &'a Context, colors: ThemeColors, font: FontSpec) -> Self {
        Self { cr, colors, font }
    }

    fn draw_guide(&self, path: &ArcPath) -> Result<(), cairo::Error> {
        let Some(color) = self.colors.guide else {
            return Ok(());
        };
        let (r, g, b, a) = color.into_components();
        self.cr.set_source_rgba(r, g, b, a);
        self.cr.set_line_width(GUIDE_WIDTH);
        self.cr.new_path();
        self.cr.arc(
            path.center.x,
            path.center.y,
            path.radius,
            path.start_angle,
            path.end_angle,
        );
        self.cr.stroke()
    }

    fn draw_text(&self, path: &ArcPath, text: &TextOnPath) -> Result<(), cairo::Error> {
        let cr = self.cr;
        cr.save()?;
        cr.select_font_face(&self.font.family, FontSlant::Normal, FontWeight::Normal);
        cr.set_font_size(self.font.size);
        let (r, g, b, a) = self.colors.text.into_components();
        cr.set_source_rgba(r, g, b, a);

        let glyphs = text
            .text
            .chars()
            .map(|c| {
                let s = c.to_string();
                cr.text_extents(&s).map(|ext| (s, ext.x_advance()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let total: f64 = glyphs.iter().map(|(_, adv)| adv).sum();

        // centers the glyph box on the path
        let fe = cr.font_extents()?;
        let baseline_shift = (fe.ascent() - fe.descent()) / 2.0;

        // distance along the arc to the first glyph
        let mut along = path.length() * text.start_offset - total / 2.0;
        for (glyph, advance) in &glyphs {
            let theta = path.start_angle + (along + advance / 2.0) / path.radius;
            let p = Point::on_circle(path.center, path.radius, theta);

            cr.save()?;
            cr.translate(p.x, p.y);
            // tangent of a positive sweep
            cr.rotate(theta + PI / 2.0);
            cr.move_to(-advance / 2.0, baseline_shift);
            cr.show_text(glyph)?;
            cr.restore()?;

            along += advance;
        }

        cr.restore()
    }
}

impl Renderer for CairoRenderer<'_> {
    fn render(&mut self, path: &ArcPath, text: &TextOnPath) -> Result<(), RenderError> {
        self.draw_guide(path)?;
        self.draw_text(path, text)?;
        log::debug!("Painted {} with cairo", path.id);
        Ok(())
    }
}
