use super::measure::{HeuristicMeasure, TextMeasure};
use super::{
    CONTAINER_SIZE, FONT_SIZE, LARGE_ARC_THRESHOLD, MIN_ARC_SPAN, ORBIT_RADIUS, SPAN_PADDING,
    SWEEP_FLAG, TEXT_START_OFFSET, UNTAGGED_PREFIX,
};
use ringdoc::geom::Point;
use ringdoc::text::{PhraseClass, PhraseText};
use std::f64::consts::PI;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid geometry: {field} must be a positive finite number, got {value}")]
    InvalidGeometry { field: &'static str, value: f64 },
    #[error("No placement configured for position tag '{0}'")]
    UnknownTag(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    pub class: Option<PhraseClass>,
    pub text: PhraseText,
    /// Degrees, measured clockwise from the positive x axis.
    pub base_angle: f64,
}

impl Phrase {
    pub fn new(class: Option<PhraseClass>, text: PhraseText, base_angle: f64) -> Self {
        Self {
            class,
            text,
            base_angle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleGeometry {
    pub radius: f64,
    pub center: Point,
    pub font_size: f64,
    pub container: f64,
}

impl Default for CircleGeometry {
    fn default() -> Self {
        Self {
            radius: ORBIT_RADIUS,
            center: Point::new(CONTAINER_SIZE / 2.0, CONTAINER_SIZE / 2.0),
            font_size: FONT_SIZE,
            container: CONTAINER_SIZE,
        }
    }
}

impl CircleGeometry {
    pub fn validate(&self) -> Result<(), LayoutError> {
        [
            ("radius", self.radius),
            ("font_size", self.font_size),
            ("container", self.container),
        ]
        .into_iter()
        .find(|(_, v)| !(v.is_finite() && *v > 0.0))
        .map_or(Ok(()), |(field, value)| {
            Err(LayoutError::InvalidGeometry { field, value })
        })
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanRules {
    /// Multiplier applied to every estimate so the text has room to breathe.
    pub padding: f64,
    /// Floor for the shared span, in degrees.
    pub min_span: f64,
}

impl Default for SpanRules {
    fn default() -> Self {
        Self {
            padding: SPAN_PADDING,
            min_span: MIN_ARC_SPAN,
        }
    }
}

pub struct ArcLayout<'a> {
    geometry: CircleGeometry,
    rules: SpanRules,
    measure: &'a dyn TextMeasure,
}

impl<'a> ArcLayout<'a> {
    pub fn new(geometry: CircleGeometry, rules: SpanRules, measure: &'a dyn TextMeasure) -> Self {
        Self {
            geometry,
            rules,
            measure,
        }
    }

    /// Angular width in degrees needed to fit `text` on the orbit, padding included.
    pub fn estimate_span(&self, text: &PhraseText) -> f64 {
        let path_length = self.measure.path_length(text, self.geometry.font_size);
        (path_length / self.geometry.circumference()) * 360.0 * self.rules.padding
    }

    /// The span every phrase of the pass gets: the widest estimate, floored at
    /// `min_span`.
    pub fn common_span(&self, phrases: &[Phrase]) -> f64 {
        phrases
            .iter()
            .map(|p| self.estimate_span(&p.text))
            .fold(self.rules.min_span, f64::max)
    }

    pub fn compute(&self, phrases: &[Phrase]) -> Result<Vec<LayoutResult>, LayoutError> {
        self.geometry.validate()?;

        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let span = self.common_span(phrases);
        log::debug!(
            "Laying out {} phrases with a shared span of {:.2}°",
            phrases.len(),
            span
        );

        Ok(phrases
            .iter()
            .enumerate()
            .map(|(i, phrase)| LayoutResult::place(i, phrase, span, &self.geometry))
            .collect())
    }
}

/// Lays `phrases` out with the default span rules and the fixed-width estimate.
pub fn compute_layout(
    phrases: &[Phrase],
    geometry: &CircleGeometry,
) -> Result<Vec<LayoutResult>, LayoutError> {
    ArcLayout::new(*geometry, SpanRules::default(), &HeuristicMeasure::default()).compute(phrases)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Position of the phrase in its pass.
    pub index: usize,
    pub class: Option<PhraseClass>,
    pub text: PhraseText,
    pub base_angle: f64,
    pub arc_span: f64,
    /// Degrees.
    pub start_angle: f64,
    /// Degrees.
    pub end_angle: f64,
    pub large_arc: bool,
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub radius: f64,
}

impl LayoutResult {
    fn place(index: usize, phrase: &Phrase, arc_span: f64, geometry: &CircleGeometry) -> Self {
        let start_angle = phrase.base_angle - arc_span / 2.0;
        let end_angle = phrase.base_angle + arc_span / 2.0;

        Self {
            index,
            class: phrase.class.clone(),
            text: phrase.text.clone(),
            base_angle: phrase.base_angle,
            arc_span,
            start_angle,
            end_angle,
            large_arc: arc_span > LARGE_ARC_THRESHOLD,
            start: Point::on_circle(geometry.center, geometry.radius, start_angle.to_radians()),
            end: Point::on_circle(geometry.center, geometry.radius, end_angle.to_radians()),
            center: geometry.center,
            radius: geometry.radius,
        }
    }

    /// Position tag, or `untagged-N` (1-based) for untagged phrases. Tags always
    /// start with `phrase-`, so the two never collide.
    pub fn class_name(&self) -> String {
        self.class
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| format!("{}{}", UNTAGGED_PREFIX, self.index + 1))
    }

    pub fn path_id(&self) -> String {
        format!("path-{}", self.class_name())
    }

    /// Where the centered text sits: the arc midpoint, i.e. the base angle.
    pub fn midpoint(&self) -> Point {
        Point::on_circle(self.center, self.radius, self.base_angle.to_radians())
    }

    pub fn path(&self) -> ArcPath {
        ArcPath {
            id: self.path_id(),
            center: self.center,
            radius: self.radius,
            start_angle: self.start_angle.to_radians(),
            end_angle: self.end_angle.to_radians(),
            start: self.start,
            end: self.end,
            large_arc: self.large_arc,
        }
    }

    pub fn text_on_path(&self) -> TextOnPath {
        TextOnPath {
            text: self.text.clone(),
            class: self.class_name(),
            path_id: self.path_id(),
            start_offset: TEXT_START_OFFSET,
        }
    }
}

/// Drawable circular arc. Arcs always run toward increasing angles, which is
/// clockwise on a y-down canvas (SVG sweep flag 1).
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPath {
    pub id: String,
    pub center: Point,
    pub radius: f64,
    /// Radians.
    pub start_angle: f64,
    /// Radians.
    pub end_angle: f64,
    pub start: Point,
    pub end: Point,
    pub large_arc: bool,
}

impl ArcPath {
    /// SVG path data, e.g. `M 30 120 A 90 90 0 0 1 210 120`.
    pub fn svg_data(&self) -> String {
        format!(
            "M {} {} A {} {} 0 {} {} {} {}",
            self.start.x,
            self.start.y,
            self.radius,
            self.radius,
            u8::from(self.large_arc),
            SWEEP_FLAG,
            self.end.x,
            self.end.y
        )
    }

    pub fn length(&self) -> f64 {
        self.radius * (self.end_angle - self.start_angle).abs()
    }
}

/// Text attached to an [`ArcPath`] by id, centered on `start_offset` both along
/// the path and across it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOnPath {
    pub text: PhraseText,
    pub class: String,
    pub path_id: String,
    /// Fraction of the path length where the text center sits.
    pub start_offset: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn phrase(class: &str, text: &str, base_angle: f64) -> Phrase {
        Phrase::new(
            Some(PhraseClass::new(class)),
            PhraseText::new(text),
            base_angle,
        )
    }

    fn trio(a: &str, b: &str, c: &str) -> Vec<Phrase> {
        vec![
            phrase("phrase-1", a, 0.0),
            phrase("phrase-2", b, 120.0),
            phrase("phrase-3", c, 240.0),
        ]
    }

    #[test]
    fn test_hello_estimate() {
        let measure = HeuristicMeasure::default();
        let layout = ArcLayout::new(CircleGeometry::default(), SpanRules::default(), &measure);

        let estimate = layout.estimate_span(&PhraseText::new("HELLO"));
        let expected = 48.0 / (2.0 * PI * 90.0) * 360.0 * 1.2;
        assert!((estimate - expected).abs() < EPS);
        assert!((estimate - 36.67).abs() < 0.01);

        let results = compute_layout(&[phrase("phrase-1", "HELLO", 0.0)], &layout.geometry).unwrap();
        assert_eq!(results[0].arc_span, 100.0);
    }

    #[test]
    fn test_three_phrase_angles() {
        let results = compute_layout(&trio("A", "B", "C"), &CircleGeometry::default()).unwrap();
        let angles: Vec<_> = results.iter().map(|r| (r.start_angle, r.end_angle)).collect();
        assert_eq!(angles, vec![(-50.0, 50.0), (70.0, 170.0), (190.0, 290.0)]);
    }

    #[test]
    fn test_span_is_shared_and_maximal() {
        let geometry = CircleGeometry::default();
        let measure = HeuristicMeasure::default();
        let layout = ArcLayout::new(geometry, SpanRules::default(), &measure);
        let long = "THIS PHRASE IS LONG ENOUGH TO PASS THE FLOOR";
        let phrases = trio("SHORT", long, "MID LENGTH");

        let results = layout.compute(&phrases).unwrap();
        let expected = layout.estimate_span(&PhraseText::new(long));
        assert!(expected > MIN_ARC_SPAN);
        for r in &results {
            assert_eq!(r.arc_span, expected);
            assert!((r.end_angle - r.start_angle - expected).abs() < EPS);
        }
    }

    #[test]
    fn test_empty_text_is_floored() {
        let measure = HeuristicMeasure::default();
        let layout = ArcLayout::new(CircleGeometry::default(), SpanRules::default(), &measure);
        assert_eq!(layout.estimate_span(&PhraseText::new("")), 0.0);

        let results = layout.compute(&[phrase("phrase-1", "", 45.0)]).unwrap();
        assert_eq!(results[0].arc_span, MIN_ARC_SPAN);
        assert_eq!(results[0].start_angle, -5.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(compute_layout(&[], &CircleGeometry::default()).unwrap().is_empty());
    }

    #[test]
    fn test_large_arc_threshold() {
        let measure = HeuristicMeasure::default();
        let cases = [(100.0, false), (180.0, false), (180.5, true), (270.0, true)];

        for (min_span, expected) in cases {
            let rules = SpanRules {
                min_span,
                ..SpanRules::default()
            };
            let layout = ArcLayout::new(CircleGeometry::default(), rules, &measure);
            let r = &layout.compute(&[phrase("phrase-1", "A", 0.0)]).unwrap()[0];
            assert_eq!(r.large_arc, expected, "span {min_span}");
            assert_eq!(r.path().svg_data().split(' ').nth(7), Some(if expected { "1" } else { "0" }));
        }
    }

    #[test]
    fn test_long_text_on_small_circle_is_large_arc() {
        let geometry = CircleGeometry {
            radius: 20.0,
            ..CircleGeometry::default()
        };
        let results = compute_layout(&[phrase("phrase-1", "ABCDEFGHIJ", 0.0)], &geometry).unwrap();
        assert!(results[0].arc_span > 300.0);
        assert!(results[0].large_arc);
    }

    #[test]
    fn test_endpoints_on_circle() {
        let geometry = CircleGeometry {
            radius: 57.5,
            center: Point::new(10.0, -4.0),
            ..CircleGeometry::default()
        };
        let results =
            compute_layout(&trio("ONE", "TWO TWO TWO TWO", "THREE"), &geometry).unwrap();

        for r in &results {
            assert!((r.start.distance(geometry.center) - 57.5).abs() < EPS);
            assert!((r.end.distance(geometry.center) - 57.5).abs() < EPS);
            assert!((r.midpoint().distance(geometry.center) - 57.5).abs() < EPS);
        }
    }

    #[test]
    fn test_idempotent() {
        let phrases = trio("HELLO", "WORLD", "AGAIN");
        let geometry = CircleGeometry::default();
        assert_eq!(
            compute_layout(&phrases, &geometry).unwrap(),
            compute_layout(&phrases, &geometry).unwrap()
        );
    }

    #[test]
    fn test_invalid_geometry() {
        let cases = [
            (
                CircleGeometry {
                    radius: 0.0,
                    ..CircleGeometry::default()
                },
                "radius",
            ),
            (
                CircleGeometry {
                    font_size: -1.0,
                    ..CircleGeometry::default()
                },
                "font_size",
            ),
            (
                CircleGeometry {
                    container: f64::NAN,
                    ..CircleGeometry::default()
                },
                "container",
            ),
        ];

        for (geometry, expected) in cases {
            match compute_layout(&trio("A", "B", "C"), &geometry) {
                Err(LayoutError::InvalidGeometry { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidGeometry for {expected}, got {other:?}"),
            }
        }

        // geometry is checked even with nothing to lay out
        let bad = CircleGeometry {
            radius: -3.0,
            ..CircleGeometry::default()
        };
        assert!(compute_layout(&[], &bad).is_err());
    }

    #[test]
    fn test_descriptors() {
        let mut phrases = trio("HELLO", "WORLD", "AGAIN");
        phrases[2].class = None;
        let results = compute_layout(&phrases, &CircleGeometry::default()).unwrap();

        let path = results[0].path();
        assert_eq!(path.id, "path-phrase-1");
        assert!((path.length() - 90.0 * 100f64.to_radians()).abs() < EPS);
        assert!(path.svg_data().starts_with("M "));
        assert!(path.svg_data().contains(" A 90 90 0 0 1 "));

        let text = results[1].text_on_path();
        assert_eq!(text.path_id, "path-phrase-2");
        assert_eq!(text.class, "phrase-2");
        assert_eq!(text.start_offset, 0.5);

        assert_eq!(results[2].path_id(), "path-untagged-3");
        assert_eq!(results[2].text_on_path().class, "untagged-3");
    }

    #[test]
    fn test_untagged_ids_never_shadow_tags() {
        let phrases = vec![
            Phrase::new(None, PhraseText::new("A"), 0.0),
            phrase("phrase-1", "B", 120.0),
            Phrase::new(None, PhraseText::new("C"), 240.0),
        ];
        let results = compute_layout(&phrases, &CircleGeometry::default()).unwrap();

        let ids: Vec<_> = results.iter().map(|r| r.path_id()).collect();
        assert_eq!(ids, vec!["path-untagged-1", "path-phrase-1", "path-untagged-3"]);
    }
}
