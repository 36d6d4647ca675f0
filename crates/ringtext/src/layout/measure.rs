use super::CHAR_WIDTH_FACTOR;
use ringdoc::text::PhraseText;

/// Estimates how long a phrase is once laid out along a path.
pub trait TextMeasure {
    /// Advance of `text` at `font_size`, in the same unit as the orbit radius.
    fn path_length(&self, text: &PhraseText, font_size: f64) -> f64;
}

/// Fixed-width approximation: every character is `char_width_factor` of the
/// font size wide. Needs no font or rendering context, so results are
/// reproducible everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicMeasure {
    pub char_width_factor: f64,
}

impl HeuristicMeasure {
    pub fn new(char_width_factor: f64) -> Self {
        Self { char_width_factor }
    }

    pub fn char_width(&self, font_size: f64) -> f64 {
        font_size * self.char_width_factor
    }
}

impl Default for HeuristicMeasure {
    fn default() -> Self {
        Self::new(CHAR_WIDTH_FACTOR)
    }
}

impl TextMeasure for HeuristicMeasure {
    fn path_length(&self, text: &PhraseText, font_size: f64) -> f64 {
        text.char_count() as f64 * self.char_width(font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_length() {
        let m = HeuristicMeasure::default();
        assert!((m.char_width(16.0) - 9.6).abs() < 1e-12);
        assert!((m.path_length(&PhraseText::new("HELLO"), 16.0) - 48.0).abs() < 1e-12);
        assert_eq!(m.path_length(&PhraseText::new(""), 16.0), 0.0);
    }

    #[test]
    fn test_heuristic_counts_chars() {
        let m = HeuristicMeasure::new(1.0);
        assert_eq!(m.path_length(&PhraseText::new("ÅÄÖ"), 10.0), 30.0);
    }
}
