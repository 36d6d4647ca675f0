use crate::config::ThemeConfig;
use palette::{Srgb, Srgba, WithAlpha};

pub struct ThemeColors {
    pub text: Srgba<f64>,
    pub guide: Option<Srgba<f64>>,
}

impl ThemeColors {
    pub fn from_config(theme: &ThemeConfig) -> Self {
        Self {
            text: Self::lookup_color(
                &theme.text,
                Srgba::new(1.0, 1.0, 1.0, 1.0),
                theme.text_alpha,
            ),
            guide: theme.guide.as_deref().map(|hex| {
                Self::lookup_color(hex, Srgba::new(1.0, 1.0, 1.0, 0.2), theme.guide_alpha)
            }),
        }
    }

    /// Parses `#rgb` or `#rrggbb`, falling back when the value is not a color.
    fn lookup_color(hex: &str, fallback: Srgba<f64>, alpha_override: Option<f64>) -> Srgba<f64> {
        hex.parse::<Srgb<u8>>()
            .map(|c| {
                c.into_format::<f64>()
                    .with_alpha(alpha_override.unwrap_or(1.0))
            })
            .unwrap_or_else(|e| {
                log::warn!("Invalid color '{}': {}", hex, e);
                fallback
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_from_config() {
        let theme = ThemeConfig {
            text: "#ff0000".to_string(),
            text_alpha: Some(0.5),
            guide: Some("not a color".to_string()),
            guide_alpha: Some(0.3),
        };
        let colors = ThemeColors::from_config(&theme);

        assert_eq!(colors.text.into_components(), (1.0, 0.0, 0.0, 0.5));
        let guide = colors.guide.unwrap();
        assert_eq!(guide.alpha, 0.2);
    }

    #[test]
    fn test_no_guide_by_default() {
        let colors = ThemeColors::from_config(&ThemeConfig::default());
        assert!(colors.guide.is_none());
        assert_eq!(colors.text.alpha, 1.0);
    }
}
