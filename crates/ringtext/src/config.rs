use crate::layout::{
    CHAR_WIDTH_FACTOR, CONTAINER_SIZE, CircleGeometry, FONT_SIZE, LayoutError, MIN_ARC_SPAN,
    ORBIT_RADIUS, Phrase, SPAN_PADDING, SpanRules,
};
use directories::ProjectDirs;
use ringdoc::geom::Point;
use ringdoc::markup::PhraseElement;
use ringdoc::text::PhraseClass;
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Named base angle. Screen y grows downward, so the compass turns clockwise
/// starting from east.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    #[strum(serialize = "East", serialize = "e", serialize = "0")]
    East,
    #[strum(serialize = "SouthEast", serialize = "se", serialize = "1")]
    SouthEast,
    #[strum(serialize = "South", serialize = "s", serialize = "2")]
    South,
    #[strum(serialize = "SouthWest", serialize = "sw", serialize = "3")]
    SouthWest,
    #[strum(serialize = "West", serialize = "w", serialize = "4")]
    West,
    #[strum(serialize = "NorthWest", serialize = "nw", serialize = "5")]
    NorthWest,
    #[strum(serialize = "North", serialize = "n", serialize = "6")]
    North,
    #[strum(serialize = "NorthEast", serialize = "ne", serialize = "7")]
    NorthEast,
}

impl Heading {
    pub fn as_index(&self) -> usize {
        *self as usize
    }

    pub fn degrees(&self) -> f64 {
        self.as_index() as f64 * 45.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, StrumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MeasureMode {
    #[default]
    Heuristic,
    Cairo,
}

/// What to do with a phrase whose position tag has no placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, StrumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UnknownTagPolicy {
    #[default]
    Default,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub radius: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub font_size: f64,
    pub container: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            radius: ORBIT_RADIUS,
            center_x: CONTAINER_SIZE / 2.0,
            center_y: CONTAINER_SIZE / 2.0,
            font_size: FONT_SIZE,
            container: CONTAINER_SIZE,
        }
    }
}

impl From<&GeometryConfig> for CircleGeometry {
    fn from(cfg: &GeometryConfig) -> Self {
        Self {
            radius: cfg.radius,
            center: Point::new(cfg.center_x, cfg.center_y),
            font_size: cfg.font_size,
            container: cfg.container,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub char_width_factor: f64,
    pub padding: f64,
    pub min_span: f64,
    pub measure: MeasureMode,
    pub font_family: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            char_width_factor: CHAR_WIDTH_FACTOR,
            padding: SPAN_PADDING,
            min_span: MIN_ARC_SPAN,
            measure: MeasureMode::default(),
            font_family: "Sans".to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn span_rules(&self) -> SpanRules {
        SpanRules {
            padding: self.padding,
            min_span: self.min_span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub text: String,
    pub text_alpha: Option<f64>,
    /// Color of the circle drawn under each phrase; no guide when unset.
    pub guide: Option<String>,
    pub guide_alpha: Option<f64>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            text: "#ffffff".to_string(),
            text_alpha: None,
            guide: None,
            guide_alpha: Some(0.2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlacementConfig {
    pub tag: PhraseClass,
    pub angle: Option<f64>,
    pub heading: Option<Heading>,
}

impl PlacementConfig {
    pub fn new(tag: &str, angle: f64) -> Self {
        Self {
            tag: PhraseClass::new(tag),
            angle: Some(angle),
            heading: None,
        }
    }

    /// An explicit angle wins over a heading.
    pub fn base_angle(&self) -> Option<f64> {
        self.angle.or_else(|| self.heading.map(|h| h.degrees()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub geometry: GeometryConfig,
    pub layout: LayoutConfig,
    pub theme: ThemeConfig,
    pub placements: Vec<PlacementConfig>,
    pub unknown_tag: UnknownTagPolicy,
    pub default_angle: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            layout: LayoutConfig::default(),
            theme: ThemeConfig::default(),
            placements: vec![
                PlacementConfig::new("phrase-1", 0.0),
                PlacementConfig::new("phrase-2", 120.0),
                PlacementConfig::new("phrase-3", 240.0),
            ],
            unknown_tag: UnknownTagPolicy::default(),
            default_angle: 0.0,
        }
    }
}

impl Config {
    pub fn circle(&self) -> CircleGeometry {
        CircleGeometry::from(&self.geometry)
    }

    /// Every placement must resolve to an angle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.placements.iter().find(|p| p.base_angle().is_none()) {
            Some(p) => Err(ConfigError::InvalidPlacement(p.tag.to_string())),
            None => Ok(()),
        }
    }

    pub fn base_angle(&self, class: Option<&PhraseClass>) -> Result<f64, LayoutError> {
        let placed = class.and_then(|c| {
            self.placements
                .iter()
                .find(|p| &p.tag == c)
                .and_then(PlacementConfig::base_angle)
        });

        match (placed, self.unknown_tag) {
            (Some(angle), _) => Ok(angle),
            (None, UnknownTagPolicy::Default) => {
                log::warn!(
                    "No placement for {}, using default angle {}",
                    class.map_or("untagged phrase", |c| c.as_str()),
                    self.default_angle
                );
                Ok(self.default_angle)
            }
            (None, UnknownTagPolicy::Reject) => Err(LayoutError::UnknownTag(
                class.map(|c| c.to_string()).unwrap_or_default(),
            )),
        }
    }

    pub fn phrases(&self, elements: &[PhraseElement]) -> Result<Vec<Phrase>, LayoutError> {
        elements
            .iter()
            .map(|el| {
                let angle = self.base_angle(el.class.as_ref())?;
                Ok(Phrase::new(el.class.clone(), el.text.clone(), angle))
            })
            .collect()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Placement for '{0}' needs an angle or a heading")]
    InvalidPlacement(String),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "ringtext", "ringtext").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// `RINGTEXT_GEOMETRY__RADIUS=120` overrides `geometry.radius`.
fn environment() -> config::Environment {
    config::Environment::with_prefix("RINGTEXT")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn build<S>(file: S, env: config::Environment) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let s = config::Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Loads `path`, or the user config file when no path is given. An explicit
/// path must exist; the user file is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => build(config::File::from(p).required(true), environment()),
        None => build(
            config::File::from(get_config_path()?).required(false),
            environment(),
        ),
    }
}

pub fn load_or_default() -> Config {
    match load_config(None) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
