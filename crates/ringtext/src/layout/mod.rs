pub mod measure;
pub mod model;

pub use measure::{HeuristicMeasure, TextMeasure};
pub use model::{
    ArcLayout, ArcPath, CircleGeometry, LayoutError, LayoutResult, Phrase, SpanRules,
    TextOnPath, compute_layout,
};

pub const ORBIT_RADIUS: f64 = 90.0;
pub const CONTAINER_SIZE: f64 = 240.0; // square viewBox edge
pub const FONT_SIZE: f64 = 16.0;
pub const CHAR_WIDTH_FACTOR: f64 = 0.6; // of font size
pub const SPAN_PADDING: f64 = 1.2;
pub const MIN_ARC_SPAN: f64 = 100.0; // degrees
pub const LARGE_ARC_THRESHOLD: f64 = 180.0; // degrees
pub const TEXT_START_OFFSET: f64 = 0.5; // fraction of the path length
pub const SWEEP_FLAG: u8 = 1;
pub const UNTAGGED_PREFIX: &str = "untagged-";
