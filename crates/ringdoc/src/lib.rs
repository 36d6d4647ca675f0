pub mod geom;
pub mod macros;
pub mod markup;
pub mod text;
