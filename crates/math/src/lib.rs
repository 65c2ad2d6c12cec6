//! Math Crate - Expression trees and their visual layout
//!
//! This crate provides:
//! - The expression tree model consumed from an external producer
//! - A small set of composable layout primitives
//! - The expression renderer mapping expression trees onto layout primitives
//! - A measurement pass computing extents for layout trees
//! - A markup writer serializing layout trees to HTML spans

pub mod error;
pub mod layout;
pub mod markup;
pub mod measure;
pub mod model;
pub mod render;
pub mod symbols;

pub use error::*;
pub use layout::{FenceStretch, GlyphClass, LayoutKind, LayoutNode, SpaceWidth, VerticalAlign};
pub use markup::{escape_html, MarkupWriter};
pub use measure::{LayoutBox, LayoutEngine, MathFontMetrics};
pub use model::*;
pub use render::{render_expression, RenderConfig, Renderer};
