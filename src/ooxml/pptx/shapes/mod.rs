/// Shapes module for PowerPoint presentations.
///
/// This module provides types for working with shapes on slides, including:
/// - Shape views over `p:spTree` children, with placeholder properties
/// - Text frames, paragraphs and runs
/// - Templates for new text boxes and auto shapes
pub mod autoshape;
pub mod base;
pub mod textframe;

pub use autoshape::AutoShapeType;
pub use base::{PlaceholderFormat, PlaceholderType, Shape, ShapeMut, ShapeType};
pub use textframe::{Paragraph, ParagraphMut, Run, RunMut, TextFrame, TextFrameMut};
