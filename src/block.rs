/// Defines the styled buffer and its annotations.
pub mod data;
/// The line accumulator that produces styled buffers.
pub mod builder;

pub use builder::{BulletListBuilder, TITLE_RELATIVE_SIZE};
pub use data::{Annotation, Span, StyledBuffer};
