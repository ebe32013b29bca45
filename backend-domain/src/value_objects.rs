// Domain value objects
pub mod identifiers;
pub mod pattern_kind;
pub mod severity;

pub use identifiers::*;
pub use pattern_kind::*;
pub use severity::*;
