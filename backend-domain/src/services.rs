// Domain services: the risk & anomaly scoring engine

pub mod detectors;
pub mod engine;
pub mod scorer;
pub mod velocity;

pub use detectors::*;
pub use engine::*;
pub use scorer::*;
pub use velocity::*;
