pub mod ingest_handlers;
pub mod merchant_handlers;
pub mod ops_handlers;
pub mod score_handlers;

pub use ingest_handlers::*;
pub use merchant_handlers::*;
pub use ops_handlers::*;
pub use score_handlers::*;
