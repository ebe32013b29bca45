// Domain entities

pub mod config;
pub mod finding;
pub mod merchant;
pub mod query;
pub mod risk_profile;
pub mod rows;
pub mod sweep;
pub mod transaction;

pub use config::*;
pub use finding::*;
pub use merchant::*;
pub use query::*;
pub use risk_profile::*;
pub use rows::*;
pub use sweep::*;
pub use transaction::*;
