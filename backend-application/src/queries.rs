pub mod merchant_queries;
pub mod sweep_queries;
pub mod transaction_queries;
pub mod weight_queries;
