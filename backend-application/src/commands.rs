pub mod ingest_commands;
pub mod score_commands;
pub mod seed_commands;
pub mod sweep_commands;
pub mod weight_commands;
