pub mod app;
pub mod filter_expr;
pub mod run;

pub use app::Cli;
pub use run::run;
