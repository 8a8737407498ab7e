//! Subcommands beyond the monitoring cycle itself.

pub mod check;
pub mod subscribers;

pub use check::CheckArgs;
pub use subscribers::SubscribersArgs;
