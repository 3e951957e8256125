//! Dashboard module
//!
//! Provides an overview page with the total owed, a leaderboard, the latest
//! activity and a chart of debt per person.

mod cards;
mod charts;
mod handlers;
mod summary;

pub use handlers::get_dashboard_page;
pub use summary::leaderboard;
