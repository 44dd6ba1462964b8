//! Resume screener library

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

pub use analysis::engine::{Analysis, ScreeningEngine};
pub use analysis::taxonomy::SkillTaxonomy;
pub use config::Config;
pub use error::{Result, ScreenerError};
