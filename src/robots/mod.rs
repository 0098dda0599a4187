//! Robots.txt handling module
//!
//! This module provides the parsed robots policy and the gate that admission
//! consults. Retrieval lives with the fetcher (`crawler::RobotsLoader`); a
//! failed retrieval degrades to an allow-all gate instead of stopping the
//! crawl.

mod gate;
mod parser;

pub use gate::RobotsGate;
pub use parser::RobotsPolicy;
