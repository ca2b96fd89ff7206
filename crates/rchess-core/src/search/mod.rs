//! Search
//!
//! - `alpha_beta`: principal variation search with named pruning stages
//! - `qsearch`: captures-only quiescence
//! - `iterative`: iterative deepening, aspiration windows, helper skip schedule
//! - `movepicker` / `thread_data`: staged move ordering over a per-thread buffer
//! - `time_manager` / `signals`: budgets, stop and ponder flags
//! - `stats`: pruning and cache counters behind the `search-stats` feature

pub mod alpha_beta;
pub mod constants;
pub mod iterative;
pub mod limits;
pub mod movepicker;
pub mod pruning;
pub mod pv;
pub mod qsearch;
pub mod signals;
pub mod stats;
pub mod thread_data;
pub mod time_manager;

pub use alpha_beta::{SearchContext, SearchWorker};
pub use limits::SearchLimits;
pub use movepicker::{MovePicker, Phase};
pub use pruning::{LmrInput, PruneToggles};
pub use pv::{PvLine, extract_pv, pv_to_string};
pub use signals::{NodeCounters, SearchSignals};
#[cfg(feature = "search-stats")]
pub use stats::SearchStats;
pub use thread_data::ThreadData;
pub use time_manager::TimeManager;
