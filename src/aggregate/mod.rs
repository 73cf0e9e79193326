pub mod content;
pub mod demographic;
pub mod geographic;
pub mod temporal;

pub use content::{aggregate_words, WordFrequencies};
pub use demographic::{aggregate_demographics, DemographicProfile};
pub use geographic::{aggregate_regions, RegionRanking};
pub use temporal::{aggregate_timeline, Timeline};
