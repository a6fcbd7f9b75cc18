pub mod config;
pub mod pipeline;
pub mod precinct;
pub mod table;
