pub mod cli;
pub mod collectors;
pub mod storage;
pub mod timeseries;
