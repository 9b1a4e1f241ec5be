pub mod cleaning;
pub mod cohort;
pub mod columns;
pub mod config;
pub mod db;
pub mod error;
pub mod improvement;
pub mod outliers;
pub mod pipelines;
pub mod render;
pub mod source;
pub mod stats;
