//! Application services

pub mod conversion;

pub use conversion::{
    format_data_table, format_scientific, ConversionOptions, ConversionService,
    ConversionSummary,
};
