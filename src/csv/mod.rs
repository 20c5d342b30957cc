//! CSV utilities for encoding fields

mod encoder;

pub use encoder::CsvEncoder;
