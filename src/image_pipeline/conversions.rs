//! Pipeline conversions module
//!
//! This module contains orchestration logic for various image format conversions.

mod dds_to_tiff;


pub use dds_to_tiff::DdsToTiffPipeline;
