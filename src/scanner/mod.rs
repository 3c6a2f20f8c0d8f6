//! Local descriptor discovery
//!
//! Lists the watched directory and turns descriptor files into parsed
//! descriptors, tolerating unrelated and invalid files.

pub mod discovery;
pub mod error;

pub use discovery::{Discovered, DescriptorScanner};
pub use error::{ScanError, ScanResult};
