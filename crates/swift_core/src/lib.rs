//! swift_core: SWIFT/BIC code catalog domain.
//!
//! Pure domain types, the `SwiftCodeStore` port, hierarchy resolution and
//! the bulk ingestion pipeline. Storage adapters live in sibling crates;
//! this crate has no database or HTTP dependencies.

pub mod error;
pub mod hierarchy;
pub mod ingest;
pub mod memory;
pub mod normalize;
pub mod ports;
pub mod service;
pub mod types;

pub use error::{Result, SwiftError};
pub use memory::MemorySwiftCodeStore;
pub use ports::SwiftCodeStore;
pub use service::{SwiftCodeService, SwiftCodeServiceImpl};
pub use types::{BranchSummary, CountrySwiftCodes, NewSwiftCode, SwiftCodeDetail, SwiftCodeRecord};
