//! DAT parsing, the hash index, and the on-disk DAT cache.

pub mod cache;
pub mod dat;
pub mod error;
pub mod index;

pub use cache::{DatBytes, DatCache, DatProvider};
pub use dat::{DatEntry, DatFormat, ParsedDat, parse_dat, parse_dat_file};
pub use error::{DatError, ParseError};
pub use index::{HashIndex, MergeStats, RomMatch};
