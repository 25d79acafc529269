//! Market data boundary — providers that hand validated bar sequences to a run.

pub mod csv_import;
pub mod memory;
pub mod provider;
pub mod synthetic;

pub use csv_import::{load_csv, parse_csv, CsvProvider};
pub use memory::MemoryProvider;
pub use provider::{DataError, DataProvider};
pub use synthetic::SyntheticProvider;
