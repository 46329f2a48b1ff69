pub mod comparator;
pub mod csv_processor;
pub mod mapping;
pub mod utils;

pub use comparator::{compare, compare_libraries, IdentityKey, LibraryColumns};
pub use csv_processor::{
    read_table, split_by_count, split_by_status, write_table, ChunkSpec, CsvTable, OutputBatch,
    Row, StatusGroups,
};
pub use mapping::{remap, remap_with_report, ColumnMapping, RemapReport, SchemaMapping};
pub use utils::{AppConfig, BookshelfError, Result};
