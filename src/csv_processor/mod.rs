pub mod chunker;
pub mod reader;
pub mod table;
pub mod writer;

pub use chunker::{
    file_suffix, partition, split_by_count, split_by_status, split_by_status_with, ChunkRange,
    ChunkSpec, Chunks, CsvChunker, StatusGroups,
};
pub use reader::{read_table, read_table_from};
pub use table::{CsvTable, Row};
pub use writer::{write_table, write_table_to, OutputBatch, WrittenFile};
