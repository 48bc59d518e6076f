// Measurement sources
pub mod memory;
pub mod directory;

// Re-export commonly used items
pub use memory::{parse_meminfo, read_meminfo, MemInfo};
pub use directory::{measure_dir_size, DirUsage, WalkOptions};
