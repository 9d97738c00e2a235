//! Output persistence adapters

mod text_file;

pub use text_file::FileOutputWriter;
