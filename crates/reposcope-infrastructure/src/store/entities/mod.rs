pub mod analysis;
pub mod file_tree;
pub mod parsed_file;
