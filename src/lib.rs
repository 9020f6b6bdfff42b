pub mod file_store;
pub mod scanner;
pub mod struct_tag;
