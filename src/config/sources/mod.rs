pub mod environment;
pub mod registry_file;
