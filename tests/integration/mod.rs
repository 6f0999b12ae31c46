//! Integration tests for packrat

mod config_registry;
mod put_semantics;
mod test_utils;
