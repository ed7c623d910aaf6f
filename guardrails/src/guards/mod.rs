pub mod format;
pub mod scope;
