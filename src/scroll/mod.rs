pub mod host;
pub mod offset;
pub mod source;
