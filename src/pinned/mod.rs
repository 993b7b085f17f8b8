pub mod story;
pub mod timeline;
