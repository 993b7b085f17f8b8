pub mod class;
pub mod css;
