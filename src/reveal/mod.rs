pub mod stagger;
pub mod trigger;
