pub mod cards;
pub mod phase;
