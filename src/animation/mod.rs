pub mod ease;
pub mod keyframes;
pub mod smoothing;
