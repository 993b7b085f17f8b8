pub mod evaluator;
pub mod fingerprint;
