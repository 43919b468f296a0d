mod fingerprint;
mod normalizer;

pub use fingerprint::fingerprint;
pub use normalizer::{normalize, truncate_chars};
