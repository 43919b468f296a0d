mod synthesizer;

pub use synthesizer::SummarySynthesizer;
