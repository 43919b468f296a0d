mod scorer;

pub use scorer::{TrendingScorer, TrendingTables};
