pub mod aggregate;
pub mod classifier;
pub mod lexicon;
pub mod recency;
pub mod router;

pub use classifier::ClaudeSentimentClassifier;
