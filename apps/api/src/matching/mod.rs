// Matching engine: tokenization, dictionary-driven term extraction, scoring,
// categorization and suggestion synthesis. Everything except `provider` and
// `handlers` is pure and synchronous.

pub mod categorizer;
pub mod dictionary;
pub mod handlers;
pub mod matcher;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod scorer;
pub mod store;
pub mod suggestions;
pub mod tokenizer;
