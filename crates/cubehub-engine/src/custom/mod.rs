//! Custom cards: classification from images and stable id resolution

pub mod llm_reader;
pub mod resolver;

pub use llm_reader::{ClassifiedCard, LlmCustomCardReader};
pub use resolver::CustomCardResolver;
