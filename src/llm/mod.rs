// LLM abstraction layer

pub mod provider;
pub mod openai;

pub use provider::*;
