//! Service layer for transcript question answering

pub mod answer_model;
pub mod gemini_client;
pub mod transcript;

pub use answer_model::{AnswerModel, ModelError};
pub use gemini_client::GeminiClient;
