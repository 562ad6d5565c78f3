mod chat;
mod prompt;

pub use chat::{ChatGeneratorConfig, OpenAiChatGenerator};
pub use prompt::{build_user_prompt, SYSTEM_PERSONA};
