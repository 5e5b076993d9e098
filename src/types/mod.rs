// Public modules
pub mod content_block;
pub mod message;
pub mod message_create_params;
pub mod message_param;
pub mod model;
pub mod stop_reason;
pub mod usage;

// Re-exports
pub use content_block::{ContentBlock, TextBlock};
pub use message::Message;
pub use message_create_params::MessageCreateParams;
pub use message_param::{MessageParam, MessageRole};
pub use model::{KnownModel, Model};
pub use stop_reason::StopReason;
pub use usage::Usage;
