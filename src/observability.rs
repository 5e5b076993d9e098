use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("agent_chat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("agent_chat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("agent_chat.client.request_duration_seconds");

pub(crate) static GENERATIONS: Counter = Counter::new("agent_chat.generation.requests");
pub(crate) static GENERATION_FAILURES: Counter = Counter::new("agent_chat.generation.failures");

pub(crate) static SESSION_COMMANDS: Counter = Counter::new("agent_chat.session.commands");
pub(crate) static SESSION_CHAT_MESSAGES: Counter =
    Counter::new("agent_chat.session.chat_messages");
pub(crate) static SESSION_QUEUED_PROMPTS: Counter =
    Counter::new("agent_chat.session.queued_prompts");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&GENERATIONS);
    collector.register_counter(&GENERATION_FAILURES);

    collector.register_counter(&SESSION_COMMANDS);
    collector.register_counter(&SESSION_CHAT_MESSAGES);
    collector.register_counter(&SESSION_QUEUED_PROMPTS);
}
