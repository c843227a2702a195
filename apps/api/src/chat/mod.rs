// Chat responder: provider fallback chain, deterministic rules, directive
// extraction, and per-session conversation history.
// All HTTP calls to generation backends go through llm_client.

pub mod chain;
pub mod commands;
pub mod directives;
pub mod handlers;
pub mod prompt;
pub mod rules;
pub mod session;
