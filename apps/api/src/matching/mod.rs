// Resume-to-job matching: prompt building, reply parsing, ranking.
// Completion calls go through llm_client; nothing here knows which service answers.

pub mod delimited;
pub mod format;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod prompts;
pub mod ranking;
pub mod sanitize;
pub mod structured;
