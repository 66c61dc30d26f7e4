//! Process-local cache of the model ids served by OpenAI and OpenRouter, used to
//! check a requested model before issuing a real request.

pub mod core;
