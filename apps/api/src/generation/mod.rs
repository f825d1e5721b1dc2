// Resume generation: normalize -> prompt -> one completion call -> reconcile -> render.
// All completion calls go through llm_client; quota failures switch to the fallback here.

pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod markdown;
pub mod normalizer;
pub mod prompt_builder;
pub mod prompts;
pub mod ranking;
pub mod reconciler;
