// Assessment flow: question generation, session guards, grading, aggregation.
// All OpenAI calls go through providers::openai, no direct API calls here.

pub mod competencies;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod scoring;
pub mod session;
