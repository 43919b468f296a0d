mod orchestrator;

pub use orchestrator::{Orchestrator, RunReport, Selection, ThinkTime};
