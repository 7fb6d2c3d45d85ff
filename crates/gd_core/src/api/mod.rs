pub mod json_api;

pub use json_api::{step, step_json, StepAction, StepRequest, StepResponse};
