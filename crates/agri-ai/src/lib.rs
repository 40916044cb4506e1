//! AI assistance for Agri Shield.
//!
//! Two flows are provided: a crop health report for district officers and a
//! planting schedule for farmers. Both render a fixed prompt from typed
//! input and ask a [`TextGenerator`] for JSON matching the flow's output
//! schema. [`GeminiClient`] is the hosted implementation.

pub mod config;
pub mod error;
pub mod flows;
pub mod gemini;
pub mod generator;
pub mod template;

pub use config::GeminiConfig;
pub use error::{AiError, Result};
pub use flows::{
    CROP_REPORT_PROMPT, CropReportInput, CropReportOutput, DEFAULT_FARMER_PREFERENCES,
    DEFAULT_WEATHER_DATA, PLANTING_SCHEDULE_PROMPT, PlantingScheduleInput,
    PlantingScheduleOutput, create_planting_schedule, generate_crop_report, parse_output,
    render_crop_report_request, render_planting_schedule_request,
};
pub use gemini::GeminiClient;
pub use generator::{GenerationRequest, TextGenerator};
pub use template::{InlineMedia, PromptPart, PromptTemplate, RenderedPrompt};
