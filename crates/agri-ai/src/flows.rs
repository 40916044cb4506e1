//! The two AI flows: crop health report and planting schedule.
//!
//! Each flow validates its typed input, renders it into a fixed prompt,
//! asks the generator for JSON matching the flow's output schema and parses
//! the answer into the typed output.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::{AiError, Result};
use crate::generator::{GenerationRequest, TextGenerator};
use crate::template::{InlineMedia, PromptTemplate};

pub const DEFAULT_WEATHER_DATA: &str = "No weather data provided.";
pub const DEFAULT_FARMER_PREFERENCES: &str = "No farmer preferences provided.";

pub const CROP_REPORT_PROMPT: PromptTemplate = PromptTemplate::new(
    "generateCropReportPrompt",
    "You are an AI assistant that generates detailed crop health reports for District Agricultural Officers.

Based on the following information, generate a comprehensive crop health report:

Region: {{{region}}}
Crop Type: {{{cropType}}}
Weather Data: {{{weatherData}}}
Satellite Imagery: {{media url=satelliteImagery}}
Historical Data: {{{historicalData}}}

The report should include:
- An overall assessment of the crop's health.
- Identification of potential risks such as disease outbreaks or pest infestations.
- Recommended actions for farmers to mitigate these risks.
",
);

pub const PLANTING_SCHEDULE_PROMPT: PromptTemplate = PromptTemplate::new(
    "createPlantingSchedulePrompt",
    "You are an expert agricultural advisor. Your goal is to provide an optimized planting schedule for farmers.

Consider the following information when creating the schedule:

Crop Type: {{{cropType}}}
Location: {{{location}}}
Weather Data: {{{weatherData}}}
Farmer Preferences: {{{farmerPreferences}}}

Provide a planting schedule that includes specific dates or date ranges for key activities such as:
- Seed selection
- Land preparation
- Planting
- Irrigation
- Fertilization
- Pest control
- Harvesting

Also, explain the rationale behind the schedule. Explain why each of these dates are chosen.
",
);

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AiError::InvalidInput {
            field,
            reason: "must not be empty".to_string(),
        })
    } else {
        Ok(())
    }
}

/// Gemini-style object schema with every property a required string.
fn string_object_schema(properties: &[(&str, &str)]) -> Value {
    let props: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(name, description)| {
            (
                (*name).to_string(),
                json!({ "type": "STRING", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
    json!({ "type": "OBJECT", "properties": props, "required": required })
}

// =============================================================================
// CROP HEALTH REPORT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropReportInput {
    pub region: String,
    pub crop_type: String,
    pub weather_data: String,
    /// `data:<mime>;base64,<data>`.
    pub satellite_imagery: String,
    pub historical_data: String,
}

impl CropReportInput {
    pub fn validate(&self) -> Result<()> {
        require("region", &self.region)?;
        require("cropType", &self.crop_type)?;
        require("weatherData", &self.weather_data)?;
        require("historicalData", &self.historical_data)?;
        if InlineMedia::from_data_uri(&self.satellite_imagery).is_none() {
            return Err(AiError::InvalidInput {
                field: "satelliteImagery",
                reason: "expected a data URI of the form data:<mimetype>;base64,<data>"
                    .to_string(),
            });
        }
        Ok(())
    }

    fn fields(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("region", self.region.clone()),
            ("cropType", self.crop_type.clone()),
            ("weatherData", self.weather_data.clone()),
            ("satelliteImagery", self.satellite_imagery.clone()),
            ("historicalData", self.historical_data.clone()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropReportOutput {
    pub overall_health: String,
    pub potential_risks: String,
    pub recommended_actions: String,
}

impl CropReportOutput {
    pub fn response_schema() -> Value {
        string_object_schema(&[
            ("overallHealth", "The overall health of the crop in the region."),
            (
                "potentialRisks",
                "Potential risks to the crop, such as disease or pests.",
            ),
            (
                "recommendedActions",
                "Recommended actions for farmers to take.",
            ),
        ])
    }
}

// =============================================================================
// PLANTING SCHEDULE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantingScheduleInput {
    pub crop_type: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farmer_preferences: Option<String>,
}

impl PlantingScheduleInput {
    pub fn validate(&self) -> Result<()> {
        require("cropType", &self.crop_type)?;
        require("location", &self.location)
    }

    /// Weather data, or the placeholder when none was given.
    pub fn weather_data_or_default(&self) -> &str {
        non_blank(self.weather_data.as_deref()).unwrap_or(DEFAULT_WEATHER_DATA)
    }

    pub fn farmer_preferences_or_default(&self) -> &str {
        non_blank(self.farmer_preferences.as_deref()).unwrap_or(DEFAULT_FARMER_PREFERENCES)
    }

    fn fields(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("cropType", self.crop_type.clone()),
            ("location", self.location.clone()),
            ("weatherData", self.weather_data_or_default().to_string()),
            (
                "farmerPreferences",
                self.farmer_preferences_or_default().to_string(),
            ),
        ])
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantingScheduleOutput {
    pub planting_schedule: String,
    pub rationale: String,
}

impl PlantingScheduleOutput {
    pub fn response_schema() -> Value {
        string_object_schema(&[
            (
                "plantingSchedule",
                "The optimized planting schedule for the specified crop and location.",
            ),
            (
                "rationale",
                "The reasoning behind the generated planting schedule.",
            ),
        ])
    }
}

// =============================================================================
// RUNNING FLOWS
// =============================================================================

/// Render a crop report prompt without calling the model.
pub fn render_crop_report_request(input: &CropReportInput) -> Result<GenerationRequest> {
    input.validate()?;
    Ok(GenerationRequest {
        prompt: CROP_REPORT_PROMPT.render(&input.fields())?,
        response_schema: CropReportOutput::response_schema(),
    })
}

pub fn render_planting_schedule_request(
    input: &PlantingScheduleInput,
) -> Result<GenerationRequest> {
    input.validate()?;
    Ok(GenerationRequest {
        prompt: PLANTING_SCHEDULE_PROMPT.render(&input.fields())?,
        response_schema: PlantingScheduleOutput::response_schema(),
    })
}

pub fn generate_crop_report(
    generator: &dyn TextGenerator,
    input: &CropReportInput,
) -> Result<CropReportOutput> {
    let request = render_crop_report_request(input)?;
    info!(region = %input.region, crop = %input.crop_type, "generating crop health report");
    run(generator, &request)
}

pub fn create_planting_schedule(
    generator: &dyn TextGenerator,
    input: &PlantingScheduleInput,
) -> Result<PlantingScheduleOutput> {
    let request = render_planting_schedule_request(input)?;
    info!(location = %input.location, crop = %input.crop_type, "creating planting schedule");
    run(generator, &request)
}

fn run<O: DeserializeOwned>(generator: &dyn TextGenerator, request: &GenerationRequest) -> Result<O> {
    let text = generator.generate(request)?;
    debug!(bytes = text.len(), "model output received");
    parse_output(&text)
}

/// Parse model text into a flow output, tolerating a fenced code block.
pub fn parse_output<O: DeserializeOwned>(text: &str) -> Result<O> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .map_or(trimmed, str::trim);
    serde_json::from_str(body).map_err(|e| AiError::MalformedOutput(e.to_string()))
}
