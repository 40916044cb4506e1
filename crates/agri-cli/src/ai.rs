//! AI assistant commands.

use std::fs;
use std::path::Path;
use std::time::Duration;

use agri_ai::{
    AiError, CropReportInput, PlantingScheduleInput, create_planting_schedule, generate_crop_report,
    render_crop_report_request, render_planting_schedule_request,
};
use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{AiCommand, CropReportArgs, PlantingArgs};
use crate::commands::Services;
use crate::summary::{print_crop_report, print_planting_schedule};

pub fn run_ai(cmd: AiCommand, services: &Services) -> Result<()> {
    match cmd {
        AiCommand::CropReport(args) => crop_report(args, services),
        AiCommand::Planting(args) => planting_schedule(args, services),
    }
}

fn crop_report(args: CropReportArgs, services: &Services) -> Result<()> {
    let input = CropReportInput {
        region: args.region,
        crop_type: args.crop_type,
        weather_data: args.weather_data,
        satellite_imagery: image_data_uri(&args.satellite_imagery)?,
        historical_data: args.historical_data,
    };
    if args.dry_run {
        let request = render_crop_report_request(&input)?;
        println!("{}", request.prompt);
        return Ok(());
    }

    let spinner = spinner("Generating crop health report...");
    let result = services.with_text_generator(|generator| generate_crop_report(generator, &input));
    spinner.finish_and_clear();
    let report = result.map_err(with_user_message)?;
    print_crop_report(&report);
    Ok(())
}

fn planting_schedule(args: PlantingArgs, services: &Services) -> Result<()> {
    let input = PlantingScheduleInput {
        crop_type: args.crop_type,
        location: args.location,
        weather_data: args.weather_data,
        farmer_preferences: args.farmer_preferences,
    };
    if args.dry_run {
        let request = render_planting_schedule_request(&input)?;
        println!("{}", request.prompt);
        return Ok(());
    }

    let spinner = spinner("Creating planting schedule...");
    let result =
        services.with_text_generator(|generator| create_planting_schedule(generator, &input));
    spinner.finish_and_clear();
    let schedule = result.map_err(with_user_message)?;
    print_planting_schedule(&schedule);
    Ok(())
}

/// Lead with the short message; `{:#}` shows the underlying error after it.
fn with_user_message(error: AiError) -> anyhow::Error {
    let message = error.user_message().to_string();
    anyhow::Error::new(error).context(message)
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

/// `data:` URIs pass through; anything else is read as an image file.
pub fn image_data_uri(raw: &str) -> Result<String> {
    if raw.trim_start().starts_with("data:") {
        return Ok(raw.trim().to_string());
    }
    let path = Path::new(raw);
    let Some(mime) = mime_for(path) else {
        bail!(
            "cannot tell the image type of {}; use png, jpeg, webp, gif or tiff",
            path.display()
        );
    };
    let bytes = fs::read(path).with_context(|| format!("read image {}", path.display()))?;
    Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_passes_through() {
        let uri = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(image_data_uri(uri).unwrap(), uri);
    }

    #[test]
    fn image_file_is_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.JPG");
        fs::write(&path, b"abc").unwrap();
        assert_eq!(
            image_data_uri(path.to_str().unwrap()).unwrap(),
            "data:image/jpeg;base64,YWJj"
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(image_data_uri("notes.txt").is_err());
    }
}
