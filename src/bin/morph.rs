//! Morph CLI - Command-line interface for Vitamorph
//!
//! Commands:
//! - transform: Compute avatar frames from daily log records (batch mode)
//! - validate: Validate daily log record schema
//! - schema: Print schema information
//! - doctor: Diagnose configuration and input plumbing

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use vitamorph::mapper::BodyWidthMode;
use vitamorph::schema::{LogAdapter, LogRecord, SCHEMA_VERSION};
use vitamorph::{AvatarFrame, AvatarProcessor, MORPH_VERSION, PRODUCER_NAME};

/// Morph - On-device compute engine for adaptive wellness avatars
#[derive(Parser)]
#[command(name = "morph")]
#[command(version = MORPH_VERSION)]
#[command(about = "Transform daily wellness logs into avatar render frames", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute avatar frames from daily log records (batch mode)
    Transform {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Subject ID for records that carry none
        #[arg(long, default_value = "local")]
        subject_id: String,

        /// Derive the torso width from BMI instead of keeping it fixed
        #[arg(long)]
        bmi_width: bool,
    },

    /// Validate daily log record schema
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },

    /// Diagnose configuration and input plumbing
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one frame per line)
    Ndjson,
    /// JSON array of frames
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (wellness.daily_log.v1)
    Input,
    /// Output schema (avatar.frame.v1)
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), MorphCliError> {
    match cli.command {
        Commands::Transform {
            input,
            output,
            input_format,
            output_format,
            subject_id,
            bmi_width,
        } => cmd_transform(
            &input,
            &output,
            input_format,
            output_format,
            &subject_id,
            bmi_width,
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),

        Commands::Doctor { json } => cmd_doctor(json),
    }
}

fn read_input(input: &PathBuf) -> Result<String, MorphCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_records(data: &str, format: InputFormat) -> Result<Vec<LogRecord>, MorphCliError> {
    let records = match format {
        InputFormat::Ndjson => LogAdapter::parse_ndjson(data)?,
        InputFormat::Json => LogAdapter::parse_array(data)?,
    };
    Ok(records)
}

fn cmd_transform(
    input: &PathBuf,
    output: &PathBuf,
    input_format: InputFormat,
    output_format: OutputFormat,
    default_subject: &str,
    bmi_width: bool,
) -> Result<(), MorphCliError> {
    let input_data = read_input(input)?;
    let records = parse_records(&input_data, input_format)?;

    if records.is_empty() {
        return Err(MorphCliError::NoRecords);
    }

    // Group records by subject; records without one fall back to the
    // --subject-id default
    let mut by_subject: BTreeMap<String, Vec<LogRecord>> = BTreeMap::new();
    for record in records {
        let subject = record
            .subject_id
            .clone()
            .unwrap_or_else(|| default_subject.to_string());
        by_subject.entry(subject).or_default().push(record);
    }

    let mode = if bmi_width {
        BodyWidthMode::BmiDerived
    } else {
        BodyWidthMode::Fixed
    };
    let processor = AvatarProcessor::with_body_width_mode(mode);

    let mut frames: Vec<AvatarFrame> = Vec::new();
    for (subject, subject_records) in by_subject {
        let logs = LogAdapter::to_logs(subject_records)?;
        frames.push(processor.process(&logs, &subject));
    }

    let output_data = format_output(&frames, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(
    input: &PathBuf,
    input_format: InputFormat,
    json: bool,
) -> Result<(), MorphCliError> {
    let input_data = read_input(input)?;
    let records = parse_records(&input_data, input_format)?;

    let results = LogAdapter::validate_records(&records);
    let errors: Vec<ValidationErrorDetail> = results
        .iter()
        .filter(|r| !r.is_valid())
        .map(|r| ValidationErrorDetail {
            index: r.index,
            record_id: r.record_id.clone(),
            error: r.error.as_ref().map(|e| e.to_string()).unwrap_or_default(),
        })
        .collect();

    let report = ValidationReport {
        total_records: records.len(),
        valid_records: records.len() - errors.len(),
        invalid_records: errors.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Record {} (index {}): {}",
                    err.record_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_records > 0 {
        Err(MorphCliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), MorphCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", SCHEMA_VERSION);
                println!();
                println!("One record per (subject, calendar day):");
                println!();
                println!("- date: YYYY-MM-DD calendar date of the log");
                println!("- water_ml: Water intake in milliliters (>= 0)");
                println!("- sleep_hours: Hours slept (>= 0)");
                println!("- mood: Self-reported mood on a 1-5 scale");
                println!("- exercise_minutes: Minutes of exercise");
                println!("- height_cm / weight_kg: Anthropometrics for BMI (> 0)");
                println!();
                println!("Optional: exercise_type, waist_cm, hip_cm, chest_cm, body_fat_pct");
                println!("Optional envelope: record_id, subject_id");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: avatar.frame.v1");
                println!();
                println!("An avatar frame contains:");
                println!();
                println!("- frame_version: Schema version");
                println!("- producer: {{ name, version, instance_id }}");
                println!("- provenance: {{ subject_id, log_count, latest_date, computed_at_utc }}");
                println!("- summary: Aggregated metrics behind the frame (absent for new subjects)");
                println!("- parameters: {{ body_width, muscle_definition, hydration_level,");
                println!("                energy_level, avg_sleep, avg_mood }}");
                println!("- features: Boolean flags (aura, glow, sparkles, wave, dark circles, ...)");
                println!("- style: Continuous attributes (opacities, mouth, arm geometry)");
            }
        }
    }

    Ok(())
}

fn cmd_doctor(json: bool) -> Result<(), MorphCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "morph_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Vitamorph version {}", MORPH_VERSION),
    });

    checks.push(DoctorCheck {
        name: "schema_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Input schema: {}", SCHEMA_VERSION),
    });

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (batch mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: MORPH_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Morph Doctor Report");
        println!("===================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(MorphCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn format_output(frames: &[AvatarFrame], format: &OutputFormat) -> Result<String, MorphCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for frame in frames {
                lines.push(serde_json::to_string(frame)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(frames)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(frames)?),
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://vitamorph.dev/schemas/wellness.daily_log.v1.json",
        "title": "wellness.daily_log.v1",
        "description": "Vitamorph daily wellness log schema",
        "type": "object",
        "required": ["schema_version", "date", "water_ml", "sleep_hours", "mood", "exercise_minutes", "height_cm", "weight_kg"],
        "properties": {
            "schema_version": {
                "type": "string",
                "const": "wellness.daily_log.v1"
            },
            "record_id": { "type": "string" },
            "subject_id": { "type": "string" },
            "date": { "type": "string", "format": "date" },
            "water_ml": { "type": "number", "minimum": 0 },
            "sleep_hours": { "type": "number", "minimum": 0 },
            "mood": { "type": "integer", "minimum": 1, "maximum": 5 },
            "exercise_minutes": { "type": "integer", "minimum": 0 },
            "exercise_type": { "type": "string" },
            "height_cm": { "type": "number", "exclusiveMinimum": 0 },
            "weight_kg": { "type": "number", "exclusiveMinimum": 0 },
            "waist_cm": { "type": "number", "minimum": 0 },
            "hip_cm": { "type": "number", "minimum": 0 },
            "chest_cm": { "type": "number", "minimum": 0 },
            "body_fat_pct": { "type": "number", "minimum": 0 }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://vitamorph.dev/schemas/avatar.frame.v1.json",
        "title": "avatar.frame.v1",
        "description": "Vitamorph avatar frame schema",
        "type": "object",
        "required": ["frame_version", "producer", "provenance", "parameters", "features", "style"],
        "properties": {
            "frame_version": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "provenance": {
                "type": "object",
                "properties": {
                    "subject_id": { "type": "string" },
                    "log_count": { "type": "integer" },
                    "latest_date": { "type": "string" },
                    "computed_at_utc": { "type": "string" }
                }
            },
            "summary": { "type": "object" },
            "parameters": {
                "type": "object",
                "properties": {
                    "body_width": { "type": "number", "minimum": 60, "maximum": 120 },
                    "muscle_definition": { "type": "number", "maximum": 100 },
                    "hydration_level": { "type": "number", "maximum": 100 },
                    "energy_level": { "type": "number", "maximum": 100 },
                    "avg_sleep": { "type": "number" },
                    "avg_mood": { "type": "number" }
                }
            },
            "features": { "type": "object" },
            "style": { "type": "object" }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum MorphCliError {
    Io(io::Error),
    Compute(vitamorph::ComputeError),
    Json(serde_json::Error),
    NoRecords,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for MorphCliError {
    fn from(e: io::Error) -> Self {
        MorphCliError::Io(e)
    }
}

impl From<vitamorph::ComputeError> for MorphCliError {
    fn from(e: vitamorph::ComputeError) -> Self {
        MorphCliError::Compute(e)
    }
}

impl From<serde_json::Error> for MorphCliError {
    fn from(e: serde_json::Error) -> Self {
        MorphCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<MorphCliError> for CliError {
    fn from(e: MorphCliError) -> Self {
        match e {
            MorphCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            MorphCliError::Compute(e) => CliError {
                code: "COMPUTE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches the wellness.daily_log.v1 schema".to_string()),
            },
            MorphCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            MorphCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            MorphCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            MorphCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    record_id: Option<String>,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
