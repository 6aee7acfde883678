//! Pulse CLI - Command-line interface for Synheart Pulse
//!
//! Commands:
//! - run: Process streaming sensor events from stdin (live mode)
//! - transform: Replay recorded sensor events into control frames (batch mode)
//! - validate: Validate sensor event schema
//! - doctor: Diagnose configuration and environment
//! - schema: Print schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use synheart_pulse::config::EngineConfig;
use synheart_pulse::pipeline::{replay_events, PulseProcessor};
use synheart_pulse::schema::{
    ControlFrame, SensorEvent, CONTROL_FRAME_VERSION, SENSOR_EVENT_VERSION,
};
use synheart_pulse::{PulseError, PRODUCER_NAME, PULSE_VERSION};

/// Pulse - On-device compute engine for movement-driven audio control
#[derive(Parser)]
#[command(name = "pulse")]
#[command(author = "Synheart AI Inc")]
#[command(version = PULSE_VERSION)]
#[command(about = "Map gait cadence and heart rate to musical control signals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process streaming sensor events from stdin (live mode)
    Run {
        /// Control frame interval in event-time milliseconds
        #[arg(long, default_value = "250")]
        tick_ms: u64,

        /// Only emit frames whose signal changed since the last one
        #[arg(long)]
        emit_on_change: bool,

        /// Flush output after each frame
        #[arg(long, default_value = "true")]
        flush: bool,

        /// Engine configuration file (JSON, omitted fields take defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Magnitude threshold for step detection
        #[arg(long)]
        step_threshold: Option<f64>,

        /// Minimum spacing between steps in milliseconds (0 disables)
        #[arg(long)]
        refractory_ms: Option<u64>,

        /// Step history window size
        #[arg(long)]
        window: Option<usize>,

        /// Tempo smoothing weight (0.0 to 1.0 exclusive)
        #[arg(long)]
        smoothing: Option<f64>,

        /// Heart rate mapped to intensity 0.0
        #[arg(long)]
        hr_low: Option<u32>,

        /// Heart rate mapped to intensity 1.0
        #[arg(long)]
        hr_high: Option<u32>,

        /// Filter cutoff at intensity 0.0 (Hz)
        #[arg(long)]
        bright_low: Option<f64>,

        /// Filter cutoff at intensity 1.0 (Hz)
        #[arg(long)]
        bright_high: Option<f64>,

        /// Restore estimator state from file (overrides tuning flags)
        #[arg(long)]
        load_state: Option<PathBuf>,

        /// Save estimator state to file on exit
        #[arg(long)]
        save_state: Option<PathBuf>,
    },

    /// Replay recorded sensor events into control frames (batch mode)
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

        /// Control frame interval in event-time milliseconds
        #[arg(long, default_value = "250")]
        tick_ms: u64,

        /// Only emit frames whose signal changed since the last one
        #[arg(long)]
        emit_on_change: bool,

        /// Engine configuration file (JSON, omitted fields take defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Magnitude threshold for step detection
        #[arg(long)]
        step_threshold: Option<f64>,

        /// Minimum spacing between steps in milliseconds (0 disables)
        #[arg(long)]
        refractory_ms: Option<u64>,

        /// Step history window size
        #[arg(long)]
        window: Option<usize>,

        /// Tempo smoothing weight (0.0 to 1.0 exclusive)
        #[arg(long)]
        smoothing: Option<f64>,

        /// Heart rate mapped to intensity 0.0
        #[arg(long)]
        hr_low: Option<u32>,

        /// Heart rate mapped to intensity 1.0
        #[arg(long)]
        hr_high: Option<u32>,

        /// Filter cutoff at intensity 0.0 (Hz)
        #[arg(long)]
        bright_low: Option<f64>,

        /// Filter cutoff at intensity 1.0 (Hz)
        #[arg(long)]
        bright_high: Option<f64>,
    },

    /// Validate sensor event schema
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

    /// Diagnose configuration and environment
    Doctor {
        /// Check an engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
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
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one event per line)
    Ndjson,
    /// JSON array of events
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
    /// Input schema (pulse.sensor_event.v1)
    Input,
    /// Output schema (pulse.control_frame.v1)
    Output,
}

/// Tuning flag overrides applied on top of a base configuration
struct TuningOverrides {
    step_threshold: Option<f64>,
    refractory_ms: Option<u64>,
    window: Option<usize>,
    smoothing: Option<f64>,
    hr_low: Option<u32>,
    hr_high: Option<u32>,
    bright_low: Option<f64>,
    bright_high: Option<f64>,
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

fn run(cli: Cli) -> Result<(), PulseCliError> {
    match cli.command {
        Commands::Run {
            tick_ms,
            emit_on_change,
            flush,
            config,
            step_threshold,
            refractory_ms,
            window,
            smoothing,
            hr_low,
            hr_high,
            bright_low,
            bright_high,
            load_state,
            save_state,
        } => {
            let config = resolve_config(
                config.as_deref(),
                TuningOverrides {
                    step_threshold,
                    refractory_ms,
                    window,
                    smoothing,
                    hr_low,
                    hr_high,
                    bright_low,
                    bright_high,
                },
            )?;
            cmd_run(
                config,
                tick_ms,
                emit_on_change,
                flush,
                load_state.as_deref(),
                save_state.as_deref(),
            )
        }

        Commands::Transform {
            input,
            output,
            input_format,
            output_format,
            tick_ms,
            emit_on_change,
            config,
            step_threshold,
            refractory_ms,
            window,
            smoothing,
            hr_low,
            hr_high,
            bright_low,
            bright_high,
        } => {
            let config = resolve_config(
                config.as_deref(),
                TuningOverrides {
                    step_threshold,
                    refractory_ms,
                    window,
                    smoothing,
                    hr_low,
                    hr_high,
                    bright_low,
                    bright_high,
                },
            )?;
            cmd_transform(
                &input,
                &output,
                input_format,
                output_format,
                config,
                tick_ms,
                emit_on_change,
            )
        }

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

/// Build the engine configuration from an optional file plus flag overrides
fn resolve_config(
    config_path: Option<&Path>,
    overrides: TuningOverrides,
) -> Result<EngineConfig, PulseCliError> {
    let mut config = match config_path {
        Some(path) => {
            let config_json = fs::read_to_string(path)?;
            EngineConfig::from_json(&config_json)?
        }
        None => EngineConfig::default(),
    };

    if let Some(threshold) = overrides.step_threshold {
        config.step_detector.step_threshold = threshold;
    }
    if let Some(refractory_ms) = overrides.refractory_ms {
        config.step_detector.refractory_ms = refractory_ms;
    }
    if let Some(window) = overrides.window {
        config.cadence.window = window;
    }
    if let Some(smoothing) = overrides.smoothing {
        config.cadence.smoothing = smoothing;
    }
    if let Some(hr_low) = overrides.hr_low {
        config.vitals.hr_low = hr_low;
    }
    if let Some(hr_high) = overrides.hr_high {
        config.vitals.hr_high = hr_high;
    }
    if let Some(bright_low) = overrides.bright_low {
        config.vitals.bright_low_hz = bright_low;
    }
    if let Some(bright_high) = overrides.bright_high {
        config.vitals.bright_high_hz = bright_high;
    }

    config.validate()?;
    Ok(config)
}

fn cmd_run(
    config: EngineConfig,
    tick_ms: u64,
    emit_on_change: bool,
    flush: bool,
    load_state: Option<&Path>,
    save_state: Option<&Path>,
) -> Result<(), PulseCliError> {
    if tick_ms == 0 {
        return Err(PulseCliError::Pulse(PulseError::InvalidConfig(
            "tick_ms must be positive".to_string(),
        )));
    }

    let mut processor = PulseProcessor::with_config(config)?;

    // Restore saved estimator state if provided
    if let Some(state_path) = load_state {
        let state_json = fs::read_to_string(state_path)?;
        processor = PulseProcessor::from_json(&state_json)?;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    // The tick grid follows event time, so a replayed recording emits the
    // same frames a live session did
    let mut next_tick_ms: Option<u64> = None;
    let mut last_t_ms = 0u64;
    let mut pending = false;

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let event = SensorEvent::from_json(trimmed)
            .map_err(|e| PulseCliError::ParseError(format!("Failed to parse event: {}", e)))?;

        let t_ms = event.t_ms();
        let next = next_tick_ms.get_or_insert(t_ms + tick_ms);
        while t_ms >= *next {
            if let Some(frame) = next_frame(&mut processor, *next, emit_on_change) {
                writeln!(stdout, "{}", serde_json::to_string(&frame)?)?;
                if flush {
                    stdout.flush()?;
                }
            }
            pending = false;
            *next += tick_ms;
        }

        processor.process_event(&event)?;
        pending = true;
        last_t_ms = t_ms;
    }

    // Close out the final partial tick
    if pending {
        if let Some(frame) = next_frame(&mut processor, last_t_ms, emit_on_change) {
            writeln!(stdout, "{}", serde_json::to_string(&frame)?)?;
        }
        stdout.flush()?;
    }

    // Save estimator state if requested
    if let Some(state_path) = save_state {
        fs::write(state_path, processor.to_json()?)?;
    }

    Ok(())
}

fn next_frame(
    processor: &mut PulseProcessor,
    t_ms: u64,
    emit_on_change: bool,
) -> Option<ControlFrame> {
    if emit_on_change {
        processor.tick_frame_if_changed(t_ms)
    } else {
        Some(processor.tick_frame(t_ms))
    }
}

fn cmd_transform(
    input: &PathBuf,
    output: &PathBuf,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: EngineConfig,
    tick_ms: u64,
    emit_on_change: bool,
) -> Result<(), PulseCliError> {
    // Read input
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    // Parse events
    let events = match input_format {
        InputFormat::Ndjson => SensorEvent::parse_ndjson(&input_data)?,
        InputFormat::Json => SensorEvent::parse_array(&input_data)?,
    };

    if events.is_empty() {
        return Err(PulseCliError::NoEvents);
    }

    let frames = replay_events(&events, config, tick_ms, emit_on_change)?;

    // Write output
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
) -> Result<(), PulseCliError> {
    // Read input
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    // Parse events
    let events = match input_format {
        InputFormat::Ndjson => SensorEvent::parse_ndjson(&input_data)?,
        InputFormat::Json => SensorEvent::parse_array(&input_data)?,
    };

    // Validate each event
    let errors: Vec<ValidationErrorDetail> = events
        .iter()
        .enumerate()
        .filter_map(|(index, event)| {
            event.validate().err().map(|e| ValidationErrorDetail {
                index,
                t_ms: event.t_ms(),
                error: e.to_string(),
            })
        })
        .collect();

    let report = ValidationReport {
        total_events: events.len(),
        valid_events: events.len() - errors.len(),
        invalid_events: errors.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total events:   {}", report.total_events);
        println!("Valid events:   {}", report.valid_events);
        println!("Invalid events: {}", report.invalid_events);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Event at t_ms {} (index {}): {}",
                    err.t_ms, err.index, err.error
                );
            }
        }
    }

    if report.invalid_events > 0 {
        Err(PulseCliError::ValidationFailed(report.invalid_events))
    } else {
        Ok(())
    }
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), PulseCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    // Check Pulse version
    checks.push(DoctorCheck {
        name: "pulse_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Pulse version {}", PULSE_VERSION),
    });

    // Check schema versions
    checks.push(DoctorCheck {
        name: "input_schema".to_string(),
        status: CheckStatus::Ok,
        message: format!("Input schema: {}", SENSOR_EVENT_VERSION),
    });
    checks.push(DoctorCheck {
        name: "output_schema".to_string(),
        status: CheckStatus::Ok,
        message: format!("Output schema: {}", CONTROL_FRAME_VERSION),
    });

    // Check configuration file if provided
    if let Some(config_path) = config {
        if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(content) => match EngineConfig::from_json(&content) {
                    Ok(config) => {
                        checks.push(DoctorCheck {
                            name: "config".to_string(),
                            status: CheckStatus::Ok,
                            message: format!(
                                "Configuration valid (threshold {}, window {}, smoothing {})",
                                config.step_detector.step_threshold,
                                config.cadence.window,
                                config.cadence.smoothing
                            ),
                        });
                    }
                    Err(e) => {
                        checks.push(DoctorCheck {
                            name: "config".to_string(),
                            status: CheckStatus::Error,
                            message: format!("Invalid configuration: {}", e),
                        });
                    }
                },
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Cannot read configuration file: {}", e),
                    });
                }
            }
        } else {
            checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Configuration file does not exist".to_string(),
            });
        }
    } else {
        checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: "Using default tuning".to_string(),
        });
    }

    // Check stdin is available (for streaming mode)
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
            message: "stdin is a pipe (streaming mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: PULSE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Pulse Doctor Report");
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
        Err(PulseCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), PulseCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", SENSOR_EVENT_VERSION);
                println!();
                println!("NDJSON stream of tagged sensor events, three types:");
                println!();
                println!("1. motion - Per-axis acceleration including gravity");
                println!("   {{\"type\":\"motion\",\"t_ms\":1000,\"x\":0.2,\"y\":9.8,\"z\":1.1}}");
                println!("   Axes are optional; a missing axis reads as 0.0");
                println!();
                println!("2. heart_rate - Decoded heart rate reading");
                println!("   {{\"type\":\"heart_rate\",\"t_ms\":2000,\"bpm\":96}}");
                println!("   Implausible values are clamped downstream, not rejected");
                println!();
                println!("3. heart_rate_frame - Raw measurement characteristic bytes");
                println!("   {{\"type\":\"heart_rate_frame\",\"t_ms\":2000,\"bytes\":[0,72]}}");
                println!("   Flags bit 0 selects u8 or u16 little-endian value format");
                println!();
                println!("Timestamps are milliseconds and must not decrease per stream.");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: {}", CONTROL_FRAME_VERSION);
                println!();
                println!("One JSON frame per tick:");
                println!();
                println!("- schema_version: {}", CONTROL_FRAME_VERSION);
                println!("- producer: {{ name, version, instance_id }}");
                println!("- seq: Frame sequence number (gap detection)");
                println!("- t_ms: Event time of the tick");
                println!("- emitted_at_utc: Wall-clock emission time (RFC 3339)");
                println!("- signal:");
                println!("  - tempo_bpm: Musical tempo tracking cadence");
                println!("  - timbre: calm | clear | sharp");
                println!("  - waveform: sine | triangle | sawtooth");
                println!("  - brightness_hz: Filter cutoff frequency");
                println!("  - intensity: Normalized exertion (0.0 to 1.0)");
                println!("  - heart_rate_bpm: Most recent clamped reading");
            }
        }
    }

    Ok(())
}

// Helper functions

fn format_output(frames: &[ControlFrame], format: &OutputFormat) -> Result<String, PulseCliError> {
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
        "$id": "https://synheart.ai/schemas/pulse.sensor_event.v1.json",
        "title": "pulse.sensor_event.v1",
        "description": "Synheart Pulse sensor event schema",
        "type": "object",
        "required": ["type", "t_ms"],
        "properties": {
            "type": {
                "type": "string",
                "enum": ["motion", "heart_rate", "heart_rate_frame"]
            },
            "t_ms": { "type": "integer", "minimum": 0 },
            "x": { "type": "number" },
            "y": { "type": "number" },
            "z": { "type": "number" },
            "bpm": { "type": "integer", "minimum": 0 },
            "bytes": {
                "type": "array",
                "items": { "type": "integer", "minimum": 0, "maximum": 255 }
            }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://synheart.ai/schemas/pulse.control_frame.v1.json",
        "title": "pulse.control_frame.v1",
        "description": "Synheart Pulse control frame schema",
        "type": "object",
        "required": ["schema_version", "producer", "seq", "t_ms", "emitted_at_utc", "signal"],
        "properties": {
            "schema_version": {
                "type": "string",
                "const": "pulse.control_frame.v1"
            },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "seq": { "type": "integer", "minimum": 0 },
            "t_ms": { "type": "integer", "minimum": 0 },
            "emitted_at_utc": { "type": "string", "format": "date-time" },
            "signal": {
                "type": "object",
                "required": ["tempo_bpm", "timbre", "waveform", "brightness_hz", "intensity", "heart_rate_bpm"],
                "properties": {
                    "tempo_bpm": { "type": "number" },
                    "timbre": { "type": "string", "enum": ["calm", "clear", "sharp"] },
                    "waveform": { "type": "string", "enum": ["sine", "triangle", "sawtooth"] },
                    "brightness_hz": { "type": "number" },
                    "intensity": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                    "heart_rate_bpm": { "type": "integer" }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum PulseCliError {
    Io(io::Error),
    Pulse(PulseError),
    Json(serde_json::Error),
    NoEvents,
    ValidationFailed(usize),
    DoctorFailed,
    ParseError(String),
}

impl From<io::Error> for PulseCliError {
    fn from(e: io::Error) -> Self {
        PulseCliError::Io(e)
    }
}

impl From<PulseError> for PulseCliError {
    fn from(e: PulseError) -> Self {
        PulseCliError::Pulse(e)
    }
}

impl From<serde_json::Error> for PulseCliError {
    fn from(e: serde_json::Error) -> Self {
        PulseCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<PulseCliError> for CliError {
    fn from(e: PulseCliError) -> Self {
        match e {
            PulseCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            PulseCliError::Pulse(e) => {
                let (code, hint) = match &e {
                    PulseError::InvalidConfig(_) => (
                        "CONFIG_ERROR",
                        "Check tuning flags and the configuration file",
                    ),
                    PulseError::FrameDecodeError(_) => (
                        "FRAME_ERROR",
                        "Check heart rate frame bytes against the measurement format",
                    ),
                    _ => ("PROCESS_ERROR", "Ensure input matches pulse.sensor_event.v1"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            PulseCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            PulseCliError::NoEvents => CliError {
                code: "NO_EVENTS".to_string(),
                message: "No events found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            PulseCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} events failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            PulseCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            PulseCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_events: usize,
    valid_events: usize,
    invalid_events: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    t_ms: u64,
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
