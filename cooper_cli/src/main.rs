use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use cooper_core::format::{format_distance, format_duration, initials};
use cooper_core::history::previous_test;
use cooper_core::measurement::parse_number;
use cooper_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cooper")]
#[command(about = "Cooper test performance evaluations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output language (pt-BR, en)
    #[arg(long, global = true)]
    locale: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the student roster
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Evaluate a Cooper test and record it
    Evaluate {
        /// Student id or name
        #[arg(long)]
        student: String,

        /// Distance covered in meters
        #[arg(long)]
        distance: String,

        /// Duration in seconds
        #[arg(long)]
        duration: Option<String>,

        /// Heart rate in bpm (defaults to the previous test)
        #[arg(long)]
        heart_rate: Option<String>,

        /// Weight in kg (defaults to the previous test)
        #[arg(long)]
        weight: Option<String>,

        /// Ambient temperature in °C
        #[arg(long)]
        temperature: Option<String>,

        /// Ambient humidity in %
        #[arg(long)]
        humidity: Option<String>,

        /// Free-text observations
        #[arg(long)]
        observations: Option<String>,

        /// Evaluation date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Show metrics without recording the test
        #[arg(long)]
        dry_run: bool,
    },

    /// List a student's past tests
    History {
        /// Student id or name
        #[arg(long)]
        student: String,
    },

    /// Export all tests to CSV
    Export {
        /// CSV path (defaults to <data-dir>/tests.csv)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum StudentAction {
    /// Add a student
    Add {
        #[arg(long)]
        name: String,

        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: NaiveDate,

        /// Gender label (masculino, feminino, male, female, ...)
        #[arg(long)]
        gender: String,
    },

    /// List students
    List {
        /// Include inactive students
        #[arg(long)]
        all: bool,
    },

    /// Toggle a student between active and inactive
    Toggle {
        /// Student id or name
        student: String,
    },
}

/// Paths of the files kept under the data directory
struct DataPaths {
    roster: PathBuf,
    tests: PathBuf,
    csv: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        Self {
            roster: data_dir.join("students.json"),
            tests: data_dir.join("tests.jsonl"),
            csv: data_dir.join("tests.csv"),
        }
    }
}

fn main() -> Result<()> {
    cooper_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);
    tracing::debug!("Using data directory {:?}", data_dir);

    let locale = match cli.locale.as_deref() {
        Some(tag) => Locale::parse(tag)
            .ok_or_else(|| Error::Config(format!("Unknown locale: {}", tag)))?,
        None => config.display.locale,
    };

    match cli.command {
        Commands::Student { action } => cmd_student(&paths, action, locale),
        Commands::Evaluate {
            student,
            distance,
            duration,
            heart_rate,
            weight,
            temperature,
            humidity,
            observations,
            date,
            dry_run,
        } => {
            let inputs = EvaluateInputs {
                distance,
                duration,
                heart_rate,
                weight,
                temperature,
                humidity,
                observations,
            };
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            cmd_evaluate(&paths, &config, &student, inputs, date, dry_run, locale)
        }
        Commands::History { student } => cmd_history(&paths, &student, locale),
        Commands::Export { output } => cmd_export(&paths, output),
    }
}

fn cmd_student(paths: &DataPaths, action: StudentAction, locale: Locale) -> Result<()> {
    match action {
        StudentAction::Add {
            name,
            birth_date,
            gender,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::Other("Student name must not be empty".into()));
            }
            let student = Student::new(name, birth_date, Gender::from_label(&gender));
            let display_name = student.name.clone();
            let id = Roster::update(&paths.roster, |roster| Ok(roster.add(student)))?;
            println!("✓ Added student {} ({})", display_name, id);
        }

        StudentAction::List { all } => {
            let roster = Roster::load(&paths.roster)?;
            let today = Local::now().date_naive();
            let students = if all { roster.all() } else { roster.active() };

            if students.is_empty() {
                println!("No students found.");
                return Ok(());
            }

            for s in students {
                let age = cooper_core::calculator::age_on(s.birth_date, today);
                let status = if s.is_active { "" } else { " [inactive]" };
                println!(
                    "  [{}] {} - {} years, {}{}  ({})",
                    initials(&s.name),
                    s.name,
                    age,
                    s.gender.label(locale),
                    status,
                    s.id
                );
            }
        }

        StudentAction::Toggle { student } => {
            let active = Roster::update(&paths.roster, |roster| {
                let id = roster.find(&student)?.id;
                roster.toggle_active(id)
            })?;
            println!(
                "✓ Student is now {}",
                if active { "active" } else { "inactive" }
            );
        }
    }

    Ok(())
}

/// Values given on the command line; `None` keeps the form's value
struct EvaluateInputs {
    distance: String,
    duration: Option<String>,
    heart_rate: Option<String>,
    weight: Option<String>,
    temperature: Option<String>,
    humidity: Option<String>,
    observations: Option<String>,
}

fn cmd_evaluate(
    paths: &DataPaths,
    config: &Config,
    query: &str,
    inputs: EvaluateInputs,
    date: NaiveDate,
    dry_run: bool,
    locale: Locale,
) -> Result<()> {
    let roster = Roster::load(&paths.roster)?;
    let student = roster.find(query)?.clone();

    let history = read_records_for(&paths.tests, student.id)?;
    let mut form = EvaluationForm::new(student, date, &config.evaluation);

    if let Some(previous) = previous_test(&history, form.student().id) {
        form.prefill_from(previous);
    }

    form.set(Field::Distance, inputs.distance);
    let optional = [
        (Field::Duration, inputs.duration),
        (Field::HeartRate, inputs.heart_rate),
        (Field::Weight, inputs.weight),
        (Field::Temperature, inputs.temperature),
        (Field::Humidity, inputs.humidity),
        (Field::Observations, inputs.observations),
    ];
    for (field, value) in optional {
        if let Some(value) = value {
            form.set(field, value);
        }
    }

    if !form.validate() {
        eprintln!("Invalid evaluation input:");
        for message in form.errors().messages(locale) {
            eprintln!("  - {}", message);
        }
        return Err(Error::Validation(form.errors().to_string()));
    }

    if let Some(metrics) = form.metrics() {
        display_metrics(&form, metrics, locale);
    }

    if dry_run {
        println!("\n[Dry run - not recording test]");
        return Ok(());
    }

    let mut sink = JsonlSink::new(&paths.tests);
    let record = form.submit(&mut sink, Utc::now())?;
    println!("\n✓ Test recorded ({})", record.id);
    Ok(())
}

fn display_metrics(form: &EvaluationForm, metrics: &DerivedMetrics, locale: Locale) {
    let student = form.student();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", TestType::Performance.label(locale));
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  {} - {} years, {}",
        student.name,
        metrics.age,
        student.gender.label(locale)
    );
    println!(
        "  {} in {}",
        format_distance(parse_number(form.get(Field::Distance)).unwrap_or(0.0), locale),
        format_duration(parse_number(form.get(Field::Duration)).unwrap_or(0.0))
    );
    println!();
    println!("  VO2 max:        {:.1} ml/kg/min", metrics.vo2_max);
    println!("  Classification: {}", metrics.classification.label(locale));
    println!("  Calories:       {} kcal", metrics.calories_burned);
    println!("  Oxygen:         {} ml/min", metrics.oxygen_consumption);
    println!();
    println!(
        "  Training zones (max HR {} bpm):",
        metrics.training_intensity.max_heart_rate
    );
    for zone in &metrics.training_intensity.zones {
        println!(
            "    {:<22} {}-{} bpm",
            zone.kind.label(locale),
            zone.min_bpm,
            zone.max_bpm
        );
    }
}

fn cmd_history(paths: &DataPaths, query: &str, locale: Locale) -> Result<()> {
    let roster = Roster::load(&paths.roster)?;
    let student = roster.find(query)?;
    let history = read_records_for(&paths.tests, student.id)?;

    if history.is_empty() {
        println!("No tests recorded for {}.", student.name);
        return Ok(());
    }

    println!("Tests for {}:", student.name);
    for record in &history {
        println!(
            "  {}  {}  {} in {}  VO2 max {:.1}  {}",
            record.test_date.date_naive().format("%Y-%m-%d"),
            record.test_type.label(locale),
            format_distance(record.distance, locale),
            format_duration(record.duration),
            record.vo2_max,
            record.classification.label(locale)
        );
        if !record.observations.is_empty() {
            println!("      {}", record.observations);
        }
    }

    Ok(())
}

fn cmd_export(paths: &DataPaths, output: Option<PathBuf>) -> Result<()> {
    let records = read_records(&paths.tests)?;
    if records.is_empty() {
        println!("No tests recorded - nothing to export.");
        return Ok(());
    }

    let csv_path = output.unwrap_or_else(|| paths.csv.clone());
    let count = cooper_core::csv_export::export_records(&records, &csv_path)?;

    println!("✓ Exported {} tests to CSV", count);
    println!("  CSV: {}", csv_path.display());
    Ok(())
}
