//! # Pleat CLI
//!
//! Terminal front end for curtain measurement and quotation. Each screen of
//! the workflow (project list, new project, project detail) is a subcommand;
//! all pricing and storage happens in `quote_core`.

mod config;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quote_core::pricing::pieces_from_width;
use quote_core::project::{CurtainType, Measurement, MeasurementDraft, Project, ProjectDraft, ProjectPatch, RecordId};
use quote_core::quotation::{render_html, render_pdf, Quotation, QuotationOptions, CURRENCY_SYMBOL};
use quote_core::store::{FileMedium, ProjectStore};
use quote_core::QuoteError;

use crate::config::{Config, DATA_DIR_ENV, USER_ENV};

/// Curtain measurement and quotation tool.
#[derive(Parser, Debug)]
#[command(name = "pleat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the project store
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Operator name recorded in lock files
    #[arg(long, global = true, env = USER_ENV)]
    user: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List projects, newest first
    List,
    /// Show totals across all projects
    Stats,
    /// Create a project
    New(NewProjectArgs),
    /// Show one project with its measurements and totals
    Show { id: RecordId },
    /// Change project fields; only the flags given are changed
    Update(UpdateProjectArgs),
    /// Delete a project and all its measurements
    Delete {
        id: RecordId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Add a measurement to a project
    Add(AddMeasurementArgs),
    /// Remove a measurement from a project
    Remove {
        project_id: RecordId,
        measurement_id: RecordId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Piece count the width table gives for a width in inches
    Pieces { width_inches: f64 },
    /// Export a printable quotation
    Quote(QuoteArgs),
}

#[derive(Args, Debug)]
struct NewProjectArgs {
    #[arg(long)]
    client: String,
    #[arg(long)]
    phone: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    title: String,
    /// Rod installation rate per rod unit (12 in)
    #[arg(long)]
    rod_rate: Option<f64>,
}

#[derive(Args, Debug)]
struct UpdateProjectArgs {
    id: RecordId,
    #[arg(long)]
    client: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long, conflicts_with = "clear_rod_rate")]
    rod_rate: Option<f64>,
    /// Remove the rod rate
    #[arg(long)]
    clear_rod_rate: bool,
}

#[derive(Args, Debug)]
struct AddMeasurementArgs {
    project_id: RecordId,
    /// Room or window label
    #[arg(long)]
    room: String,
    #[arg(long)]
    width: f64,
    #[arg(long)]
    height: f64,
    /// Piece count; derived from the width when omitted
    #[arg(long)]
    pieces: Option<f64>,
    /// Eyelet, Pleated or "Rod Pocket"
    #[arg(long = "type", default_value = "Eyelet", value_parser = parse_curtain_type)]
    curtain_type: CurtainType,
    /// Cloth rate per metre
    #[arg(long)]
    cloth_rate: f64,
    /// Stitching cost per piece
    #[arg(long)]
    stitching: f64,
}

#[derive(Args, Debug)]
struct QuoteArgs {
    id: RecordId,
    /// Output file; defaults to quotation-<quote number>.html/.pdf
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Write PDF instead of HTML
    #[arg(long)]
    pdf: bool,
    #[arg(long)]
    business_name: Option<String>,
    #[arg(long)]
    business_details: Option<String>,
}

fn parse_curtain_type(s: &str) -> Result<CurtainType, String> {
    CurtainType::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = CurtainType::ALL.iter().map(|t| t.display_name()).collect();
        format!("unknown curtain type '{}' (expected one of: {})", s, names.join(", "))
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(quote_error) = e.downcast_ref::<QuoteError>() {
                if quote_error.is_recoverable() {
                    eprintln!("The store could not be written. Please try again.");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.data_dir, cli.user);
    tracing::debug!(data_dir = %config.data_dir.display(), user = %config.user, "resolved config");

    let medium = FileMedium::open(config.data_dir(), config.user.clone())?;
    let mut store = ProjectStore::new(medium);
    let json = cli.json;

    match cli.command {
        Commands::List => {
            let summaries = store.summaries()?;
            if json {
                return print_json(&summaries);
            }
            if summaries.is_empty() {
                println!("No projects yet. Create one with `pleat new`.");
            }
            for s in &summaries {
                println!(
                    "{}  {:<28} {:<20} {:>3} rows {:>8.1} m  {}{:.2}",
                    s.id,
                    s.title,
                    s.client_name,
                    s.measurement_count,
                    s.total_meters,
                    CURRENCY_SYMBOL,
                    s.total_cost
                );
            }
        }
        Commands::Stats => {
            let stats = store.dashboard()?;
            if json {
                return print_json(&stats);
            }
            println!("Projects:      {}", stats.project_count);
            println!("Measurements:  {}", stats.measurement_count);
            println!("Quoted value:  {}{:.2}", CURRENCY_SYMBOL, stats.total_value);
        }
        Commands::New(args) => {
            let mut draft = ProjectDraft::new(args.client, args.phone)
                .with_address(args.address)
                .with_title(args.title);
            draft.rod_rate_per_length = args.rod_rate;
            let project = store.create(draft)?;
            if json {
                return print_json(&project);
            }
            println!("Created project {} for {}", project.id, project.client_name);
        }
        Commands::Show { id } => {
            let project = store.require(&id)?;
            if json {
                return print_json(&project);
            }
            print_project(&project);
        }
        Commands::Update(args) => {
            let patch = ProjectPatch {
                client_name: args.client,
                phone_number: args.phone,
                address: args.address,
                project_title: args.title,
                rod_rate_per_length: if args.clear_rod_rate {
                    Some(None)
                } else {
                    args.rod_rate.map(Some)
                },
                measurements: None,
            };
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field flag");
            }
            let project = store.update(&args.id, patch)?;
            if json {
                return print_json(&project);
            }
            println!("Updated project {}", project.id);
        }
        Commands::Delete { id, yes } => {
            let Some(project) = store.get(&id)? else {
                println!("No project {}", id);
                return Ok(());
            };
            let prompt = format!(
                "Delete project '{}' and its {} measurement(s)? This cannot be undone.",
                project.display_title(),
                project.measurements.len()
            );
            if !yes && !confirm(&prompt)? {
                println!("Cancelled.");
                return Ok(());
            }
            store.delete(&id)?;
            println!("Deleted project {}", id);
        }
        Commands::Add(args) => {
            let mut draft = MeasurementDraft::new(args.room, args.width, args.height, args.cloth_rate, args.stitching)
                .with_curtain_type(args.curtain_type);
            draft.pieces = args.pieces;
            let measurement = store.add_measurement(&args.project_id, draft)?;
            if json {
                return print_json(&measurement);
            }
            println!(
                "Added {} ({} pieces): {} m, {}{}",
                measurement.room_label, measurement.pieces, measurement.total_meters, CURRENCY_SYMBOL, measurement.total_cost
            );
        }
        Commands::Remove {
            project_id,
            measurement_id,
            yes,
        } => {
            let removed = remove_measurement(&mut store, &project_id, &measurement_id, |prompt| {
                Ok(yes || confirm(prompt)?)
            })?;
            match removed {
                Some(m) => println!("Removed measurement '{}'", m.room_label),
                None => println!("Cancelled."),
            }
        }
        Commands::Pieces { width_inches } => {
            let pieces = pieces_from_width(width_inches);
            if json {
                return print_json(&serde_json::json!({ "widthInches": width_inches, "pieces": pieces }));
            }
            println!("{} in -> {} pieces", width_inches, pieces);
        }
        Commands::Quote(args) => export_quote(&store, args)?,
    }

    Ok(())
}

/// Remove a measurement after confirmation. Both ids are resolved before the
/// operator is asked, so an unknown id fails without a prompt. Returns `None`
/// when the operator declines.
fn remove_measurement<F>(
    store: &mut ProjectStore<FileMedium>,
    project_id: &RecordId,
    measurement_id: &RecordId,
    confirm: F,
) -> Result<Option<Measurement>>
where
    F: FnOnce(&str) -> Result<bool>,
{
    let project = store.require(project_id)?;
    let measurement = project
        .get_measurement(measurement_id)
        .ok_or_else(|| QuoteError::measurement_not_found(measurement_id))?;

    let prompt = format!(
        "Delete measurement '{}' from '{}'?",
        measurement.room_label,
        project.display_title()
    );
    if !confirm(&prompt)? {
        return Ok(None);
    }
    Ok(Some(store.remove_measurement(project_id, measurement_id)?))
}

fn export_quote(store: &ProjectStore<FileMedium>, args: QuoteArgs) -> Result<()> {
    let project = store.require(&args.id)?;

    let mut options = QuotationOptions::default();
    if let Some(name) = args.business_name {
        options.business_name = name;
    }
    if let Some(details) = args.business_details {
        options.business_details = details;
    }

    let quote = Quotation::new(&project, &project.measurements, options);
    let extension = if args.pdf { "pdf" } else { "html" };
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("quotation-{}.{}", quote.quote_number, extension)));

    let bytes = if args.pdf {
        render_pdf(&quote)?
    } else {
        render_html(&quote).into_bytes()
    };
    std::fs::write(&out, bytes).with_context(|| format!("Failed to write {}", out.display()))?;

    tracing::info!(quote = %quote.quote_number, path = %out.display(), "exported quotation");
    println!(
        "Quotation {} written to {} (grand total {}{:.2})",
        quote.quote_number,
        out.display(),
        CURRENCY_SYMBOL,
        quote.summary.grand_total
    );
    Ok(())
}

fn print_project(project: &Project) {
    println!("{}", project.display_title());
    println!("  Client:  {}", project.client_name);
    println!("  Phone:   {}", project.phone_number);
    if !project.address.is_empty() {
        println!("  Address: {}", project.address);
    }
    println!("  Created: {}", project.created_at.format("%d/%m/%Y"));
    println!("  Id:      {}", project.id);
    println!();

    if project.measurements.is_empty() {
        println!("  No measurements yet. Add one with `pleat add {}`.", project.id);
        return;
    }

    println!(
        "  {:<36}  {:<20} {:>7} {:>7} {:>6} {:>8} {:<11} {:>10}",
        "Measurement", "Room", "Width", "Height", "Pcs", "Meters", "Type", "Total"
    );
    for m in &project.measurements {
        println!(
            "  {:<36}  {:<20} {:>7} {:>7} {:>6} {:>8} {:<11} {:>10}",
            m.id, m.room_label, m.width_inches, m.height_inches, m.pieces, m.total_meters, m.curtain_type, m.total_cost
        );
    }

    let totals = project.totals();
    println!();
    println!("  Total cloth:     {:.2} m", totals.total_meters);
    println!("  Curtain total:   {}{:.2}", CURRENCY_SYMBOL, totals.total_cost);
    println!("  Rod length:      {:.2} units ({:.1} in)", totals.rod_length, totals.total_width_inches);
    if totals.rod_cost > 0.0 {
        println!("  Rod cost:        {}{:.2}", CURRENCY_SYMBOL, totals.rod_cost);
    }
    println!("  Grand total:     {}{:.2}", CURRENCY_SYMBOL, totals.grand_total);
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Ask a yes/no question on stdin; anything but y/yes is a no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from([
            "pleat",
            "add",
            "lx3k2ab9q7f",
            "--room",
            "Bedroom",
            "--width",
            "30",
            "--height",
            "60",
            "--type",
            "rod pocket",
            "--cloth-rate",
            "100",
            "--stitching",
            "50",
        ])
        .unwrap();
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.project_id, RecordId::from("lx3k2ab9q7f"));
                assert_eq!(args.curtain_type, CurtainType::RodPocket);
                assert_eq!(args.pieces, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_curtain_type() {
        let result = Cli::try_parse_from([
            "pleat",
            "add",
            &RecordId::new().to_string(),
            "--room",
            "R",
            "--width",
            "30",
            "--height",
            "60",
            "--type",
            "roman",
            "--cloth-rate",
            "1",
            "--stitching",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_update_rod_rate_conflicts_with_clear() {
        let id = RecordId::new().to_string();
        let result = Cli::try_parse_from(["pleat", "update", &id, "--rod-rate", "5", "--clear-rod-rate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pleat", "list", "--json", "--data-dir", "/tmp/x"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_export_quote_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProjectStore::new(FileMedium::open(dir.path(), "test").unwrap());
        let project = store.create(ProjectDraft::new("A", "123")).unwrap();
        store
            .add_measurement(&project.id, MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0))
            .unwrap();

        let out = dir.path().join("q.html");
        export_quote(
            &store,
            QuoteArgs {
                id: project.id,
                out: Some(out.clone()),
                pdf: false,
                business_name: Some("Test Drapes".to_string()),
                business_details: None,
            },
        )
        .unwrap();

        let html = std::fs::read_to_string(out).unwrap();
        assert!(html.contains("Test Drapes"));
        assert!(html.contains("R1"));
    }

    #[test]
    fn test_remove_unknown_measurement_fails_before_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProjectStore::new(FileMedium::open(dir.path(), "test").unwrap());
        let project = store.create(ProjectDraft::new("A", "123")).unwrap();

        let mut asked = false;
        let err = remove_measurement(&mut store, &project.id, &RecordId::from("1740823200000"), |_| {
            asked = true;
            Ok(true)
        })
        .unwrap_err();
        assert!(!asked);
        let err = err.downcast::<QuoteError>().unwrap();
        assert!(err.is_not_found());

        let err = remove_measurement(&mut store, &RecordId::new(), &RecordId::new(), |_| Ok(true)).unwrap_err();
        assert!(err.downcast::<QuoteError>().unwrap().is_not_found());
    }

    #[test]
    fn test_remove_measurement_respects_declined_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProjectStore::new(FileMedium::open(dir.path(), "test").unwrap());
        let project = store.create(ProjectDraft::new("A", "123")).unwrap();
        let m = store
            .add_measurement(&project.id, MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0))
            .unwrap();

        let declined = remove_measurement(&mut store, &project.id, &m.id, |prompt| {
            assert!(prompt.contains("R1"));
            Ok(false)
        })
        .unwrap();
        assert!(declined.is_none());
        assert_eq!(store.require(&project.id).unwrap().measurements.len(), 1);

        let removed = remove_measurement(&mut store, &project.id, &m.id, |_| Ok(true)).unwrap();
        assert_eq!(removed.map(|r| r.id), Some(m.id));
        assert!(store.require(&project.id).unwrap().measurements.is_empty());
    }
}
