use anyhow::Context;
use clap::Parser;
use shelter_booking::adapters::roster::{self, Roster};
use shelter_booking::config::Command;
use shelter_booking::utils::error::ErrorSeverity;
use shelter_booking::utils::{logger, validation::Validate};
use shelter_booking::{CliConfig, Shelter, ShelterConfig, ShelterError};
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Starting shelter CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let (config, base_dir) = load_config(cli.config.as_deref())?;

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let roster = match roster::load_roster(&config.roster, &base_dir) {
        Ok(roster) => roster,
        Err(e) => exit_with(&e),
    };

    match cli.command {
        Command::Check => run_check(&roster, cli.json)?,
        Command::Roster => {
            let shelter = Shelter::from_roster(&config, roster);
            run_roster(&shelter, cli.json)?;
        }
        Command::Slots { count, days } => {
            let shelter = Shelter::from_roster(&config, roster);
            let today = chrono::Local::now().date_naive();
            let horizon = days.unwrap_or(config.booking.max_days_ahead);
            let slots = shelter.visits().next_available_slots(count, today, horizon);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else if slots.is_empty() {
                println!("No available slots in the next {} days.", horizon);
            } else {
                println!("--- Available slots (next {} days) ---", horizon);
                for (i, slot) in slots.iter().enumerate() {
                    println!("{}. {}", i + 1, slot);
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> anyhow::Result<(ShelterConfig, PathBuf)> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            let config = ShelterConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?;
            let base_dir = Path::new(path)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            Ok((config, base_dir))
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Ok((ShelterConfig::default(), PathBuf::from(".")))
        }
    }
}

fn run_check(roster: &Roster, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&roster.reports)?);
        return Ok(());
    }
    for report in &roster.reports {
        println!(
            "{}: {} loaded, {} skipped",
            report.source,
            report.loaded,
            report.skipped.len()
        );
        for reason in &report.skipped {
            println!("  - {}", reason);
        }
    }
    Ok(())
}

fn run_roster(shelter: &Shelter, json: bool) -> anyhow::Result<()> {
    let summary = shelter.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Adoptable animals: {}", summary.adoptable);
    for species in shelter.adoptions().available_species() {
        println!("  - {}", species);
    }
    println!("Authorized donors: {}", summary.authorized_donors);
    println!(
        "Staff: {} ({} veterinarians)",
        shelter.staff().len(),
        shelter.veterinarians().count()
    );
    Ok(())
}

fn exit_with(e: &ShelterError) -> ! {
    tracing::error!(
        "Request failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
