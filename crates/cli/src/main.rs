use clap::{Parser, Subcommand};
use ppr_core::config::database_path_from_env_value;
use ppr_core::{
    ClassificationError, Database, QuestionnaireService, ReferenceData, StationService,
    SubmissionService, SystemClock,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ppr")]
#[command(about = "PPR patient classification CLI")]
struct Cli {
    /// SQLite database file (defaults to $PPR_DATABASE_PATH, then ppr.sqlite3)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and apply migrations
    Init,
    /// Import fields, categories, options, stations, patients and transfers from YAML
    Import {
        /// Reference data file
        file: PathBuf,
    },
    /// List all stations
    Stations,
    /// List the patients on a station
    Patients {
        /// Station id
        station_id: i64,
    },
    /// Print today's questionnaire for a patient as JSON
    Questions {
        /// Patient id
        patient_id: i64,
    },
    /// Submit today's classification for a patient from a JSON file
    Submit {
        /// Patient id
        patient_id: i64,
        /// JSON file with the submission body
        file: PathBuf,
    },
}

fn open_database(db: Option<PathBuf>) -> Result<Database, ClassificationError> {
    let path = db.unwrap_or_else(|| {
        database_path_from_env_value(std::env::var("PPR_DATABASE_PATH").ok())
    });
    Database::open(&path)
}

fn read_submission(file: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&raw)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'ppr --help' for commands");
        return Ok(());
    };

    let db = open_database(cli.db)?;
    let clock = Arc::new(SystemClock);

    match command {
        Commands::Init => {
            println!("Database ready.");
        }
        Commands::Import { file } => {
            match ReferenceData::from_file(&file).and_then(|data| data.import(&db)) {
                Ok(summary) => println!(
                    "Imported {} options, {} stations, {} patients, {} transfers",
                    summary.options, summary.stations, summary.patients, summary.transfers
                ),
                Err(e) => eprintln!("Error importing {}: {}", file.display(), e),
            }
        }
        Commands::Stations => {
            let stations = StationService::new(db, clock).list_stations()?.stations;
            if stations.is_empty() {
                println!("No stations found.");
            } else {
                for station in stations {
                    println!("ID: {}, Name: {}", station.id, station.name);
                }
            }
        }
        Commands::Patients { station_id } => {
            match StationService::new(db, clock).station_patients(station_id) {
                Ok(res) if res.patients.is_empty() => println!("No patients found."),
                Ok(res) => {
                    for patient in res.patients {
                        println!(
                            "ID: {}, Name: {} {}, Classified today: {}",
                            patient.id,
                            patient.first_name,
                            patient.last_name,
                            if patient.daily_today { "yes" } else { "no" }
                        );
                    }
                }
                Err(e) => eprintln!("Error listing patients: {}", e),
            }
        }
        Commands::Questions { patient_id } => {
            let questions = QuestionnaireService::new(db, clock).questions(patient_id)?;
            println!("{}", serde_json::to_string_pretty(&questions)?);
        }
        Commands::Submit { patient_id, file } => {
            let body = read_submission(&file)?;
            match SubmissionService::new(db, clock).submit_json(patient_id, &body) {
                Ok(id) => println!("Stored classification {} for patient {}", id, patient_id),
                Err(e) => eprintln!("Error submitting classification: {}", e),
            }
        }
    }

    Ok(())
}
