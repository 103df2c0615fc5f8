use std::{
    fs,
    io::{
        self,
        BufRead,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
    process::ExitCode,
};

use clap::{
    Parser,
    Subcommand,
};
use lexy::{
    charset::{
        scripts_for_language,
        supported_languages,
    },
    core::logging::init_logger,
    CharacterFilter,
    CharsetJob,
    CharsetRequest,
    Course,
    CourseLibrary,
    ImportOutcome,
    LexyError,
    SettingsData,
};

/// Build, share and study language courses packaged as `.lexy` files
#[derive(Parser)]
#[command(name = "lexy")]
#[command(version)]
#[command(about = "Lexy course packages and script tools", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package a course as `<language>_bundle.lexy`
    Export {
        /// Course JSON file, or the id of a course in the library
        course: String,

        /// Output directory (default: current directory)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Import a `.lexy` package into the library
    Import {
        file: PathBuf,

        /// Overwrite an existing course without asking
        #[arg(long, short)]
        yes: bool,
    },

    /// List courses in the library
    List,

    /// Print the characters of a language's writing system
    Charset {
        language: String,

        /// any, letters, letters-and-marks or letters-and-digits
        #[arg(long)]
        filter: Option<CharacterFilter>,

        /// Maximum number of characters
        #[arg(long)]
        max: Option<usize>,
    },

    /// List languages known to the character generator
    Languages,
}

fn load_course(source: &str) -> Result<Course, LexyError> {
    let path = Path::new(source);
    if path.is_file() {
        let content = fs::read_to_string(path)?;
        let mut course: Course =
            serde_json::from_str(&content).map_err(|e| LexyError::parse(source, e))?;
        course.finalize()?;
        return Ok(course);
    }

    let library = CourseLibrary::open_default()?;
    library.get(source).cloned().ok_or_else(|| LexyError::NotFound(source.to_string()))
}

fn prompt_overwrite(existing: &Course, incoming: &Course) -> bool {
    eprint!(
        "A course for '{}' already exists ({} dictionary entries). Replace it with '{}' ({} entries)? [y/N] ",
        existing.id,
        existing.dictionary.len(),
        incoming.course_title,
        incoming.dictionary.len()
    );
    let _ = io::stderr().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn run(command: Commands) -> Result<(), LexyError> {
    let settings = SettingsData::load();

    match command {
        Commands::Export { course, out } => {
            let course = load_course(&course)?;
            let out = out.unwrap_or_else(|| PathBuf::from("."));
            let path = lexy::package::export_to_dir(&course, &settings.export_options(), &out)?;
            println!("{}", path.display());
        }
        Commands::Import { file, yes } => {
            let mut library = CourseLibrary::open_default()?;
            let outcome = if yes {
                library.import_file(&file, |_: &Course, _: &Course| true)?
            } else {
                library.import_file(&file, prompt_overwrite)?
            };

            match outcome {
                ImportOutcome::Added(id) => println!("Imported '{}'", id),
                ImportOutcome::Replaced(id) => println!("Replaced '{}'", id),
                ImportOutcome::Cancelled(id) => println!("Kept existing '{}'", id),
            }
        }
        Commands::List => {
            let library = CourseLibrary::open_default()?;
            if library.is_empty() {
                println!("No courses yet");
            }
            for course in library.courses() {
                println!(
                    "{}\t{}\t{} units, {} words",
                    course.id,
                    course.course_title,
                    course.units.len(),
                    course.dictionary.len()
                );
            }
        }
        Commands::Charset { language, filter, max } => {
            if scripts_for_language(&language).is_empty() {
                tracing::warn!("No scripts configured for '{}'", language);
            }

            let request = CharsetRequest::new(
                language,
                filter.unwrap_or(settings.character_filter),
                max.unwrap_or(settings.character_limit),
            );
            let characters = CharsetJob::spawn(request)?.wait_with_progress(|percent| {
                eprint!("\rScanning... {:>3}%", percent);
            })?;
            eprintln!();

            let line: String = characters.iter().collect();
            println!("{}", line);
        }
        Commands::Languages => {
            for language in supported_languages() {
                let scripts: Vec<&str> = scripts_for_language(language).iter().map(|s| s.name).collect();
                println!("{}\t{}", language, scripts.join(", "));
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_soft() => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
