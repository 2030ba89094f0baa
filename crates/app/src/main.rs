use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use dotenv::dotenv;
use quiz_core::{Clock, Difficulty};
use services::{ChatQuizGenerator, Phase, QuizSessionService, SessionController};
use storage::Storage;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidArchive { raw: String },
    InvalidDifficulty { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidArchive { raw } => {
                write!(f, "invalid --archive value: {raw} (expected fs, sqlite or memory)")
            }
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw} (expected Easy, Good or Hardcore)")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    quiz_sessions: Arc<QuizSessionService>,
}

impl UiApp for DesktopApp {
    fn quiz_sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz_sessions)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [archive flags]");
    eprintln!("  cargo run -p app -- play [--subject <text>] [--difficulty Easy|Good|Hardcore]");
    eprintln!("                           [archive flags]");
    eprintln!();
    eprintln!("Archive flags:");
    eprintln!("  --archive fs|sqlite|memory  --data-dir <path>  --db <sqlite_url>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --archive fs");
    eprintln!("  --data-dir data");
    eprintln!("  --db sqlite://quizzes.sqlite3");
    eprintln!("  --difficulty Good");
    eprintln!();
    eprintln!("Environment (a .env file is loaded first):");
    eprintln!("  QUIZ_ARCHIVE, QUIZ_DATA_DIR, QUIZ_DB_URL");
    eprintln!("  GROQ_API_KEY, QUIZ_AI_BASE_URL, QUIZ_AI_MODEL, QUIZ_QUESTION_COUNT");
    eprintln!("  QUIZ_AI_TIMEOUT_SECS (default 60)");
    eprintln!("  RUST_LOG (default: info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Play,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "play" => Some(Self::Play),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveKind {
    Fs,
    Sqlite,
    Memory,
}

impl FromStr for ArchiveKind {
    type Err = ArgsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fs" | "files" => Ok(Self::Fs),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(ArgsError::InvalidArchive {
                raw: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    archive: ArchiveKind,
    data_dir: PathBuf,
    db_url: String,
    subject: Option<String>,
    difficulty: Difficulty,
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut archive = match env("QUIZ_ARCHIVE") {
            Some(raw) => raw.parse()?,
            None => ArchiveKind::Fs,
        };
        let mut data_dir =
            env("QUIZ_DATA_DIR").map_or_else(|| PathBuf::from("data"), PathBuf::from);
        let mut db_url = env("QUIZ_DB_URL")
            .map_or_else(|| "sqlite://quizzes.sqlite3".into(), normalize_sqlite_url);
        let mut subject = None;
        let mut difficulty = Difficulty::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--archive" => archive = require_value(args, "--archive")?.parse()?,
                "--data-dir" => data_dir = PathBuf::from(require_value(args, "--data-dir")?),
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--subject" => subject = Some(require_value(args, "--subject")?),
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    difficulty = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            archive,
            data_dir,
            db_url,
            subject,
            difficulty,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn open_storage(args: &Args, clock: Clock) -> Result<Storage, Box<dyn std::error::Error>> {
    let storage = match args.archive {
        ArchiveKind::Fs => Storage::filesystem(&args.data_dir, clock),
        ArchiveKind::Memory => Storage::in_memory(),
        ArchiveKind::Sqlite => {
            // Open + migrate SQLite at startup so services never see an unmigrated pool.
            prepare_sqlite_file(&args.db_url)?;
            Storage::sqlite(&args.db_url, clock).await?
        }
    };
    info!(archive = ?args.archive, "quiz archive ready");
    Ok(storage)
}

fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Terminal front end. Returns when the player declines another round or
/// stdin closes.
async fn play(service: &QuizSessionService, args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = SessionController::new();
    controller.set_difficulty(args.difficulty);
    let mut preset_subject = args.subject;
    let mut archive_tasks: Vec<JoinHandle<()>> = Vec::new();

    'rounds: loop {
        while controller.phase() == Phase::Menu {
            if let Some(message) = controller.error_message() {
                println!("! {message}");
            }
            let subject = match preset_subject.take() {
                Some(subject) => subject,
                None => match read_line("SUBJECT> ")? {
                    Some(subject) => subject,
                    None => break 'rounds,
                },
            };
            controller.set_subject(subject);
            println!("GENERATING... ({}, {})", controller.subject(), controller.difficulty());
            if let Some(task) = service.start(&mut controller).await {
                archive_tasks.push(task);
            }
        }

        while controller.phase() == Phase::Playing {
            let snapshot = controller.snapshot();
            let Some(question) = snapshot.current_question else {
                break;
            };
            println!();
            println!(
                "Question: {} / {}    Score: {}",
                snapshot.current_question_index + 1,
                snapshot.total_questions,
                snapshot.score
            );
            println!("{}", question.text);
            for (number, choice) in question.choices.iter().enumerate() {
                println!("  {}. {}", number + 1, choice.text);
            }

            let Some(raw) = read_line("> ")? else {
                break 'rounds;
            };
            let picked = raw
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=question.choices.len()).contains(n));
            match picked.and_then(|n| controller.submit_answer(n - 1)) {
                Some(answer) if answer.correct => println!("Correct!"),
                Some(_) => println!("Wrong."),
                None => println!("Pick a number from 1 to {}.", question.choices.len()),
            }
        }

        let snapshot = controller.snapshot();
        if let Some(outcome) = snapshot.outcome {
            println!();
            println!(
                "{}  You scored {} / {}",
                if outcome.is_victory() { "VICTORY" } else { "DEFEAT" },
                snapshot.score,
                snapshot.total_questions
            );
        }

        match read_line("Play again? [y/N] ")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => {
                controller.restart();
            }
            _ => break,
        }
    }

    for task in archive_tasks {
        if let Err(err) = task.await {
            warn!(error = %err, "archive task did not finish");
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let skip = usize::from(argv.first().is_some_and(|first| !first.starts_with("--")));
    let mut iter = argv.into_iter().skip(skip);
    let parsed = Args::parse(&mut iter, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = Clock::default_clock();
    let storage = open_storage(&parsed, clock).await?;
    let generator = ChatQuizGenerator::from_env();
    if !generator.enabled() {
        warn!("GROQ_API_KEY is not set; quiz generation will fail until it is");
    }
    let service = QuizSessionService::new(Arc::new(generator), Arc::clone(&storage.quizzes));

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                quiz_sessions: Arc::new(service),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Quizz Me")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Play => play(&service, parsed).await,
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
