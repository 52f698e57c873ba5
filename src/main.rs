use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use moyenne::config::Config;
use moyenne::gradebook::{self, GradeBook};
use moyenne::grading::GradeEntry;
use moyenne::output;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show all subjects with their averages (default if no subcommand)
    List,
    /// Add a subject
    Add {
        /// Subject name
        subject: String,

        /// Exam mark (0-20)
        #[arg(short, long)]
        exam: String,

        /// Coefficient (weight in the general average)
        #[arg(long, default_value = "1")]
        coef: String,

        /// Continuous assessment mark (0-20)
        #[arg(long)]
        cc: Option<String>,

        /// Practical work mark (0-20)
        #[arg(long)]
        tp: Option<String>,
    },
    /// Remove a subject by its index number
    Remove {
        /// Index number of the subject (1-based, as shown in list)
        index: usize,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove every subject
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Export subjects and averages as CSV
    Export {
        /// Output file (defaults to grades-YYYY-MM-DD.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write CSV to standard output instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
    /// Interactive terminal interface
    Tui,
}

#[derive(Parser, Debug)]
#[command(name = "moyenne")]
#[command(about = "Weighted grade average calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/moyenne/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the gradebook file (overrides storage_path from config)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    moyenne::logging::init_logger(cli.verbose);

    let command = cli.command.unwrap_or(Commands::List);

    // Load config
    let config = match moyenne::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = moyenne::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let book_path = cli
        .file
        .or_else(|| config.storage_path.clone())
        .unwrap_or_else(gradebook::get_gradebook_path);
    debug!(path = %book_path.display(), "Using gradebook");

    let mut book = match gradebook::load_gradebook(&book_path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to load gradebook: {:#}", e);
            std::process::exit(EXIT_STORAGE);
        }
    };

    let use_colors = output::should_use_colors();
    let separator = config.export.decimal_char();

    match command {
        Commands::List => {
            println!("{}", output::format_table(&book, use_colors, separator));
            if !book.is_empty() {
                println!();
                println!(
                    "{}",
                    output::format_summary(&book.summary(), book.len(), use_colors, separator)
                );
            }
        }
        Commands::Add {
            subject,
            exam,
            coef,
            cc,
            tp,
        } => {
            let entry = match GradeEntry::from_fields(
                &subject,
                &coef,
                cc.as_deref().unwrap_or(""),
                tp.as_deref().unwrap_or(""),
                &exam,
            ) {
                Ok(entry) => entry,
                Err(e) => {
                    eprintln!("Invalid entry: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let average = entry.average();
            let status = entry.status();
            let subject = entry.subject.clone();
            let index = book.add(entry);
            save_or_exit(&book_path, &book);
            info!(subject = %subject, index, "Added entry");

            println!(
                "Added #{} {}: average {} ({})",
                index + 1,
                subject,
                output::format_decimal(average, separator),
                output::format_status(status, use_colors)
            );
            println!(
                "{}",
                output::format_summary(&book.summary(), book.len(), use_colors, separator)
            );
        }
        Commands::Remove { index, yes } => {
            // Validate index bounds (1-based)
            if index < 1 || index > book.len() {
                if book.is_empty() {
                    eprintln!("Invalid index {}. The gradebook is empty.", index);
                } else {
                    eprintln!(
                        "Invalid index {}. Must be between 1 and {}.",
                        index,
                        book.len()
                    );
                }
                std::process::exit(EXIT_INPUT);
            }

            let subject = book.entries()[index - 1].subject.clone();
            if !confirm(&config, yes, &format!("Delete #{} {}?", index, subject)) {
                println!("Cancelled.");
                std::process::exit(EXIT_SUCCESS);
            }

            book.remove(index - 1);
            save_or_exit(&book_path, &book);
            info!(subject = %subject, index, "Removed entry");

            println!("Removed #{} {}", index, subject);
            if !book.is_empty() {
                println!(
                    "{}",
                    output::format_summary(&book.summary(), book.len(), use_colors, separator)
                );
            }
        }
        Commands::Clear { yes } => {
            if book.is_empty() {
                println!("Nothing to clear.");
                std::process::exit(EXIT_SUCCESS);
            }

            let count = book.len();
            if !confirm(&config, yes, &format!("Delete all {} subjects?", count)) {
                println!("Cancelled.");
                std::process::exit(EXIT_SUCCESS);
            }

            book.clear();
            save_or_exit(&book_path, &book);
            info!(count, "Cleared gradebook");

            println!("Removed {} subjects.", count);
        }
        Commands::Export { output: path, stdout } => {
            if stdout {
                if let Err(e) = output::write_csv(std::io::stdout().lock(), &book, &config.export) {
                    eprintln!("Failed to export: {:#}", e);
                    std::process::exit(EXIT_STORAGE);
                }
            } else {
                let path = path.unwrap_or_else(output::default_export_path);
                if let Err(e) = output::export_to_path(&path, &book, &config.export) {
                    eprintln!("Failed to export: {:#}", e);
                    std::process::exit(EXIT_STORAGE);
                }
                println!("Exported {} subjects to {}", book.len(), path.display());
            }
        }
        Commands::Tui => {
            let theme = moyenne::tui::resolve_theme(config.display.theme);
            let app = moyenne::tui::App::new(book, book_path, config, theme);
            if let Err(e) = moyenne::tui::run_tui(app).await {
                eprintln!("TUI error: {:#}", e);
                std::process::exit(EXIT_STORAGE);
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Ask before a destructive action unless `--yes` was given or
/// confirmations are turned off in config
fn confirm(config: &Config, yes: bool, message: &str) -> bool {
    if yes || !config.display.confirm_destructive {
        return true;
    }
    match moyenne::prompt::prompt_yes_no(message, false) {
        Ok(answer) => answer,
        Err(e) => {
            eprintln!("{:#}", e);
            false
        }
    }
}

fn save_or_exit(path: &Path, book: &GradeBook) {
    if let Err(e) = gradebook::save_gradebook(path, book) {
        eprintln!("Failed to save gradebook: {:#}", e);
        std::process::exit(EXIT_STORAGE);
    }
}
