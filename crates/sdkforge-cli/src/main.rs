//! sdkforge CLI.
//!
//! Provides the `sdkforge` binary with subcommands for evolving a
//! specification document: ingest natural-language instructions through the
//! configured provider, apply hand-authored change sets, inspect the
//! document and its history, roll back, and emit source.
//!
//! Provider configuration comes from environment variables:
//! - `SDKFORGE_PROVIDER`: `openrouter` (default) or `openai_compatible`
//! - `SDKFORGE_API_BASE_URL`: chat-completions base URL
//! - `SDKFORGE_API_KEY`: bearer token
//! - `SDKFORGE_MODEL`: model name

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use sdkforge_codegen::render_sdk;
use sdkforge_compiler::{LlmConfig, OpenAiChatClient, PipelineError, SpecService};
use sdkforge_storage::{fingerprint, DirStore};

/// Instruction-to-specification compiler and tools.
#[derive(Parser)]
#[command(name = "sdkforge", about = "Instruction-to-specification compiler and tools")]
struct Cli {
    /// Project directory holding the document snapshot and patch log.
    #[arg(short, long, global = true, default_value = "out_project")]
    project_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Ingest a natural-language instruction through the configured provider.
    Ingest {
        /// The instruction text.
        text: String,
    },

    /// Apply a hand-authored change-set JSON file, bypassing the provider.
    Apply {
        /// Path to the change-set JSON file.
        file: PathBuf,
    },

    /// Print the current document summary, version, and content fingerprint.
    Show,

    /// List the patch history, oldest first.
    History,

    /// Roll back the last N patches by replaying the shorter log prefix.
    Rollback {
        /// Number of patches to roll back.
        n: usize,
    },

    /// Emit generated source for the current document.
    Emit {
        /// Output directory (default: <project-dir>/generated_sdk).
        #[arg(short = 'O', long)]
        out_dir: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = DirStore::new(&cli.project_dir);

    let exit_code = match cli.command {
        Commands::Ingest { text } => run_ingest(store, &text),
        Commands::Apply { file } => run_apply(store, &file),
        Commands::Show => run_show(store),
        Commands::History => run_history(store),
        Commands::Rollback { n } => run_rollback(store, n),
        Commands::Emit { out_dir } => {
            let out = out_dir.unwrap_or_else(|| cli.project_dir.join("generated_sdk"));
            run_emit(store, &out)
        }
    };
    process::exit(exit_code);
}

fn open_service(store: DirStore) -> Result<SpecService<DirStore>, i32> {
    SpecService::open(store).map_err(|e| {
        eprintln!("Error: failed to load project state: {}", e);
        3
    })
}

/// Execute the ingest subcommand.
///
/// Returns exit code: 0 = success, 1 = pipeline error, 3 = I/O error.
fn run_ingest(store: DirStore, text: &str) -> i32 {
    let mut service = match open_service(store) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let client = OpenAiChatClient::new(LlmConfig::from_env());
    match service.ingest_instruction(text, &client) {
        Ok(receipt) => {
            if receipt.repair_attempts > 0 {
                println!(
                    "Validated after {} repair attempt(s).",
                    receipt.repair_attempts
                );
            }
            if let Some(record) = service.history().last() {
                println!(
                    "Applied: {} ({} -> {})",
                    record.summary, record.version_before, record.version_after
                );
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Execute the apply subcommand.
///
/// Returns exit code: 0 = success, 1 = apply error, 2 = validation failure,
/// 3 = I/O error.
fn run_apply(store: DirStore, file: &PathBuf) -> i32 {
    let payload = match std::fs::read_to_string(file) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", file.display(), e);
            return 3;
        }
    };

    let mut service = match open_service(store) {
        Ok(s) => s,
        Err(code) => return code,
    };
    match service.ingest_payload(&payload, None) {
        Ok(record) => {
            println!(
                "Applied: {} ({} -> {})",
                record.summary, record.version_before, record.version_after
            );
            0
        }
        Err(PipelineError::Validate(e)) => {
            eprintln!("Validation failed: {}", e);
            2
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn run_show(store: DirStore) -> i32 {
    let service = match open_service(store) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let spec = service.current_spec();
    println!("{}", spec.render_summary());
    println!("\nVersion: {}", spec.version);
    println!("Fingerprint: {}", fingerprint(spec));
    println!("Patches: {}", service.history().len());
    0
}

fn run_history(store: DirStore) -> i32 {
    let service = match open_service(store) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if service.history().is_empty() {
        println!("(empty history)");
        return 0;
    }
    for (index, record) in service.history().iter().enumerate() {
        println!(
            "[{}] {} -> {}: {}",
            index, record.version_before, record.version_after, record.summary
        );
        if let Some(instruction) = &record.instruction_text {
            println!("    instruction: {}", instruction);
        }
    }
    0
}

fn run_rollback(store: DirStore, n: usize) -> i32 {
    let mut service = match open_service(store) {
        Ok(s) => s,
        Err(code) => return code,
    };
    match service.rollback(n) {
        Ok(()) => {
            println!(
                "Rolled back {} patch(es); version is now {}.",
                n,
                service.current_spec().version
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn run_emit(store: DirStore, out_dir: &PathBuf) -> i32 {
    let service = match open_service(store) {
        Ok(s) => s,
        Err(code) => return code,
    };
    match render_sdk(service.current_spec(), out_dir) {
        Ok(written) => {
            println!("Emitted {} file(s) to {}.", written.len(), out_dir.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            3
        }
    }
}
