//! Quill CLI - encrypted backup and restore for a local-first notes app
//!
//! This is the command-line interface for Quill. It reads a notes file (a
//! JSON array of note records), produces plain or encrypted backup files,
//! and restores notes from either shape, prompting for a password only when
//! the backup actually needs one.

use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use dialoguer::Password;
use quill_core::backup::{detect_and_parse, Backup};
use quill_core::crypto::validate_password;
use quill_core::notes::{coerce_imported_note, Note};
use quill_core::{export_encrypted_backup, export_plain_backup, import_backup, QuillError, VERSION};

/// How many password prompts an import allows before giving up.
const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Quill - encrypted backup and restore for a local-first notes app
#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new notes file
    Init {
        /// Path where the notes file will be created
        #[arg(value_name = "PATH")]
        path: String,

        /// Seed the file with a sample note
        #[arg(long)]
        sample: bool,
    },

    /// Export notes to a backup file
    Export {
        /// Path to the notes file (a JSON array of note records)
        #[arg(value_name = "NOTES")]
        notes: String,

        /// Encrypt the backup with a password
        #[arg(long)]
        encrypt: bool,

        /// Destination path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Import notes from a backup file
    Import {
        /// Path to the backup file
        #[arg(value_name = "BACKUP")]
        backup: String,

        /// Repair imported records (fresh ids, defaults for missing fields)
        #[arg(long)]
        normalize: bool,

        /// Destination path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Inspect a backup file without decrypting it
    Inspect {
        /// Path to the backup file
        #[arg(value_name = "BACKUP")]
        backup: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path, sample }) => {
            if Path::new(&path).exists() {
                return Err(anyhow::anyhow!("{} already exists", path));
            }

            let notes: Vec<Note> = if sample { vec![sample_note()] } else { Vec::new() };
            let text = serde_json::to_string_pretty(&notes)?;
            write_atomic(Path::new(&path), &text)?;

            if !cli.quiet {
                println!("Created notes file at {}", path);
            }
        }
        Some(Commands::Export { notes, encrypt, out }) => {
            let records = read_notes_file(&notes)?;

            let text = if encrypt {
                let password = prompt_export_password()?;
                validate_password(&password)?;
                export_encrypted_backup(&records, &password)?
            } else {
                export_plain_backup(&records)?
            };

            match out {
                Some(destination) => {
                    write_atomic(Path::new(&destination), &text)?;
                    if !cli.quiet {
                        println!("Exported {} notes to {}", records.len(), destination);
                    }
                }
                None => println!("{}", text),
            }
        }
        Some(Commands::Import { backup, normalize, out }) => {
            let text = std::fs::read_to_string(&backup)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", backup, e))?;
            let records = import_with_prompt(&text)?;

            let output = if normalize {
                let repaired: Vec<Note> = records
                    .iter()
                    .enumerate()
                    .map(|(index, raw)| coerce_imported_note(raw, index as i64))
                    .collect();
                serde_json::to_string_pretty(&repaired)?
            } else {
                serde_json::to_string_pretty(&records)?
            };

            match out {
                Some(destination) => {
                    write_atomic(Path::new(&destination), &output)?;
                    if !cli.quiet {
                        println!("Imported {} notes to {}", records.len(), destination);
                    }
                }
                None => println!("{}", output),
            }
        }
        Some(Commands::Inspect { backup }) => {
            let text = std::fs::read_to_string(&backup)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", backup, e))?;

            match detect_and_parse(&text)? {
                Backup::Plain(plain) => {
                    println!("Format: plain");
                    println!("Version: {}", plain.version);
                    println!("Exported: {}", format_exported_at(plain.exported_at));
                    println!("Notes: {}", plain.notes.len());
                }
                Backup::Encrypted(encrypted) => {
                    println!("Format: encrypted");
                    println!("Version: {}", encrypted.version);
                    println!("Exported: {}", format_exported_at(encrypted.exported_at));
                    println!("Notes: unknown (password required)");
                }
            }
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "quill", &mut std::io::stdout());
        }
        None => {
            println!("Quill v{}", VERSION);
            println!("\nRun `quill --help` for usage information.");
        }
    }

    Ok(())
}

/// Import backup text, prompting for a password only when the backup is
/// encrypted. Wrong passwords get a bounded number of fresh prompts; other
/// failures are final.
fn import_with_prompt(text: &str) -> anyhow::Result<Vec<serde_json::Value>> {
    match import_backup(text, None) {
        Ok(records) => return Ok(records),
        Err(QuillError::PasswordRequired) => {}
        Err(err) => return Err(err.into()),
    }

    let mut attempt = 0;
    loop {
        attempt += 1;
        let password = prompt_password()?;
        match import_backup(text, Some(&password)) {
            Err(QuillError::AuthenticationFailure) if attempt < MAX_PASSWORD_ATTEMPTS => {
                eprintln!(
                    "Incorrect password or corrupted backup ({} attempts left)",
                    MAX_PASSWORD_ATTEMPTS - attempt
                );
            }
            result => return result.map_err(Into::into),
        }
    }
}

fn prompt_password() -> anyhow::Result<String> {
    if let Ok(value) = std::env::var("QUILL_PASSWORD") {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

fn prompt_export_password() -> anyhow::Result<String> {
    if let Ok(value) = std::env::var("QUILL_PASSWORD") {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    Password::new()
        .with_prompt("Enter password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

fn read_notes_file(path: &str) -> anyhow::Result<Vec<serde_json::Value>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
    let raw: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {}", path, e))?;

    match raw {
        serde_json::Value::Array(records) => Ok(records),
        _ => Err(anyhow::anyhow!(
            "{} must contain a JSON array of note records",
            path
        )),
    }
}

fn format_exported_at(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Write via a temp file and rename, so a failed write never leaves a
/// truncated backup at the destination.
fn write_atomic(destination: &Path, contents: &str) -> anyhow::Result<()> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let temp_name = format!(".quill_{}_{}.tmp", std::process::id(), nanos);
    let temp_path = destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(|parent| parent.join(&temp_name))
        .unwrap_or_else(|| Path::new(&temp_name).to_path_buf());

    {
        let mut file = std::fs::File::create(&temp_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", temp_path.display(), e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", temp_path.display(), e))?;
    }

    if let Err(initial_err) = std::fs::rename(&temp_path, destination) {
        // Best-effort replace on platforms where rename fails if target exists.
        let _ = std::fs::remove_file(destination);
        std::fs::rename(&temp_path, destination).map_err(|retry_err| {
            let _ = std::fs::remove_file(&temp_path);
            anyhow::anyhow!(
                "Atomic rename failed (initial: {}, retry: {})",
                initial_err,
                retry_err
            )
        })?;
    }

    Ok(())
}

fn sample_note() -> Note {
    let mut note = Note::draft();
    note.title = "Welcome to Quill".to_string();
    note.content = "Edit this file, then run `quill export` to back it up.".to_string();
    note
}
