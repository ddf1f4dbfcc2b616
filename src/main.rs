//! Retouch CLI - apply a JSON-configured list of operations to an image.

use anyhow::{bail, Context, Result};
use retouch::prelude::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("retouch");

    let outcome = match args.get(1).map(String::as_str) {
        None => prompt_config_path().and_then(|path| run_config(&path)),
        Some("run") => match args.get(2) {
            Some(path) => run_config(Path::new(path)),
            None => {
                eprintln!("Error: Please specify a config file");
                print_usage(program);
                return;
            }
        },
        Some("list") => {
            list_operations();
            Ok(())
        }
        Some("info") => match args.get(2) {
            Some(id) => operation_info(id),
            None => {
                eprintln!("Error: Please specify an operation type");
                return;
            }
        },
        Some("help" | "--help" | "-h") => {
            print_usage(program);
            Ok(())
        }
        Some(path) if Path::new(path).is_file() => run_config(Path::new(path)),
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage(program);
            return;
        }
    };

    if let Err(e) = outcome {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("🎨 Retouch - Pixel-level Image Editing v{}", retouch::VERSION);
    println!();
    println!("Usage: {} [command] [options]", program);
    println!();
    println!("Commands:");
    println!("  run <config.json>   Apply the operations of a config file");
    println!("  list                List all available operations");
    println!("  info <operation>    Show detailed info about an operation");
    println!("  help                Show this help message");
    println!();
    println!("Without a command, the config path is read from stdin.");
    println!("Set RUST_LOG=info (or debug) for more detailed logs.");
}

fn prompt_config_path() -> Result<PathBuf> {
    print!("Enter path to config JSON file: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let path = line.trim();
    if path.is_empty() {
        bail!("No config path given");
    }
    Ok(PathBuf::from(path))
}

fn print_progress(update: ProgressUpdate) {
    match update {
        ProgressUpdate::StepStarted { operation, .. } => {
            println!("🔧 Applying {}...", operation);
        }
        ProgressUpdate::StepFailed {
            operation, message, ..
        } => {
            println!("❌ Failed operation '{}': {}", operation, message);
        }
        ProgressUpdate::Completed {
            total_duration_ms,
            steps_applied,
            steps_failed,
        } => {
            println!(
                "✅ {} operation(s) applied, {} failed ({} ms)",
                steps_applied, steps_failed, total_duration_ms
            );
        }
        _ => {}
    }
}

fn run_config(path: &Path) -> Result<()> {
    let config = EditorConfig::from_path(path)
        .with_context(|| format!("Cannot use config {}", path.display()))?;
    let editor = ImageEditor::new(config)?;

    let options = ExecutionOptions::new().with_progress(print_progress);
    let outcome = editor.run(Some(options))?;

    let validation = &outcome.result.validation;
    if !validation.success {
        println!("⚠️ {}", validation.summary());
        for line in validation.detailed_errors() {
            println!("   {}", line);
        }
    }
    for warning in &validation.warnings {
        println!("⚠️ {}", warning.message);
    }

    if let Some(saved) = &outcome.saved_to {
        println!("✅ Saved result to {}", saved.display());
    }
    if let Some(preview) = &outcome.displayed {
        println!("🖼️ Opened preview {}", preview.display());
    } else if editor.config().display {
        println!("⚠️ Display requested, but the preview could not be opened");
    }
    Ok(())
}

fn list_operations() {
    let registry = FilterRegistry::with_builtins();
    let grouped = registry.grouped_by_category();

    println!("Available operations ({} total):", registry.len());
    println!();

    for (category, operations) in grouped {
        println!("  📁 {}", category.display_name());
        for metadata in operations {
            println!("      • {} - {}", metadata.id, metadata.description);
        }
        println!();
    }
}

fn operation_info(id: &str) -> Result<()> {
    let registry = FilterRegistry::with_builtins();
    let normalized = id.trim().to_lowercase();

    let Some(metadata) = registry.get_metadata(&normalized) else {
        bail!("Operation not found: {} (use 'list' to see available operations)", id);
    };

    println!("Operation: {}", metadata.name);
    println!("Type: {}", metadata.id);
    println!("Category: {}", metadata.category.display_name());
    println!();
    println!("Description:");
    println!("  {}", metadata.description);
    println!();

    if metadata.parameters.is_empty() {
        println!("Parameters: none");
    } else {
        println!("Parameters:");
        for param in &metadata.parameters {
            match &param.hint {
                Some(hint) => println!("  • {} [{}] ({})", param.name, param.param_type, hint),
                None => println!("  • {} [{}]", param.name, param.param_type),
            }
            if !param.description.is_empty() {
                println!("    {}", param.description);
            }
        }
    }
    Ok(())
}
