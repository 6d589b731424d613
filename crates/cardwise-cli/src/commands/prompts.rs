//! Prompts-related command implementations

use anyhow::Result;
use cardwise_core::prompts::{default_prompts_dir, PromptId, PromptLibrary};

/// List all available prompts and their override status
pub fn cmd_prompts_list() -> Result<()> {
    let library = PromptLibrary::new();

    println!("Available Prompts:\n");
    println!("{:<25}  {}", "ID", "OVERRIDE");
    println!("{}", "-".repeat(40));

    for id in PromptId::all() {
        let override_status = if library.override_path(*id).is_some() {
            "✓ Custom"
        } else {
            "Default"
        };
        println!("{:<25}  {}", id.as_str(), override_status);
    }

    println!();
    println!(
        "Override directory: {}",
        default_prompts_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    println!();
    println!("To customize a prompt:");
    println!("  1. Save `cardwise prompts show <id>` output as <id>.md in the override directory");
    println!("  2. Edit the file, keeping the {{{{...}}}} placeholders");

    Ok(())
}

/// Show the template of a specific prompt
pub fn cmd_prompts_show(prompt_id: &str) -> Result<()> {
    let library = PromptLibrary::new();

    let Some(id) = PromptId::parse(prompt_id) else {
        eprintln!("Unknown prompt ID: {}", prompt_id);
        eprintln!();
        eprintln!("Available prompts:");
        for id in PromptId::all() {
            eprintln!("  - {}", id.as_str());
        }
        return Ok(());
    };

    let override_path = library.override_path(id);
    println!("Prompt: {}", id.as_str());
    println!(
        "Source: {}",
        if override_path.is_some() {
            "Override"
        } else {
            "Default"
        }
    );
    if let Some(ref path) = override_path {
        println!("Override Path: {}", path.display());
    }

    println!();
    println!("--- Content ---");
    println!("{}", library.template(id)?);

    Ok(())
}

/// Show the path where prompt overrides should be placed
pub fn cmd_prompts_path() -> Result<()> {
    match default_prompts_dir() {
        Some(path) => {
            println!("{}", path.display());

            if !path.exists() {
                eprintln!();
                eprintln!("Note: This directory does not exist yet.");
                eprintln!("Create it to start adding custom prompts.");
            }
        }
        None => {
            eprintln!("Could not determine prompts directory.");
            eprintln!("The data directory is not available on this system.");
        }
    }

    Ok(())
}
