//! Page subcommand handlers: classify, analyze and export.

use std::path::Path;

use tracing::info;

use stylescope_config::Config;
use stylescope_popup::color_value;
use stylescope_protocols::{policy, ColorFormat};

use crate::session::Session;

/// Print the policy verdict for a URL.
pub(crate) fn classify(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let verdict = policy::classify(url);
    println!("URL:         {}", url);
    println!("Kind:        {:?}", policy::page_kind(url));
    println!("Restricted:  {}", verdict.is_restricted);
    println!("Category:    {}", verdict.category);
    println!("Executable:  {}", policy::can_execute(url));
    println!("Local dev:   {}", policy::is_local_dev(url));
    if verdict.is_restricted {
        println!("\n{}", verdict.message);
    }
    Ok(())
}

/// Analyze a snapshot and print its palette and fonts.
pub(crate) async fn analyze(
    config: &Config,
    snapshot: &Path,
    format: ColorFormat,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open(config, snapshot, true).await?;
    session.popup.set_color_format(format);
    let popup = &session.popup;

    if let Some(message) = restricted_message(&session) {
        return Err(message.into());
    }
    let analysis = popup.analysis().cloned().unwrap_or_default();
    if let Some(error) = popup.last_error() {
        return Err(error.to_string().into());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    if analysis.colors.is_empty() {
        println!("No colors found.");
    } else {
        println!("{:<4} {:<28} {}", "#", "COLOR", "USES");
        println!("{}", "-".repeat(40));
        for (index, color) in analysis.colors.iter().enumerate() {
            println!("{:<4} {:<28} {}", index + 1, color_value(color, format), color.frequency);
        }
    }

    println!();
    if analysis.fonts.is_empty() {
        println!("No fonts found.");
    } else {
        println!("{:<4} {:<48} {}", "#", "FONT", "USES");
        println!("{}", "-".repeat(60));
        for (index, font) in analysis.fonts.iter().enumerate() {
            println!("{:<4} {:<48} {}", index + 1, font.family, font.frequency);
        }
    }
    println!("\nAnalyzed in {:.2} ms", analysis.analysis_time_ms);
    Ok(())
}

/// Analyze a snapshot and write its Tailwind theme extension.
pub(crate) async fn export(
    config: &Config,
    snapshot: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open(config, snapshot, true).await?;
    if let Some(message) = restricted_message(&session) {
        return Err(message.into());
    }

    let dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let path = session.popup.export_config(&dir)?;
    info!(path = %path.display(), "Export complete");
    println!("Tailwind config written to {}", path.display());
    Ok(())
}

fn restricted_message(session: &Session) -> Option<String> {
    let page = session.popup.page()?;
    if !page.is_restricted {
        return None;
    }
    Some(
        session
            .popup
            .last_error()
            .map(str::to_string)
            .unwrap_or_else(|| policy::restriction_message(&page.url)),
    )
}
