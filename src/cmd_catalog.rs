//! Catalog subcommand handlers.

use std::io::Write;
use std::path::Path;

use crate::app::App;
use crate::cli::OutputFormat;
use crate::render::Renderer;

pub(crate) async fn handle_add(app: &App, key: &str, data: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = app.catalog.add(key, data).await?;
    println!("✓ Added command {}", id);
    Ok(())
}

pub(crate) async fn handle_save(app: &App, key: &str, data: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = app.catalog.save(key, data).await?;
    println!("✓ Saved command {}", id);
    Ok(())
}

pub(crate) async fn handle_import(app: &App, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let id = app.catalog.import_markdown(file).await?;
    println!("✓ Imported {} as command {}", file.display(), id);
    Ok(())
}

pub(crate) async fn handle_show(app: &App, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let record = app.catalog.show(id).await?;
    Renderer::new().record(&mut std::io::stdout().lock(), &record)?;
    Ok(())
}

pub(crate) async fn handle_delete(app: &App, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    app.catalog.delete(id).await?;
    println!("✓ Deleted command {}", id);
    Ok(())
}

pub(crate) async fn handle_list(
    app: &App,
    limit: usize,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = app.catalog.recent(limit).await?;
    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?,
        OutputFormat::Text => Renderer::new().table(&mut out, &records)?,
    }
    Ok(())
}

pub(crate) async fn handle_count(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let count = app.catalog.count().await?;
    println!("Total commands: {}", count);
    Ok(())
}

/// Ask on stdin; anything but `y`/`yes` declines.
pub(crate) fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(crate::cmd_search::is_confirmation(&answer))
}
