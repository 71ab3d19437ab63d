//! Embedding backfill, coverage and provider status.

use crate::app::App;
use crate::render::Renderer;

/// Generate embeddings for every command stored without one.
pub(crate) async fn handle_embed(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let report = app.backfill().run().await?;
    if report.total == 0 {
        println!("All commands already have embeddings.");
        return Ok(());
    }
    println!(
        "Embedded {} of {} commands ({} failed)",
        report.succeeded, report.total, report.failed
    );
    Ok(())
}

pub(crate) async fn handle_stats(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let stats = app.catalog.embedding_stats().await?;
    Renderer::new().stats(&mut std::io::stdout().lock(), &stats)?;
    Ok(())
}

/// Provider availability and the effective configuration. `refresh`
/// re-checks every provider before printing.
pub(crate) async fn handle_status(app: &App, refresh: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = &app.config;
    if refresh {
        app.registry.refresh().await;
    }

    println!("Providers:");
    for provider in app.registry.in_priority_order() {
        let state = if app.registry.is_available(provider.kind()) {
            "available"
        } else {
            "unavailable"
        };
        println!("  {:<8} {:<12} model={}", provider.kind(), state, provider.model());
    }
    println!();
    println!("Configuration:");
    println!("  store             {}", config.store.path);
    println!("  preferred agent   {}", config.agent);
    println!("  ollama            {}", config.ollama.base_url());
    println!(
        "  gemini api key    {}",
        if config.gemini.has_api_key() { "set" } else { "not set" }
    );
    println!("  dimension         {}", config.embedding.dimension);
    println!(
        "  thresholds        high={} low={}",
        config.search.high_threshold, config.search.low_threshold
    );
    println!(
        "  caps              results={} context={}",
        config.search.result_cap, config.search.context_cap
    );
    Ok(())
}
