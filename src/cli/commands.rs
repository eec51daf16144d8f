//! CLI command implementations

use super::output::{OutputEvent, OutputHandler};
use crate::catalog::{CatalogSource, create_catalog};
use crate::config::RisingStarsConfig;
use crate::digest::{build_entries, select_featured};
use crate::mailer::{MailMessage, Mailer, PostmarkMailer, resolve_recipient};
use crate::template::DigestRenderer;
use crate::tracker::MetricsStore;
use crate::trend::TrendPolicy;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Options for `rising-stars run`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Write the digest to a temp file instead of sending it
    pub preview: bool,

    /// Recipient override
    pub recipient: Option<String>,
}

/// A rendered digest ready to preview or send
#[derive(Debug, Clone)]
pub struct RenderedDigest {
    pub html: String,
    pub models: usize,
}

/// Run the full pipeline: fetch, classify, store, render, then preview or send
pub async fn run_digest(
    config: &RisingStarsConfig,
    options: &RunOptions,
    handler: &dyn OutputHandler,
) -> Result<()> {
    // Resolve delivery up front so a misconfigured run doesn't mark models as featured
    let delivery = if options.preview {
        None
    } else {
        let mailer =
            PostmarkMailer::from_config(&config.email).context("configuring email delivery")?;
        let recipient = resolve_recipient(
            options.recipient.as_deref(),
            config.email.recipient.as_deref(),
        )?;
        Some((mailer, recipient))
    };

    let db_path = config.storage.db_path();
    handler.emit(OutputEvent::Debug {
        message: format!("metrics store: {}", db_path.display()),
    });
    let mut store = MetricsStore::open(&db_path)
        .with_context(|| format!("opening metrics store {}", db_path.display()))?;
    let catalog = create_catalog(&config.catalog).context("creating catalog client")?;

    let today = Local::now().date_naive();
    let Some(digest) = prepare_digest(&mut store, catalog.as_ref(), config, today, handler).await?
    else {
        handler.emit(OutputEvent::NothingNew);
        return Ok(());
    };

    match delivery {
        None => {
            let path = write_preview(&digest.html, &std::env::temp_dir())?;
            handler.emit(OutputEvent::PreviewWritten { path: path.clone() });
            handler.result(true, Some(&path.display().to_string()));
        }
        Some((mailer, recipient)) => {
            let message = MailMessage::new(
                config.email.sender.as_str(),
                recipient.as_str(),
                config.digest.subject.as_str(),
                digest.html,
            );
            deliver(&mailer, &message).await?;
            handler.emit(OutputEvent::EmailSent {
                recipient,
                models: digest.models,
            });
        }
    }

    Ok(())
}

/// Fetch, classify and render; `None` when nothing qualifies
pub async fn prepare_digest(
    store: &mut MetricsStore,
    catalog: &dyn CatalogSource,
    config: &RisingStarsConfig,
    today: NaiveDate,
    handler: &dyn OutputHandler,
) -> Result<Option<RenderedDigest>> {
    handler.emit(OutputEvent::RunStart {
        catalog: catalog.name().to_string(),
        limit: config.catalog.limit,
    });

    let snapshots = catalog
        .top_models(config.catalog.limit)
        .await
        .context("fetching top models")?;
    handler.emit(OutputEvent::CatalogFetched {
        count: snapshots.len(),
    });

    let policy = TrendPolicy::from_config(&config.trend);
    let featured = select_featured(store, snapshots, &policy, config.digest.max_featured)
        .context("updating metrics store")?;
    if featured.is_empty() {
        return Ok(None);
    }
    handler.emit(OutputEvent::Selected {
        featured: featured.len(),
    });

    let entries = build_entries(featured, catalog, &config.catalog.hub_url).await;
    let html = DigestRenderer::new()?
        .render(&entries, today)
        .context("rendering digest")?;

    Ok(Some(RenderedDigest {
        html,
        models: entries.len(),
    }))
}

async fn deliver(mailer: &dyn Mailer, message: &MailMessage) -> Result<()> {
    tracing::info!(mailer = mailer.name(), to = %message.to, "Sending newsletter");
    mailer
        .send(message)
        .await
        .with_context(|| format!("sending newsletter via {}", mailer.name()))
}

/// Write the digest to a timestamped HTML file under `dir`
pub fn write_preview(html: &str, dir: &Path) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("rising-stars-{}.html", stamp));

    std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "Preview written");

    Ok(path)
}

/// Print store statistics
pub fn show_stats(config: &RisingStarsConfig, handler: &dyn OutputHandler) -> Result<()> {
    let db_path = config.storage.db_path();
    let store = MetricsStore::open(&db_path)
        .with_context(|| format!("opening metrics store {}", db_path.display()))?;

    let statistics = store.statistics().context("reading statistics")?;
    handler.emit(OutputEvent::Statistics { statistics });
    Ok(())
}

/// Export every stored row as CSV
pub fn export_store(
    config: &RisingStarsConfig,
    path: &Path,
    handler: &dyn OutputHandler,
) -> Result<()> {
    let db_path = config.storage.db_path();
    let store = MetricsStore::open(&db_path)
        .with_context(|| format!("opening metrics store {}", db_path.display()))?;

    let rows = store
        .export_to_path(path)
        .with_context(|| format!("exporting to {}", path.display()))?;

    handler.emit(OutputEvent::Exported {
        path: path.to_path_buf(),
        rows,
    });
    Ok(())
}
