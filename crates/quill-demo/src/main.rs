//! Quill Demo - Main Entry Point
//!
//! Builds a simulated feed, attaches the engine, streams more items in and
//! then clicks every reply control, printing each notice.

mod feed;
mod offline;

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use quill_dom::simulate::{serve_reply_dialogs, DialogOptions};
use quill_engine::net::{ContentService, FeedbackTag, HttpContentService, RequesterId};
use quill_engine::{Augmenter, Engine, EngineConfig, HostPage, LogNotifier, Page};
use smol::LocalExecutor;

#[derive(Parser)]
#[command(name = "quill-demo")]
#[command(about = "Fill generated replies into a simulated feed")]
struct Cli {
    #[arg(short = 'f', long, help = "Path to config file")]
    config: Option<PathBuf>,
    #[arg(long, help = "Use canned replies instead of the reply service")]
    offline: bool,
    #[arg(short = 'n', long, default_value = "4", help = "Number of feed items")]
    items: usize,
    #[arg(long, help = "Extra guidance sent with each request")]
    helper: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(version = quill_engine::VERSION, "starting quill demo");

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let requester = match config.resolved_state_dir() {
        Some(dir) => RequesterId::load_or_create(&dir).context("loading requester id")?,
        None => RequesterId::generate(),
    };
    tracing::info!(requester = %requester, "requester id ready");

    if cli.offline {
        run(&cli, &config, offline::CannedService, requester)
    } else {
        let service = HttpContentService::new(&config.service.endpoint, config.service_timeout())
            .context("creating reply service client")?;
        run(&cli, &config, service, requester)
    }
}

fn run<S: ContentService + 'static>(
    cli: &Cli,
    config: &EngineConfig,
    service: S,
    requester: RequesterId,
) -> anyhow::Result<()> {
    let executor = Rc::new(LocalExecutor::new());
    let page = Page::new(feed::HOME_URL);
    executor
        .spawn(serve_reply_dialogs(page.document(), DialogOptions::default()))
        .detach();

    // Half the feed is there before the engine starts, the rest streams in
    let initial = cli.items.div_ceil(2);
    feed::append_items(&page, 0, initial)?;

    let mut engine = Engine::new(page.clone(), executor.clone(), config, service, LogNotifier, requester)?;
    if let Some(helper) = &cli.helper {
        engine.session().borrow_mut().set_helper_text(helper);
    }
    engine.start()?;

    smol::block_on(executor.run(async {
        feed::stream_items(&page, initial, cli.items - initial, Duration::from_millis(150)).await?;

        let controls = page.query_all(page.root(), &Augmenter::<Page>::control_selector());
        tracing::info!(controls = controls.len(), "feed augmented");

        let mut filled = 0;
        for control in controls {
            let Some(notice) = engine.spawn_control_click(control).await else {
                continue;
            };
            println!("{notice}");
            if notice.is_success() {
                filled += 1;
                engine.flow().send_feedback(FeedbackTag::Good).await;
            }
        }
        println!("{filled}/{} replies filled", cli.items);
        anyhow::Ok(())
    }))?;

    engine.stop();
    Ok(())
}
