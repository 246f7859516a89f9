//! Quill Engine
//!
//! Augments a live, continuously mutating page: attaches a reply control to
//! every feed item exactly once, and fills generated replies into the
//! page's own reply dialog even when its editor resists direct DOM writes.
//!
//! # Example
//! ```rust,ignore
//! use std::rc::Rc;
//! use quill_engine::{Engine, EngineConfig, LogNotifier, Page};
//! use quill_engine::net::{HttpContentService, RequesterId};
//!
//! let executor = Rc::new(smol::LocalExecutor::new());
//! let config = EngineConfig::default();
//! let service = HttpContentService::new(&config.service.endpoint, config.service_timeout())?;
//! let mut engine = Engine::new(page, executor.clone(), &config, service, LogNotifier, RequesterId::generate())?;
//! engine.start()?;
//! smol::block_on(executor.run(smol::future::pending::<()>()));
//! ```

mod host;
mod page;
mod poll;
mod locate;
mod inject;
mod item;
mod watch;
mod augment;
mod session;
mod notify;
mod flow;
mod engine;
mod config;
mod error;

pub use host::{HostPage, HostResult};
pub use page::Page;
pub use poll::{poll_until, sleep, PollPolicy};
pub use locate::{
    classify_missing_surface, locate_editable_surface, wait_for_visible_dialog, EphemeralSurface, SurfaceLocator,
};
pub use inject::{content_matches, inject_text, InjectionResult, TextInjector};
pub use item::{is_augmented, mark_augmented, ContentItem, ItemMatcher, SelectorMatcher, AUGMENTED_ATTR};
pub use watch::ItemWatcher;
pub use augment::{Augmenter, CONTROL_CLASS};
pub use session::{Session, SharedSession};
pub use notify::{LogNotifier, Notice, NoticeKind, NoticeLog, Notifier};
pub use flow::ReplyFlow;
pub use engine::Engine;
pub use config::{EngineConfig, InjectionConfig, PollConfig, SelectorConfig, ServiceConfig};
pub use error::{ConfigError, EngineError, MissingControl};

/// User-facing notice texts
pub mod messages {
    pub use crate::notify::{
        COPIED, DIALOG_NOT_FOUND, FILLED, FILL_FAILED, NOTHING_TO_COPY, REPLY_ACTION_NOT_FOUND,
    };
}

// Re-export sub-crates for advanced usage
pub use quill_dom as dom;
pub use quill_net as net;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
