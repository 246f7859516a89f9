//! Simulated feed
//!
//! Fills a page with items shaped like the host's timeline, some wrapped in
//! the cell containers the host renders around them.

use std::time::Duration;

use quill_dom::simulate::build_item;
use quill_dom::DomResult;
use quill_engine::{HostPage, Page};
use smol::Timer;

pub const HOME_URL: &str = "https://x.com/home";

const POSTS: &[(&str, &str)] = &[
    ("ferris", "Just shipped our first crate to crates.io. The borrow checker and I are friends now."),
    ("ada", "Hot take: most flaky tests are timing bugs in disguise."),
    ("grace", "Reminder that a timeout is a result, not an exception."),
    ("linus", "Spent the day deleting code. Best day this month."),
    ("margaret", "Async is easy until two things want the same DOM node."),
    ("dennis", "Every abstraction leaks. Pick the one that leaks where you can see it."),
];

fn post(index: usize) -> (&'static str, &'static str) {
    POSTS[index % POSTS.len()]
}

/// Append `count` items, starting at feed position `start`
pub fn append_items(page: &Page, start: usize, count: usize) -> DomResult<()> {
    for index in start..start + count {
        append_item(page, index)?;
    }
    Ok(())
}

/// Append items one at a time, `interval` apart
pub async fn stream_items(page: &Page, start: usize, count: usize, interval: Duration) -> DomResult<()> {
    for index in start..start + count {
        Timer::after(interval).await;
        append_item(page, index)?;
        tracing::debug!(index, "streamed feed item");
    }
    Ok(())
}

fn append_item(page: &Page, index: usize) -> DomResult<()> {
    let (author, text) = post(index);
    let href = format!("/{author}/status/{}", 1_800_000_000 + index);
    let doc = page.document();
    let item = build_item(&mut doc.borrow_mut(), text, Some(&href))?;

    // Odd positions arrive inside a timeline cell
    let node = if index % 2 == 1 {
        let cell = page.create_element("div", &[("data-testid", "cellInnerDiv")]);
        page.insert_before(cell, item, None)?;
        cell
    } else {
        item
    };
    page.insert_before(page.body(), node, None)
}
