// Netscape bookmark file importer
// Flattens a bookmark HTML export into leaf records, each carrying its folder path.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::types::bookmark::BookMark;

/// Parses a Netscape-format bookmark export into a flat list of leaves.
///
/// Folders are `<DT>` elements headed by an `<H3>`; bookmarks are `<A>`
/// elements. Only anchors below `body > dl > dt` are read. Each leaf's
/// `parents` lists its folders nearest-first, without the outermost folder
/// that every export wraps its content in (e.g. "Bookmarks bar").
///
/// Addresses are resolved (scheme and host lower-cased, a bare origin gets
/// its `/` path) and emitted once; later anchors resolving to the same
/// address are dropped. An `HREF` that does not parse as an absolute URL is
/// kept as its trimmed text. Markup the parser cannot make sense of yields an empty list.
pub fn parse_bookmarks_html(html: &str) -> Vec<BookMark> {
    let (Ok(top_level), Ok(anchors)) = (Selector::parse("body > dl > dt"), Selector::parse("a")) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut seen: HashSet<String> = HashSet::new();
    let mut leaves = Vec::new();

    for group in document.select(&top_level) {
        for anchor in group.select(&anchors) {
            let address = resolve_address(anchor.value().attr("href").unwrap_or_default());
            if !seen.insert(address.clone()) {
                debug!(address = %address, "skipping duplicate bookmark");
                continue;
            }
            leaves.push(anchor_to_leaf(anchor, address));
        }
    }

    debug!(count = leaves.len(), "parsed bookmark html");
    leaves
}

fn resolve_address(href: &str) -> String {
    let href = href.trim();
    match Url::parse(href) {
        Ok(url) => url.as_str().to_string(),
        Err(_) => href.to_string(),
    }
}

fn anchor_to_leaf(anchor: ElementRef<'_>, address: String) -> BookMark {
    let title = anchor.text().collect::<String>().trim().to_string();
    let mut leaf = BookMark::leaf(&title, &address).with_parents(folder_path(anchor));
    leaf.icon = attr(anchor, "icon");
    leaf.created = attr(anchor, "add_date").unwrap_or_default();
    leaf.updated = attr(anchor, "last_modified").unwrap_or_default();
    leaf
}

/// Folder stubs enclosing `anchor`, nearest first, minus the outermost one.
fn folder_path(anchor: ElementRef<'_>) -> Vec<BookMark> {
    let mut path: Vec<BookMark> = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "dt")
        .filter_map(folder_heading)
        .map(|heading| {
            let mut stub = BookMark::folder(heading.text().collect::<String>().trim());
            stub.created = attr(heading, "add_date").unwrap_or_default();
            stub.updated = attr(heading, "last_modified").unwrap_or_default();
            stub
        })
        .collect();
    path.pop();
    path
}

fn folder_heading(dt: ElementRef<'_>) -> Option<ElementRef<'_>> {
    dt.children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "h3")
}

fn attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
