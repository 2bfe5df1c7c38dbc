//! Unit tests for the Netscape bookmark HTML importer.
//!
//! The fixtures mirror what browsers actually write: an outer `<DL>` whose
//! single `<DT>` is the toolbar folder, with nested `<DL>` lists below it.

use bookmark_sync::services::html_importer::parse_bookmarks_html;
use bookmark_sync::types::bookmark::BookmarkKind;

const EXPORT: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT><H3 ADD_DATE="1600000000" LAST_MODIFIED="1600000001" PERSONAL_TOOLBAR_FOLDER="true">Bookmarks bar</H3>
    <DL><p>
        <DT><A HREF="http://a.com/" ADD_DATE="1600000100" ICON="data:image/png;base64,AAAA">A</A>
        <DT><H3 ADD_DATE="1600000200">Work</H3>
        <DL><p>
            <DT><A HREF="http://jira.example.com/">Jira</A>
            <DT><H3>Tools</H3>
            <DL><p>
                <DT><A HREF="http://tool.com/" LAST_MODIFIED="1600000300">  Tool  </A>
            </DL><p>
        </DL><p>
    </DL><p>
</DL><p>
"#;

fn titles(path: &[bookmark_sync::types::bookmark::BookMark]) -> Vec<&str> {
    path.iter().map(|b| b.title.as_str()).collect()
}

/// Every anchor becomes one leaf, in document order.
#[test]
fn test_parses_every_anchor_in_order() {
    let leaves = parse_bookmarks_html(EXPORT);
    let addresses: Vec<_> = leaves
        .iter()
        .map(|l| l.address.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(
        addresses,
        vec!["http://a.com/", "http://jira.example.com/", "http://tool.com/"]
    );
    assert!(leaves.iter().all(|l| l.kind == BookmarkKind::Bookmark));
}

/// Paths are nearest-first and leave out the outermost wrapper folder.
#[test]
fn test_folder_path_is_nearest_first_without_outermost() {
    let leaves = parse_bookmarks_html(EXPORT);

    assert!(leaves[0].parents.is_empty());
    assert_eq!(titles(&leaves[1].parents), vec!["Work"]);
    assert_eq!(titles(&leaves[2].parents), vec!["Tools", "Work"]);
    assert!(leaves[2].parents.iter().all(|p| p.is_folder()));
}

/// Titles are trimmed and export attributes are carried over.
#[test]
fn test_attributes_are_mapped() {
    let leaves = parse_bookmarks_html(EXPORT);

    assert_eq!(leaves[0].icon.as_deref(), Some("data:image/png;base64,AAAA"));
    assert_eq!(leaves[0].created, "1600000100");
    assert_eq!(leaves[2].title, "Tool");
    assert_eq!(leaves[2].updated, "1600000300");
    assert_eq!(leaves[1].parents[0].created, "1600000200");
    assert!(leaves[1].icon.is_none());
}

/// The same address twice, even in different folders, yields one leaf.
#[test]
fn test_duplicate_addresses_are_dropped() {
    let html = r#"<DL><p>
        <DT><H3>Bar</H3>
        <DL><p>
            <DT><A HREF="http://a.com/">A</A>
            <DT><H3>Elsewhere</H3>
            <DL><p>
                <DT><A HREF="http://a.com/">A again</A>
            </DL><p>
        </DL><p>
    </DL>"#;

    let leaves = parse_bookmarks_html(html);
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].title, "A");
}

/// Spellings of one address resolve to the same leaf.
#[test]
fn test_equivalent_addresses_are_dropped() {
    let html = r#"<DL><p>
        <DT><H3>Bar</H3>
        <DL><p>
            <DT><A HREF="http://a.com/">Canonical</A>
            <DT><A HREF="http://a.com">No slash</A>
            <DT><A HREF=" HTTP://A.COM/ ">Shouting</A>
        </DL><p>
    </DL>"#;

    let leaves = parse_bookmarks_html(html);
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].title, "Canonical");
    assert_eq!(leaves[0].address.as_deref(), Some("http://a.com/"));
}

/// Anchors outside the top-level list are not bookmarks.
#[test]
fn test_anchors_outside_the_list_are_ignored() {
    let html = r#"<p><a href="http://stray.com/">Stray</a></p>
        <DL><p><DT><A HREF="http://kept.com/">Kept</A></DL>"#;

    let leaves = parse_bookmarks_html(html);
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].address.as_deref(), Some("http://kept.com/"));
}

/// An export without any list produces nothing rather than an error.
#[test]
fn test_export_without_list_is_empty() {
    let html = "<!DOCTYPE NETSCAPE-Bookmark-file-1><TITLE>Bookmarks</TITLE><H1>Bookmarks</H1>";
    assert!(parse_bookmarks_html(html).is_empty());
}
