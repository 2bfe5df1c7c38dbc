// Forest builder
// Folds flat leaf records (with folder paths) into a nested folder tree.

use crate::types::bookmark::BookMark;

/// Builds a forest from leaves whose `parents` are ordered nearest-first.
///
/// Each path is walked root-first. Within one scope (the root list or the
/// children of a single folder) folders sharing a title collapse into one
/// node, so sibling paths merge; same-titled folders in different scopes stay
/// distinct. The leaves' `parents` are consumed.
///
/// Each level is a linear scan of its scope, which is fine for export-sized
/// inputs.
pub fn build_nested_bookmarks(leaves: Vec<BookMark>) -> Vec<BookMark> {
    let mut roots: Vec<BookMark> = Vec::new();

    for mut leaf in leaves {
        let mut path = std::mem::take(&mut leaf.parents);
        path.reverse();

        let mut scope = &mut roots;
        for ancestor in &path {
            scope = &mut find_or_create_folder(scope, ancestor).children;
        }
        scope.push(leaf);
    }

    roots
}

/// Returns the folder titled like `stub` in `scope`, appending one if absent.
pub fn find_or_create_folder<'a>(scope: &'a mut Vec<BookMark>, stub: &BookMark) -> &'a mut BookMark {
    let index = match scope
        .iter()
        .position(|node| node.is_folder() && node.title == stub.title)
    {
        Some(index) => index,
        None => {
            let mut folder = BookMark::folder(&stub.title);
            folder.created = stub.created.clone();
            folder.updated = stub.updated.clone();
            scope.push(folder);
            scope.len() - 1
        }
    };
    &mut scope[index]
}
