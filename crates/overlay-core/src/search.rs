//! Depth-first search of the window tree by class name

use std::collections::HashSet;

use tracing::debug;

use crate::traits::{WindowId, WindowSystem};

/// Find the first window below `root` whose class hint equals `class_name`.
///
/// Children are checked in stacking order, each before its own subtree.
/// Recursion stops at `max_depth` and never revisits a window.
pub fn find_window_by_class<W: WindowSystem + ?Sized>(
    windows: &mut W,
    root: WindowId,
    class_name: &str,
    max_depth: usize,
) -> Option<WindowId> {
    let mut visited = HashSet::new();
    visited.insert(root);
    search(windows, root, class_name, max_depth, &mut visited)
}

fn search<W: WindowSystem + ?Sized>(
    windows: &mut W,
    parent: WindowId,
    class_name: &str,
    depth_left: usize,
    visited: &mut HashSet<WindowId>,
) -> Option<WindowId> {
    if depth_left == 0 {
        return None;
    }

    let children = match windows.child_windows(parent) {
        Ok(children) => children,
        Err(e) => {
            // Windows can vanish between listing and querying
            debug!("Skipping subtree of {:?}: {}", parent, e);
            return None;
        }
    };

    for child in children {
        if !visited.insert(child) {
            continue;
        }
        if windows.class_name(child).as_deref() == Some(class_name) {
            return Some(child);
        }
        if let Some(found) = search(windows, child, class_name, depth_left - 1, visited) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_backend::DummyPlatform;
    use crate::traits::Geometry;

    #[test]
    fn test_finds_nested_window() {
        let mut platform = DummyPlatform::new();
        let root = platform.root();
        let frame = platform.add_window(root, "Frame", Geometry::default());
        let inner = platform.add_window(frame, "GStreamer", Geometry::default());

        assert_eq!(find_window_by_class(&mut platform, root, "GStreamer", 8), Some(inner));
    }

    #[test]
    fn test_first_match_in_depth_first_order() {
        let mut platform = DummyPlatform::new();
        let root = platform.root();
        let first = platform.add_window(root, "Frame", Geometry::default());
        let deep = platform.add_window(first, "Player", Geometry::default());
        platform.add_window(root, "Player", Geometry::default());

        assert_eq!(find_window_by_class(&mut platform, root, "Player", 8), Some(deep));
    }

    #[test]
    fn test_missing_class() {
        let mut platform = DummyPlatform::new();
        let root = platform.root();
        platform.add_window(root, "Frame", Geometry::default());

        assert_eq!(find_window_by_class(&mut platform, root, "GStreamer", 8), None);
    }

    #[test]
    fn test_depth_limit() {
        let mut platform = DummyPlatform::new();
        let root = platform.root();
        let a = platform.add_window(root, "A", Geometry::default());
        let b = platform.add_window(a, "B", Geometry::default());
        let c = platform.add_window(b, "Target", Geometry::default());

        assert_eq!(find_window_by_class(&mut platform, root, "Target", 2), None);
        assert_eq!(find_window_by_class(&mut platform, root, "Target", 3), Some(c));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut platform = DummyPlatform::new();
        let root = platform.root();
        let a = platform.add_window(root, "A", Geometry::default());
        let b = platform.add_window(a, "B", Geometry::default());
        platform.link_child(b, a);

        assert_eq!(find_window_by_class(&mut platform, root, "Target", 1000), None);
    }
}
