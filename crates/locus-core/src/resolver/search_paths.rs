//! Module directory search paths (`node_modules` walking).

use crate::paths::PathOps;

/// Build the ordered list of directories to probe for a bare specifier.
///
/// Walks from `from_dir` (made absolute against `cwd`) up to and including the
/// root. Relative module directories are joined onto every level; absolute
/// ones are fixed search roots emitted once, at the nearest level, in their
/// configured position. Duplicates are dropped, keeping the first occurrence.
/// Entries are compared as exact strings, with no case folding even under the
/// Windows convention.
#[must_use]
pub fn build_search_paths(
    path: &dyn PathOps,
    cwd: &str,
    from_dir: &str,
    module_directories: &[String],
) -> Vec<String> {
    let start = path.resolve(cwd, &[from_dir]);

    let mut levels = vec![start.clone()];
    loop {
        let Some(current) = levels.last() else { break };
        let parent = path.dirname(current);
        if &parent == current {
            break;
        }
        levels.push(parent);
    }

    let mut dirs: Vec<String> = Vec::new();
    for (depth, level) in levels.iter().enumerate() {
        for module_dir in module_directories {
            let candidate = if path.is_absolute(module_dir) {
                if depth > 0 {
                    continue;
                }
                path.normalize(module_dir)
            } else {
                path.join(&[level.as_str(), module_dir.as_str()])
            };
            if !dirs.contains(&candidate) {
                dirs.push(candidate);
            }
        }
    }
    dirs
}
