//! Solution files. Each `sol_<n>` holds two lines: the canonical encoded
//! deck and the encoded solution. New files take the lowest non-existing
//! index; lookups scan from zero and match on the deck line.

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CachedSolution {
    pub path: PathBuf,
    pub solution: String,
}

/// Scan `sol_0, sol_1, ...` for a file whose first line matches
/// `deck_code`. The scan stops at the first missing index, matching the
/// writer's next-n policy.
pub fn find_cached_solution(dir: &Path, deck_code: &str) -> Result<Option<CachedSolution>, String> {
    for n in 0.. {
        let path = dir.join(format!("sol_{n}"));
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let mut lines = content.lines();
        let deck_line = lines.next().unwrap_or("").trim_end_matches('\r');
        if deck_line != deck_code {
            continue;
        }
        let solution = lines.next().unwrap_or("").trim_end_matches('\r').to_string();
        return Ok(Some(CachedSolution { path, solution }));
    }
    Ok(None)
}

/// Write a solved deck to the lowest free `sol_<n>`, creating the
/// directory if needed. Returns the path written.
pub fn save_solution(dir: &Path, deck_code: &str, solution: &str) -> Result<PathBuf, String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
    let mut n = 0;
    let path = loop {
        let candidate = dir.join(format!("sol_{n}"));
        if !candidate.exists() {
            break candidate;
        }
        n += 1;
    };
    fs::write(&path, format!("{deck_code}\n{solution}\n"))
        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    Ok(path)
}
