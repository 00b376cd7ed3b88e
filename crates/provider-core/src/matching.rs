use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::trace;

use crate::projects::RecentProject;

/// Minimum name similarity for a project to count as a name match.
const NAME_SCORE_CUTOFF: u32 = 50;

/// Rank `candidates` against the given search `terms`.
///
/// Terms are joined into one space-separated query which is scored twice per
/// candidate: once against the display name with a plain similarity ratio
/// (cut off below [`NAME_SCORE_CUTOFF`], so near-exact name hits dominate and
/// noisy partial matches drop out), and once against the full path with a
/// token-sort ratio, because path components may appear in a different order
/// than typed ("myproj dev" vs "~/dev/myproj"). The combined list collapses
/// to IDs in first-occurrence order after sorting by score.
pub fn find_matching_projects<S: AsRef<str>>(
    candidates: &IndexMap<String, RecentProject>,
    terms: &[S],
) -> Vec<String> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let query = terms
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");

    let mut scored: Vec<(u32, &str)> = Vec::new();
    for (id, project) in candidates {
        let name_score = similarity_ratio(&query, &project.name);
        if name_score >= NAME_SCORE_CUTOFF {
            scored.push((name_score, id.as_str()));
        }
    }
    for (id, project) in candidates {
        let path_score = token_sort_ratio(&query, &project.path.to_string_lossy());
        scored.push((path_score, id.as_str()));
    }

    // TODO: scores sort ascending here, so weaker matches surface first when
    // the shell truncates the list. Verify the intended direction before
    // changing it; flipping this reorders shell-visible results.
    scored.sort_by_key(|(score, _)| *score);
    trace!(?scored, query, "combined match scores");

    let mut seen = HashSet::new();
    scored
        .into_iter()
        .filter(|(_, id)| seen.insert(*id))
        .map(|(_, id)| id.to_string())
        .collect()
}

/// Normalized edit similarity of two strings on a 0–100 scale,
/// case-insensitive.
fn similarity_ratio(left: &str, right: &str) -> u32 {
    let similarity =
        strsim::normalized_levenshtein(&left.to_lowercase(), &right.to_lowercase());
    (similarity * 100.0).round() as u32
}

/// Similarity of two strings after splitting each into alphanumeric tokens
/// and sorting them, so token order does not penalize the score.
fn token_sort_ratio(left: &str, right: &str) -> u32 {
    let similarity = strsim::normalized_levenshtein(&token_sort_key(left), &token_sort_key(right));
    (similarity * 100.0).round() as u32
}

fn token_sort_key(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
