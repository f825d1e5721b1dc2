//! Project ranking shared by the prompt builders and both fallback generators.
//!
//! Order: stars descending, then commits descending. Ties keep input order
//! (`sort_by` is stable).

use std::cmp::Ordering;

use crate::models::profile::RepositorySummary;

/// Upper bound on projects highlighted in any generated document.
pub const MAX_PROJECTS: usize = 5;

fn by_rank(a: &RepositorySummary, b: &RepositorySummary) -> Ordering {
    b.stars
        .cmp(&a.stars)
        .then_with(|| b.commits.cmp(&a.commits))
}

/// Returns references to `repos` in rank order.
pub fn rank_repositories(repos: &[RepositorySummary]) -> Vec<&RepositorySummary> {
    let mut ranked: Vec<&RepositorySummary> = repos.iter().collect();
    ranked.sort_by(|a, b| by_rank(a, b));
    ranked
}

/// The `limit` best-ranked repositories.
pub fn top_repositories(repos: &[RepositorySummary], limit: usize) -> Vec<&RepositorySummary> {
    let mut ranked = rank_repositories(repos);
    ranked.truncate(limit);
    ranked
}

/// Sorts in place; re-sorting an already ranked list leaves it unchanged.
pub fn sort_by_rank(repos: &mut [RepositorySummary]) {
    repos.sort_by(by_rank);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, stars: u64, commits: u64) -> RepositorySummary {
        RepositorySummary {
            name: name.to_string(),
            stars,
            commits,
            ..Default::default()
        }
    }

    fn names(ranked: &[&RepositorySummary]) -> Vec<String> {
        ranked.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_stars_descending() {
        let repos = vec![repo("a", 1, 0), repo("b", 9, 0), repo("c", 5, 0)];
        assert_eq!(names(&rank_repositories(&repos)), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_commits_break_star_ties() {
        let repos = vec![repo("a", 3, 10), repo("b", 3, 50)];
        assert_eq!(names(&rank_repositories(&repos)), vec!["b", "a"]);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let repos = vec![
            repo("first", 2, 0),
            repo("second", 2, 0),
            repo("third", 2, 0),
            repo("top", 8, 0),
        ];
        assert_eq!(
            names(&rank_repositories(&repos)),
            vec!["top", "first", "second", "third"]
        );
    }

    #[test]
    fn test_top_repositories_truncates() {
        let repos: Vec<_> = (0..8).map(|i| repo(&format!("r{i}"), i, 0)).collect();
        let top = top_repositories(&repos, MAX_PROJECTS);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].name, "r7");
    }

    #[test]
    fn test_sort_in_place_matches_ranked_view() {
        let mut repos = vec![repo("a", 1, 0), repo("b", 1, 0), repo("c", 4, 0)];
        let expected = names(&rank_repositories(&repos));
        sort_by_rank(&mut repos);
        let sorted: Vec<String> = repos.iter().map(|r| r.name.clone()).collect();
        assert_eq!(sorted, expected);
    }
}
