use crate::matching::models::MatchResult;

/// Orders results by score, highest first. The sort is stable, so ties keep
/// their original relative order.
pub fn rank_results(mut results: Vec<MatchResult>) -> Vec<MatchResult> {
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::models::JobPosting;

    fn scored(id: &str, score: u8) -> MatchResult {
        let job = JobPosting {
            id: id.to_string(),
            ..Default::default()
        };
        MatchResult {
            score,
            ..MatchResult::for_job(&job)
        }
    }

    fn ids(results: &[MatchResult]) -> Vec<&str> {
        results.iter().map(|r| r.job_id.as_str()).collect()
    }

    #[test]
    fn test_ranks_descending() {
        let ranked = rank_results(vec![scored("a", 30), scored("b", 85), scored("c", 50)]);
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank_results(vec![
            scored("first", 70),
            scored("low", 10),
            scored("second", 70),
            scored("third", 70),
        ]);
        assert_eq!(ids(&ranked), vec!["first", "second", "third", "low"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_results(Vec::new()).is_empty());
    }
}
