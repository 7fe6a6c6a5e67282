use std::collections::HashMap;

use crate::core::Like;

/// Days of like history that feed the trending ranking
pub const TRENDING_WINDOW_DAYS: i64 = 30;

/// Count likes per book and rank book ids by count descending.
///
/// The caller is expected to have already narrowed `likes` to the
/// trending window via the Data Service cutoff query. Equal counts
/// order by ascending book id so the ranking is reproducible.
pub fn rank_by_like_count(likes: &[Like], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for like in likes {
        *counts.entry(like.book_id.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(id, count)| (id.to_string(), count))
        .collect();

    ranked.sort_by(|(id_a, count_a), (id_b, count_b)| {
        count_b.cmp(count_a).then_with(|| id_a.cmp(id_b))
    });

    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_by_count() {
        let likes = vec![
            Like::new("a", "u1"),
            Like::new("b", "u1"),
            Like::new("b", "u2"),
            Like::new("b", "u3"),
            Like::new("c", "u1"),
            Like::new("c", "u2"),
        ];

        let ranked = rank_by_like_count(&likes, 10);
        assert_eq!(ranked[0], ("b".to_string(), 3));
        assert_eq!(ranked[1], ("c".to_string(), 2));
        assert_eq!(ranked[2], ("a".to_string(), 1));
    }

    #[test]
    fn test_limit_and_tiebreak() {
        let likes = vec![Like::new("z", "u1"), Like::new("a", "u2")];

        let ranked = rank_by_like_count(&likes, 1);
        assert_eq!(ranked.len(), 1);
        // equal counts: ascending id wins
        assert_eq!(ranked[0].0, "a");
    }

    #[test]
    fn test_empty_likes() {
        assert!(rank_by_like_count(&[], 5).is_empty());
    }
}
