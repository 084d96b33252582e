//! Top-k selection with a total, reproducible order.

use std::cmp::Ordering;

use lumen_core::{LumenError, LumenResult, Prediction, PredictionList};

/// Order of two class indices in a ranking: higher score first, NaN last,
/// equal scores by ascending index.
pub fn rank_order(scores: &[f32], a: usize, b: usize) -> Ordering {
    let (sa, sb) = (scores[a], scores[b]);
    let by_score = match (sa.is_nan(), sb.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => sb.partial_cmp(&sa).unwrap_or(Ordering::Equal),
    };
    by_score.then(a.cmp(&b))
}

/// The `k` highest scores, best first.
///
/// Uses partial selection, so the cost is `O(n + k log k)`. `scores` is not
/// modified. Fails with `InvalidTopKRequest` unless `1 <= k <= scores.len()`.
pub fn top_k(scores: &[f32], k: usize) -> LumenResult<PredictionList> {
    if k == 0 || k > scores.len() {
        return Err(LumenError::InvalidTopKRequest {
            k,
            len: scores.len(),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    let compare = |a: &usize, b: &usize| rank_order(scores, *a, *b);
    if k < order.len() {
        order.select_nth_unstable_by(k - 1, compare);
        order.truncate(k);
    }
    // rank_order never returns Equal for distinct indices, so unstable is deterministic
    order.sort_unstable_by(compare);

    Ok(PredictionList::from_ranked(
        order
            .into_iter()
            .map(|index| Prediction::new(index, scores[index]))
            .collect(),
    ))
}
