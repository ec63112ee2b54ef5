use std::hash::Hash;

/// Invert a map by swapping keys and values
pub fn invert_map<K, V, MK, MV>(original: MK) -> MV
where
    K: Ord + Hash + Eq,
    V: Ord + Hash + Eq + Clone,
    MK: IntoIterator<Item = (K, V)>,
    MV: FromIterator<(V, K)>,
{
    original
        .into_iter()
        .map(|(key, value)| (value, key))
        .collect()
}

/// Index of the largest value in each row. Ties resolve to the lowest index.
pub fn argmax_rows(rows: &[Vec<f32>]) -> Vec<usize> {
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f32::NEG_INFINITY), |best, (i, &v)| {
                    if v > best.1 {
                        (i, v)
                    } else {
                        best
                    }
                })
                .0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;

    #[test]
    fn test_invert_map() {
        let label2id = HashMap::from([("ham".to_string(), 0), ("spam".to_string(), 1)]);

        let id2label: BTreeMap<usize, String> = invert_map(label2id);

        assert_eq!(id2label[&0], "ham");
        assert_eq!(id2label[&1], "spam");
    }

    #[test]
    fn test_argmax_rows_prefers_first_on_ties() {
        let rows = vec![vec![0.5, 0.5], vec![0.2, 0.8], vec![0.9, 0.1]];

        assert_eq!(argmax_rows(&rows), vec![0, 1, 0]);
    }
}
