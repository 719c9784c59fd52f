//! "Did you mean" suggestions by edit distance.

/// Candidates close enough to `unknown` to be worth suggesting, closest
/// first, at most `max` of them. Ties keep candidate order.
pub fn suggest_similar<'a>(
    unknown: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max: usize,
) -> Vec<&'a str> {
    let threshold = default_threshold(unknown.chars().count());
    let lowered = unknown.to_lowercase();
    let mut scored: Vec<(usize, &'a str)> = candidates
        .into_iter()
        .filter(|c| *c != unknown)
        .map(|c| (edit_distance(&lowered, &c.to_lowercase()), c))
        .filter(|&(d, _)| d <= threshold)
        .collect();
    scored.sort_by_key(|&(d, _)| d);
    scored.dedup_by(|a, b| a.1 == b.1);
    scored.into_iter().take(max).map(|(_, c)| c).collect()
}

/// Levenshtein distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b.chars().enumerate() {
            let cost = usize::from(a_char != b_char);

            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

fn default_threshold(name_len: usize) -> usize {
    match name_len {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=10 => 3,
        n => (n / 2).min(5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_counts_single_edits() {
        assert_eq!(edit_distance("metre", "meter"), 2);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("sum", "sum"), 0);
    }

    #[test]
    fn suggestions_are_sorted_and_capped() {
        let names = ["average", "abs", "any", "all", "round"];
        assert_eq!(suggest_similar("avrage", names, 3), vec!["average"]);
        assert_eq!(suggest_similar("ab", names, 2), vec!["abs"]);
        assert!(suggest_similar("zzzzzz", names, 3).is_empty());
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(suggest_similar("KM", ["km", "m"], 3), vec!["km", "m"]);
    }
}
