use std::collections::HashMap;

use crate::api::types::ParsedProvision;

/// Length of the content once whitespace runs are collapsed, in characters
fn normalized_len(content: &str) -> usize {
    content.split_whitespace().collect::<Vec<_>>().join(" ").chars().count()
}

/// Collapse provisions sharing a trimmed ref into one.
///
/// Duplicates are folded pairwise into a running winner: a later provision
/// replaces it only when its normalized content is strictly longer, so ties
/// keep the earlier one. A missing title is backfilled from the loser.
/// Output keeps the position of each ref's first occurrence. Returns the
/// survivors and the number of provisions dropped.
pub fn dedup_provisions(provisions: Vec<ParsedProvision>) -> (Vec<ParsedProvision>, usize) {
    let mut winners: Vec<ParsedProvision> = Vec::with_capacity(provisions.len());
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0;

    for mut candidate in provisions {
        let key = candidate.provision_ref.trim().to_string();
        candidate.provision_ref = key.clone();

        let Some(&slot) = slots.get(&key) else {
            slots.insert(key, winners.len());
            winners.push(candidate);
            continue;
        };

        dropped += 1;
        let current = &mut winners[slot];
        if normalized_len(&candidate.content) > normalized_len(&current.content) {
            if candidate.title.is_none() {
                candidate.title = current.title.take();
            }
            *current = candidate;
        } else if current.title.is_none() {
            current.title = candidate.title;
        }
    }

    (winners, dropped)
}
