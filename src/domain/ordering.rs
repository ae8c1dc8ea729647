//! Ordering Policy
//!
//! `order_no` is sparse and tie-tolerant. New wishes go after the current
//! maximum; explicit keys are written verbatim and siblings are never shifted.
//! Display order breaks ties by creation time, then by id.

use std::cmp::Ordering;

use super::wish::{OrderUpdate, Wish};

/// Key for a wish appended at the end: `max(active order_no) + 1`, or `1`
/// when there are no active wishes
pub fn next_order_no<'a>(wishes: impl IntoIterator<Item = &'a Wish>) -> i64 {
    wishes
        .into_iter()
        .filter(|w| w.is_active())
        .map(|w| w.order_no)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Total display order: `order_no`, then `created_at`, then id
pub fn display_cmp(a: &Wish, b: &Wish) -> Ordering {
    a.order_no
        .cmp(&b.order_no)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.as_str().cmp(b.id.as_str()))
}

pub fn sort_for_display(wishes: &mut [Wish]) {
    wishes.sort_by(display_cmp);
}

/// Split a fetched sequence into (active, soft-deleted), both in display order
pub fn partition_for_display(wishes: Vec<Wish>) -> (Vec<Wish>, Vec<Wish>) {
    let (mut active, mut deleted): (Vec<_>, Vec<_>) =
        wishes.into_iter().partition(Wish::is_active);
    sort_for_display(&mut active);
    sort_for_display(&mut deleted);
    (active, deleted)
}

/// Explicit renumbering pass: assigns `1..=n` following the current display
/// order and returns only the wishes whose key changes. Feed the result to a
/// batch reorder.
pub fn renumber(wishes: &[Wish]) -> Vec<OrderUpdate> {
    let mut ordered: Vec<&Wish> = wishes.iter().filter(|w| w.is_active()).collect();
    ordered.sort_by(|a, b| display_cmp(a, b));

    ordered
        .into_iter()
        .zip(1i64..)
        .filter(|(wish, order_no)| wish.order_no != *order_no)
        .map(|(wish, order_no)| OrderUpdate::new(wish.id.clone(), order_no))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WishId;
    use chrono::{TimeZone, Utc};

    fn wish(id: &str, order_no: i64, created_secs: i64) -> Wish {
        let created = Utc.timestamp_opt(1_700_000_000 + created_secs, 0).unwrap();
        Wish {
            id: WishId::from(id),
            organization_id: "org".to_string(),
            title: id.to_string(),
            note: String::new(),
            order_no,
            created_at: created,
            updated_at: created,
            deleted_at: None,
        }
    }

    #[test]
    fn test_next_order_no_empty_is_one() {
        assert_eq!(next_order_no(&[]), 1);
    }

    #[test]
    fn test_next_order_no_follows_max() {
        let wishes = vec![wish("a", 4, 0), wish("b", 9, 1), wish("c", 2, 2)];
        assert_eq!(next_order_no(&wishes), 10);
    }

    #[test]
    fn test_next_order_no_ignores_soft_deleted() {
        let mut gone = wish("b", 50, 1);
        gone.deleted_at = Some(Utc::now());
        let wishes = vec![wish("a", 3, 0), gone];
        assert_eq!(next_order_no(&wishes), 4);
    }

    #[test]
    fn test_ties_break_on_created_then_id() {
        let mut wishes = vec![
            wish("zeta", 1, 5),
            wish("beta", 1, 5),
            wish("alpha", 1, 9),
            wish("first", 0, 99),
        ];
        sort_for_display(&mut wishes);

        let ids: Vec<&str> = wishes.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "beta", "zeta", "alpha"]);
    }

    #[test]
    fn test_partition_separates_soft_deleted() {
        let mut gone = wish("gone", 1, 0);
        gone.deleted_at = Some(Utc::now());
        let (active, deleted) = partition_for_display(vec![wish("b", 2, 0), gone, wish("a", 1, 0)]);

        assert_eq!(active.iter().map(|w| w.id.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(deleted.len(), 1);
    }

    #[test]
    fn test_renumber_only_emits_changes() {
        let wishes = vec![wish("a", 1, 0), wish("b", 7, 1), wish("c", 7, 2), wish("d", 20, 3)];
        let updates = renumber(&wishes);

        assert_eq!(
            updates,
            vec![
                OrderUpdate::new("b", 2),
                OrderUpdate::new("c", 3),
                OrderUpdate::new("d", 4),
            ]
        );
    }
}
