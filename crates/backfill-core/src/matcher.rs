//! Nearest-in-time pairing of people with posts.
//!
//! A person is attributed to the post whose `created_at` is closest to the
//! person's own `created_at`. Exact ties go to the post that appears first in
//! the fetched order.
//!
//! [`closest_post`] is the straightforward scan. [`PostIndex`] sorts the posts
//! once and answers each lookup with a binary search; it returns the same post
//! as the scan for every input, ties included.

use chrono::{DateTime, TimeDelta, Utc};

use crate::types::Post;

/// Linear scan for the post closest in time to `at`.
///
/// Returns `None` only when `posts` is empty.
#[must_use]
pub fn closest_post(posts: &[Post], at: DateTime<Utc>) -> Option<&Post> {
    let mut best: Option<(&Post, TimeDelta)> = None;
    for post in posts {
        let delta = (post.created_at - at).abs();
        match best {
            Some((_, best_delta)) if best_delta <= delta => {}
            _ => best = Some((post, delta)),
        }
    }
    best.map(|(post, _)| post)
}

/// Posts sorted by creation time for repeated nearest lookups.
#[derive(Debug)]
pub struct PostIndex<'a> {
    posts: &'a [Post],
    /// One entry per distinct timestamp, ascending, paired with the fetched
    /// position of the first post carrying it.
    entries: Vec<(DateTime<Utc>, usize)>,
}

impl<'a> PostIndex<'a> {
    #[must_use]
    pub fn new(posts: &'a [Post]) -> Self {
        let mut entries: Vec<(DateTime<Utc>, usize)> = posts
            .iter()
            .enumerate()
            .map(|(position, post)| (post.created_at, position))
            .collect();
        entries.sort_unstable();
        entries.dedup_by_key(|entry| entry.0);
        Self { posts, entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// The post closest in time to `at`, or `None` if there are no posts.
    #[must_use]
    pub fn closest(&self, at: DateTime<Utc>) -> Option<&'a Post> {
        let split = self.entries.partition_point(|&(created_at, _)| created_at <= at);
        let below = split
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .copied();
        let above = self.entries.get(split).copied();

        let (_, position) = match (below, above) {
            (Some(lo), Some(hi)) => {
                let lo_delta = at - lo.0;
                let hi_delta = hi.0 - at;
                if lo_delta < hi_delta || (lo_delta == hi_delta && lo.1 < hi.1) {
                    lo
                } else {
                    hi
                }
            }
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => return None,
        };
        self.posts.get(position)
    }
}
