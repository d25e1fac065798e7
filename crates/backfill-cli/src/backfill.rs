//! The engagement backfill run.
//!
//! Fetches posts and engaged people for one tenant, pairs each person with
//! the post closest to them in time, and inserts an inferred "like" where no
//! engagement links the pair yet. Bulk-read failures abort the run; failures
//! for a single person are reported and the loop moves on.

use std::io::Write;

use backfill_core::{NewEngagement, Person, Post, PostIndex};
use backfill_rest::RestClient;
use uuid::Uuid;

/// Knobs for a single run, resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub(crate) struct BackfillOptions {
    pub tenant_id: Uuid,
    pub dry_run: bool,
    /// Print a milestone line after every N created engagements.
    pub progress_every: u32,
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct BackfillSummary {
    pub posts: usize,
    pub people: usize,
    /// People skipped because there was no post to pair them with.
    pub unmatched: usize,
    pub already_linked: usize,
    pub created: usize,
    /// Inserts skipped because of `--dry-run`.
    pub would_create: usize,
    pub failed: usize,
}

/// What happened to one person.
#[derive(Debug, PartialEq, Eq)]
enum PersonOutcome {
    Created,
    WouldCreate,
    AlreadyLinked,
    /// The existence check failed, so no insert was attempted.
    CheckFailed(String),
    InsertFailed(String),
}

/// Runs the backfill, writing progress and per-person errors to `out`.
///
/// # Errors
///
/// Returns an error if either bulk read fails or `out` cannot be written.
/// Per-person check or insert failures are counted in the summary instead.
pub(crate) async fn run_backfill<W: Write>(
    client: &RestClient,
    options: &BackfillOptions,
    out: &mut W,
) -> anyhow::Result<BackfillSummary> {
    let tenant_id = options.tenant_id;
    writeln!(out, "Starting backfill for tenant {tenant_id}...")?;

    let posts = client
        .fetch_posts(tenant_id)
        .await
        .map_err(|e| anyhow::anyhow!("failed to fetch posts: {e}"))?;
    writeln!(out, "Found {} posts", posts.len())?;

    let people = client
        .fetch_engaged_people(tenant_id)
        .await
        .map_err(|e| anyhow::anyhow!("failed to fetch people: {e}"))?;
    writeln!(out, "Found {} people with engagement scores", people.len())?;

    let mut summary = BackfillSummary {
        posts: posts.len(),
        people: people.len(),
        ..BackfillSummary::default()
    };

    let index = PostIndex::new(&posts);
    let progress_every = usize::try_from(options.progress_every.max(1)).unwrap_or(usize::MAX);

    for person in &people {
        let Some(post) = index.closest(person.created_at) else {
            tracing::warn!(person_id = %person.id, "no post to pair person with; skipping");
            summary.unmatched += 1;
            continue;
        };

        match write_engagement(client, post, person, tenant_id, options.dry_run).await {
            PersonOutcome::Created => {
                summary.created += 1;
                if summary.created % progress_every == 0 {
                    writeln!(out, "Created {} engagement records...", summary.created)?;
                }
            }
            PersonOutcome::WouldCreate => summary.would_create += 1,
            PersonOutcome::AlreadyLinked => summary.already_linked += 1,
            PersonOutcome::CheckFailed(message) => {
                summary.failed += 1;
                writeln!(
                    out,
                    "Error checking engagement for {}: {message}",
                    person.display_name()
                )?;
            }
            PersonOutcome::InsertFailed(message) => {
                summary.failed += 1;
                writeln!(
                    out,
                    "Error creating engagement for {}: {message}",
                    person.display_name()
                )?;
            }
        }
    }

    log_summary(&summary, tenant_id, options.dry_run);

    if options.dry_run {
        writeln!(
            out,
            "Dry run complete: would create {} engagement records ({} already linked)",
            summary.would_create, summary.already_linked
        )?;
    } else {
        writeln!(out, "Backfill complete!")?;
        writeln!(out, "Created {} engagement records", summary.created)?;
    }

    Ok(summary)
}

fn log_summary(summary: &BackfillSummary, tenant_id: Uuid, dry_run: bool) {
    tracing::info!(
        tenant_id = %tenant_id,
        posts = summary.posts,
        people = summary.people,
        created = summary.created,
        would_create = summary.would_create,
        already_linked = summary.already_linked,
        failed = summary.failed,
        unmatched = summary.unmatched,
        dry_run,
        "backfill finished"
    );
}

/// Checks for an existing link and inserts one if absent.
///
/// A failed existence check skips the insert: without it there is no way to
/// tell whether the insert would duplicate a row.
async fn write_engagement(
    client: &RestClient,
    post: &Post,
    person: &Person,
    tenant_id: Uuid,
    dry_run: bool,
) -> PersonOutcome {
    match client.engagement_exists(post.id, person.id, tenant_id).await {
        Ok(true) => {
            tracing::debug!(person_id = %person.id, post_id = %post.id, "engagement already exists");
            return PersonOutcome::AlreadyLinked;
        }
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(person_id = %person.id, error = %e, "engagement check failed");
            return PersonOutcome::CheckFailed(e.response_text());
        }
    }

    if dry_run {
        return PersonOutcome::WouldCreate;
    }

    let engagement = NewEngagement::inferred_like(post, person, tenant_id);
    match client.insert_engagement(&engagement).await {
        Ok(()) => PersonOutcome::Created,
        Err(e) => {
            tracing::warn!(person_id = %person.id, error = %e, "engagement insert failed");
            PersonOutcome::InsertFailed(e.response_text())
        }
    }
}

#[cfg(test)]
#[path = "backfill_test.rs"]
mod tests;
