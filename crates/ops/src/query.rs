//! Read-only remote queries

use safeprune_errors::Error;

use crate::{OpsCtx, RepositoryContents};

/// Top-level entries of a repository owned by the configured organization
///
/// # Errors
///
/// Returns an error if the listing fails or times out.
pub async fn repository_contents(ctx: &OpsCtx, repository: &str) -> Result<RepositoryContents, Error> {
    let owner = &ctx.config.remote.owner;
    let entries = ctx
        .remote
        .list_contents(owner, repository, ctx.config.remote.contents_timeout())
        .await?;

    tracing::debug!(repository, count = entries.len(), "listed repository contents");
    Ok(RepositoryContents {
        owner: owner.clone(),
        repository: repository.to_string(),
        entries,
    })
}
