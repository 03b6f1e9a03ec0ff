//! Container path normalization.

/// Normalize a container path for storage in, and comparison against, the search index.
///
/// Containers are scoped to a partition and compared case-insensitively, so the
/// normalized form is `{partition}:{path}` in lowercase, with surrounding whitespace and
/// slashes removed from the path.
///
/// # Example
///
/// ```
/// use social_search_shared::normalize_container;
///
/// assert_eq!(
///     normalize_container(" /Social/Campaigns/Spring/ ", "Master"),
///     "master:social/campaigns/spring"
/// );
/// ```
pub fn normalize_container(container: &str, partition: &str) -> String {
    let path = container.trim().trim_matches('/');
    format!(
        "{}:{}",
        partition.trim().to_lowercase(),
        path.to_lowercase()
    )
}
