//! Configuration types for the SocialSearchService.

/// Name of the posting configuration whose documents drive automatic posting.
pub const CONTENT_POSTING: &str = "ContentPosting";

/// Configuration for the SocialSearchService.
#[derive(Debug, Clone)]
pub struct SocialSearchServiceConfig {
    /// Name of the posting configuration used by `messages_ready_to_post`.
    ///
    /// Matched exactly (case-sensitive). Defaults to `"ContentPosting"`.
    pub content_posting_name: String,
}

impl Default for SocialSearchServiceConfig {
    fn default() -> Self {
        Self {
            content_posting_name: CONTENT_POSTING.to_string(),
        }
    }
}
