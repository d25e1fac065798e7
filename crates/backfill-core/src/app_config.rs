use uuid::Uuid;

/// Tenant used when `BACKFILL_TENANT_ID` is not set.
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

#[derive(Clone)]
pub struct AppConfig {
    /// Project URL of the hosted store, without the `/rest/v1` suffix.
    pub supabase_url: String,
    /// Sent as the `apikey` header.
    pub supabase_service_key: String,
    /// Sent as `Authorization: Bearer <token>`.
    pub supabase_bearer_token: String,
    pub tenant_id: Uuid,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Print a milestone line after every N created engagements.
    pub progress_every: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_service_key", &"[redacted]")
            .field("supabase_bearer_token", &"[redacted]")
            .field("tenant_id", &self.tenant_id)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("progress_every", &self.progress_every)
            .finish()
    }
}
