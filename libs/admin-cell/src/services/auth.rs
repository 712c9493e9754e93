use anyhow::Result;
use reqwest::Method;
use tracing::{debug, info, instrument, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::AdminUser;
use crate::services::password::PasswordService;

pub struct AdminAuthService {
    supabase: SupabaseClient,
}

impl AdminAuthService {
    /// `admin_users` is readable with the service-role key only.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::privileged(config),
        }
    }

    /// Returns the administrator when the credentials match, `None` otherwise.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<AdminUser>> {
        let path = format!(
            "/rest/v1/admin_users?email=eq.{}&select=id,email,password_hash",
            urlencoding::encode(email.trim())
        );
        let users: Vec<AdminUser> = self.supabase.request(Method::GET, &path, None).await?;

        let Some(admin) = users.into_iter().next() else {
            debug!("No administrator with that email");
            return Ok(None);
        };

        match PasswordService::verify_password(password, &admin.password_hash) {
            Ok(true) => {
                info!("Administrator {} signed in", admin.id);
                Ok(Some(admin))
            }
            Ok(false) => Ok(None),
            Err(e) => {
                warn!("Stored password hash for administrator {} is unreadable: {}", admin.id, e);
                Ok(None)
            }
        }
    }
}
