use crate::cache::ObjectCache;
use crate::cache::register::{get_object_cache_plugin, registered_object_cache_plugins};
use crate::config::AppConfig;
use crate::errors::{Result, TAFeedbackError};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::{generate_random_password, hash_password};
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        TAFeedbackError::cache_plugin_not_found(format!("缓存后端 '{name}' 未注册"))
    })?;
    let cache = constructor().await?;
    Ok(Arc::from(cache))
}

/// 按配置创建缓存，失败时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    debug!(
        "Registered cache backends: {:?}",
        registered_object_cache_plugins()
    );

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Using {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != FALLBACK_CACHE => {
            warn!(
                "Failed to create {} cache ({}), falling back to {}",
                cache_type,
                e.format_simple(),
                FALLBACK_CACHE
            );
            build_cache(FALLBACK_CACHE).await
        }
        Err(e) => Err(e),
    }
}

/// 数据库中没有任何用户时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(0) => info!("No users found, creating default admin account"),
        Ok(count) => {
            debug!("{} user(s) present, skipping admin seed", count);
            return;
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let generated = generate_random_password(16);
        warn!("ADMIN_PASSWORD is not set; generated admin password: {}", generated);
        warn!("Store this password now, it will not be shown again");
        generated
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        email: "admin@localhost".to_string(),
        password: password_hash,
        role: UserRole::Admin,
        display_name: Some("Administrator".to_string()),
    };

    match storage.create_user(admin).await {
        Ok(user) => info!("Default admin created (ID: {}, username: {})", user.id, user.username),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 启动前准备：存储（含迁移）、默认管理员、缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // sqlx 与 redis 共用同一个 rustls 提供者，重复安装时忽略
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await?;

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_utils::setup_storage;

    #[tokio::test]
    async fn test_seed_admin_only_on_empty_database() {
        let storage: Arc<dyn Storage> = Arc::new(setup_storage().await);

        seed_admin(&storage).await;
        assert_eq!(storage.count_users().await.unwrap(), 1);
        let admin = storage
            .get_user_by_username_or_email(DEFAULT_ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        seed_admin(&storage).await;
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_cache_backend() {
        let err = build_cache("memcached").await.err().unwrap();
        assert_eq!(err.code(), "E002");
    }
}
