use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::server::RevocationPurger;
use crate::settings::Settings;
use anyhow::{Context, anyhow};
use chrono::TimeDelta;
use jsonwebtoken::Algorithm;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub profile_service: Arc<dyn ProfileService>,
    pub blog_service: Arc<dyn BlogService>,
    purge_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    pool: Option<MySqlPool>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let algorithm = Algorithm::from_str(&settings.auth.algorithm)
            .map_err(|e| anyhow!("auth.algorithm {:?}: {}", settings.auth.algorithm, e))?;
        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtCodec::try_new(JwtConfig {
            issuer: settings.auth.issuer.clone(),
            audience: settings.auth.audience.clone(),
            algorithm,
            signing_key: settings.auth.secret.0.clone().into_bytes(),
        })?);

        let policy = SessionPolicy {
            access_ttl: positive_ttl(
                "auth.access_ttl_minutes",
                TimeDelta::try_minutes(settings.auth.access_ttl_minutes),
            )?,
            refresh_ttl: positive_ttl(
                "auth.refresh_ttl_days",
                TimeDelta::try_days(settings.auth.refresh_ttl_days),
            )?,
        };
        let session_issuer = Arc::new(SessionIssuer::new(token_codec.clone(), policy));

        let credential_hasher: Arc<dyn CredentialHasher> =
            Arc::new(Argon2PasswordHasher::try_new(Argon2Config {
                memory_kib: settings.password.memory_kib,
                iterations: settings.password.iterations,
                parallelism: settings.password.parallelism,
            })?);

        let (pool, user_repo, blog_repo, storage_revocations): (
            Option<MySqlPool>,
            Arc<dyn UserRepo>,
            Arc<dyn BlogRepo>,
            Arc<dyn RevocationStore>,
        ) = match settings.storage.backend.as_str() {
            "memory" => {
                let user_repo: Arc<dyn UserRepo> = Arc::new(MemoryUserRepo::new());
                let blog_repo: Arc<dyn BlogRepo> = Arc::new(MemoryBlogRepo::new());
                let revocations: Arc<dyn RevocationStore> = Arc::new(MemoryRevocationStore::new());
                (None, user_repo, blog_repo, revocations)
            }
            "mysql" => {
                let dsn = settings
                    .storage
                    .mysql_dsn
                    .as_ref()
                    .ok_or_else(|| anyhow!("storage.mysql_dsn is required for the mysql backend"))?;
                let pool = MySqlPoolOptions::new()
                    .max_connections(settings.storage.max_connections)
                    .connect(&dsn.0)
                    .await
                    .context("connecting to mysql")?;
                let user_repo: Arc<dyn UserRepo> = Arc::new(MySqlUserRepo::new(pool.clone()));
                let blog_repo: Arc<dyn BlogRepo> = Arc::new(MySqlBlogRepo::new(pool.clone()));
                let revocations: Arc<dyn RevocationStore> =
                    Arc::new(MySqlRevocationStore::new(pool.clone()));
                (Some(pool), user_repo, blog_repo, revocations)
            }
            other => return Err(anyhow!("Unknown storage backend: {}", other)),
        };

        let revocation_store: Arc<dyn RevocationStore> =
            match settings.revocation.backend.as_str() {
                "storage" => storage_revocations,
                "redis" => {
                    let dsn = settings.revocation.redis_dsn.as_ref().ok_or_else(|| {
                        anyhow!("revocation.redis_dsn is required for the redis backend")
                    })?;
                    let redis_client = redis::Client::open(dsn.0.as_str())?;
                    let redis_manager = redis_client
                        .get_connection_manager()
                        .await
                        .context("connecting to redis")?;
                    Arc::new(RedisRevocationStore::new(
                        redis_manager,
                        settings.revocation.key_prefix.clone(),
                        policy.max_lifetime(),
                    ))
                }
                other => return Err(anyhow!("Unknown revocation backend: {}", other)),
            };

        let authenticator = Arc::new(Authenticator::new(
            revocation_store.clone(),
            token_codec,
            user_repo.clone(),
        ));

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            user_repo.clone(),
            credential_hasher,
            revocation_store.clone(),
            authenticator,
            session_issuer,
        ));
        let profile_service: Arc<dyn ProfileService> =
            Arc::new(RealProfileService::new(user_repo));
        let blog_service: Arc<dyn BlogService> = Arc::new(RealBlogService::new(blog_repo));

        // region runtime infra
        let cancel = CancellationToken::new();

        let purger = RevocationPurger::new(
            revocation_store,
            policy.max_lifetime(),
            Duration::from_secs(settings.revocation.purge_interval_secs.max(1)),
            cancel.clone(),
        );
        let purge_handle = tokio::spawn(async move {
            let _ = purger.run().await;
        });

        // endregion

        info!(
            storage = %settings.storage.backend,
            revocation = %settings.revocation.backend,
            "server started"
        );

        Ok(Self {
            auth_service,
            profile_service,
            blog_service,
            purge_handle: Mutex::new(Some(purge_handle)),
            cancel,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        let purge_handle = self.purge_handle.lock().ok().and_then(|mut lock| lock.take());
        if let Some(handle) = purge_handle {
            let r = handle.await;
            info!("purge handle dropped: {:?}", r);
        }

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

fn positive_ttl(name: &str, ttl: Option<TimeDelta>) -> anyhow::Result<TimeDelta> {
    match ttl {
        Some(ttl) if ttl > TimeDelta::zero() => Ok(ttl),
        _ => Err(anyhow!("{} must be a positive duration", name)),
    }
}
