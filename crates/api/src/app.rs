use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use domain::services::{
    AuthService, AuthUseCase, LocalService, LocalUseCase, PermissionLocalUseCase,
    PermissionProductUseCase, ProductService, ProductUseCase,
};
use persistence::repositories::{PgLocalRepository, PgProductRepository, PgUserRepository};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_session, trace_id};
use crate::routes::{auth, files, health, locals, products};
use crate::services::{CookieHelper, DiskFileStorage, JwtSessionIssuer};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub products: Arc<dyn ProductUseCase>,
    pub locals: Arc<dyn LocalUseCase>,
    pub auth: Arc<dyn AuthUseCase>,
    pub sessions: Arc<JwtSessionIssuer>,
    pub cookies: CookieHelper,
    pub files: Arc<DiskFileStorage>,
}

/// The use cases served over HTTP.
pub struct UseCases {
    pub products: Arc<dyn ProductUseCase>,
    pub locals: Arc<dyn LocalUseCase>,
    pub auth: Arc<dyn AuthUseCase>,
}

impl UseCases {
    /// PostgreSQL-backed use cases. Product and local operations sit behind
    /// the role policy; authentication runs before a user is known.
    pub fn postgres(
        pool: &PgPool,
        config: &Config,
        files: Arc<DiskFileStorage>,
        sessions: Arc<JwtSessionIssuer>,
    ) -> anyhow::Result<Self> {
        let product_repo = Arc::new(PgProductRepository::new(pool.clone()));
        let local_repo = Arc::new(PgLocalRepository::new(pool.clone()));
        let user_repo = Arc::new(PgUserRepository::new(pool.clone()));

        let registration_role = config
            .security
            .registration_role()
            .map_err(anyhow::Error::msg)?;

        Ok(Self {
            products: Arc::new(PermissionProductUseCase::new(ProductService::new(
                product_repo,
                local_repo.clone(),
                files.clone(),
            ))),
            locals: Arc::new(PermissionLocalUseCase::new(LocalService::new(local_repo))),
            auth: Arc::new(AuthService::new(
                user_repo.clone(),
                user_repo,
                files,
                sessions,
                registration_role,
            )),
        })
    }
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let sessions = Arc::new(session_issuer(&config)?);
    let files = Arc::new(file_storage(&config));
    let use_cases = UseCases::postgres(&pool, &config, files.clone(), sessions.clone())?;
    Ok(build_router(config, pool, use_cases, sessions, files))
}

/// Same router with caller-supplied use cases.
pub fn create_app_with_use_cases(
    config: Config,
    pool: PgPool,
    use_cases: UseCases,
) -> anyhow::Result<Router> {
    let sessions = Arc::new(session_issuer(&config)?);
    let files = Arc::new(file_storage(&config));
    Ok(build_router(config, pool, use_cases, sessions, files))
}

fn session_issuer(config: &Config) -> anyhow::Result<JwtSessionIssuer> {
    JwtSessionIssuer::from_config(&config.security).context("invalid session settings")
}

fn file_storage(config: &Config) -> DiskFileStorage {
    DiskFileStorage::new(&config.storage.root_path, &config.server.public_base_url)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    // Credentialed requests need explicit origins.
    let origins: Vec<_> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true)
}

fn build_router(
    config: Config,
    pool: PgPool,
    use_cases: UseCases,
    sessions: Arc<JwtSessionIssuer>,
    files: Arc<DiskFileStorage>,
) -> Router {
    let config = Arc::new(config);
    let state = AppState {
        pool,
        cookies: CookieHelper::new(config.cookie.clone()),
        config: config.clone(),
        products: use_cases.products,
        locals: use_cases.locals,
        auth: use_cases.auth,
        sessions,
        files,
    };

    let camera_routes = Router::new()
        .route("/create", post(products::create_product))
        .route("/list", get(products::list_products))
        .route("/get/:id", get(products::get_product))
        .route("/update/:id", post(products::update_product))
        .route("/delete/:id", delete(products::delete_product))
        .route("/read-product", post(products::read_product))
        .route(
            "/read-product/delete/:id",
            post(products::delete_read_product),
        )
        .route("/list/read-product", get(products::list_read_products))
        .route("/local/create", post(locals::create_local))
        .route("/local/list", get(locals::list_locals))
        .route("/local/get/:id", get(locals::get_local))
        .route("/local/update/:id", post(locals::update_local))
        .route("/local/delete/:id", delete(locals::delete_local))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/register", post(auth::register))
        .route("/personal-information", get(auth::personal_information));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/files/:category/:filename", get(files::serve_file))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .nest("/api/v1/camera", camera_routes)
        .nest("/api/v1/auth", auth_routes)
        .merge(public_routes)
        // Global middleware (bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config))
        .with_state(state)
}
