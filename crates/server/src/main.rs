use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use api::{
    auth::{verify_token, AuthConfig, CurrentUser},
    loader::EmployeeLoader,
    schema::{build_schema, AppSchema},
};
use async_graphql::{http::GraphiQLSource, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::Html,
    routing::get,
    Router,
};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use store::{cache::FreshnessCache, records::RecordStore, seed};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, Level};

#[derive(Parser, Debug)]
#[command(name = "staffdesk", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the HTTP server (the default when no command is given)
    Serve {
        #[arg(long, env = "BIND", default_value = "127.0.0.1:8080")]
        bind: String,
        /// Start without the demo directory records
        #[arg(long)]
        empty: bool,
    },
    /// Print the GraphQL SDL
    PrintSchema,
}

#[derive(Clone)]
struct AppState {
    schema: Schema<
        api::schema::QueryRoot,
        api::schema::MutationRoot,
        async_graphql::EmptySubscription,
    >,
    store: Arc<RecordStore>,
    cache: FreshnessCache,
    auth: Arc<AuthConfig>,
}

struct AppConfig {
    auth: AuthConfig,
    cors_allowed_origins: Vec<String>,
}

const CACHE_SWEEP_SECS: u64 = 600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let AppConfig {
        auth,
        cors_allowed_origins,
    } = load_config()?;
    let auth = Arc::new(auth);

    match cli.cmd.unwrap_or_else(default_serve) {
        Cmd::PrintSchema => {
            let AppSchema(schema) =
                build_schema(Arc::new(RecordStore::new()), FreshnessCache::new(), auth);
            println!("{}", schema.sdl());
            Ok(())
        }
        Cmd::Serve { bind, empty } => {
            let store = if empty {
                info!("starting with an empty directory");
                Arc::new(RecordStore::new())
            } else {
                info!("seeding demo directory records");
                Arc::new(seed::demo_store())
            };
            let cache = FreshnessCache::new();
            let AppSchema(schema) = build_schema(store.clone(), cache.clone(), auth.clone());
            spawn_cache_sweep(cache.clone());
            let state = AppState {
                schema,
                store,
                cache,
                auth,
            };
            let app = app_router(state, &cors_allowed_origins);

            let addr: SocketAddr = bind.parse()?;
            let listener = TcpListener::bind(addr).await?;
            info!("listening on http://{}", addr);
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(shutdown_signal())
            .await?;
            Ok(())
        }
    }
}

fn default_serve() -> Cmd {
    Cmd::Serve {
        bind: std::env::var("BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
        empty: false,
    }
}

fn load_config() -> anyhow::Result<AppConfig> {
    let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
    let token_ttl_days = std::env::var("TOKEN_TTL_DAYS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(7);
    let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect();
    Ok(AppConfig {
        auth: AuthConfig {
            jwt_secret,
            token_ttl_days,
        },
        cors_allowed_origins,
    })
}

fn app_router(state: AppState, origins: &[String]) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/graphql", get(graphiql).post(graphql_post))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(origins)),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn graphql_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(current_user) = authenticate_request(&state, &headers) {
        request = request.data(current_user);
    }
    // Every request gets its own loader so batching and memoization
    // never leak across requests.
    let loader = EmployeeLoader::new(state.store.clone(), state.cache.clone()).batched();
    request = request.data(loader);
    state.schema.execute(request).await.into()
}

fn authenticate_request(state: &AppState, headers: &HeaderMap) -> Option<CurrentUser> {
    let token = extract_token(headers)?;
    verify_token(&token, &state.auth)
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?;
    let text = value.to_str().ok()?;
    let rest = text.strip_prefix("Bearer ")?;
    Some(rest.trim().to_string())
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

fn spawn_cache_sweep(cache: FreshnessCache) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(CACHE_SWEEP_SECS));
        loop {
            ticker.tick().await;
            let reclaimed = cache.sweep().await;
            let stats = cache.stats().await;
            debug!(
                reclaimed,
                hits = stats.hits,
                misses = stats.misses,
                entries = stats.entries,
                "cache sweep"
            );
        }
    });
}

async fn shutdown_signal() {
    use tokio::signal;
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler")
    };
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! { _ = ctrl_c => {}, _ = terminate => {}, }
}
