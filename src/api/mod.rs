use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tracing::info;

use crate::core::{
    AssetRate, DerivedMetrics, MilestoneReport, RateComparison, SplitKey, TimelinePoint,
};
use crate::errors::InvestoError;
use crate::market::{CagrProvider, FallbackTable, OfflineProvider, resolve_asset_rate};
use crate::store::{Currency, InvestmentState, InvestmentStore, Scenario, Theme};

pub type SharedStore = Arc<Mutex<InvestmentStore>>;

#[derive(Clone)]
pub struct AppState {
    store: SharedStore,
    provider: Arc<dyn CagrProvider>,
    fallback: Arc<FallbackTable>,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self::with_provider(store, Arc::new(OfflineProvider), FallbackTable::default())
    }

    pub fn with_provider(
        store: SharedStore,
        provider: Arc<dyn CagrProvider>,
        fallback: FallbackTable,
    ) -> Self {
        Self {
            store,
            provider,
            fallback: Arc::new(fallback),
        }
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }
}

impl From<InvestoError> for ApiError {
    fn from(err: InvestoError) -> Self {
        let status = match &err {
            InvestoError::BlankScenarioName | InvestoError::UnknownCurrency(_) => {
                StatusCode::BAD_REQUEST
            }
            InvestoError::ScenarioNotFound(_) => StatusCode::NOT_FOUND,
            InvestoError::Storage(_)
            | InvestoError::Serialization(_)
            | InvestoError::Market(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status, &self.message)
    }
}

type ApiResult = Result<Response, ApiError>;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StatePatch {
    income: Option<f64>,
    deduction_pct: Option<f64>,
    horizon_years: Option<f64>,
    lump_sum: Option<f64>,
    // Absent leaves the override alone; `null` clears it.
    #[serde(deserialize_with = "present_or_null")]
    manual_rate_pct: Option<Option<f64>>,
    inflation_adjusted: Option<bool>,
    currency: Option<String>,
    theme: Option<Theme>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SplitPayload {
    key: SplitKey,
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamePayload {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReversePayload {
    target_amount: f64,
    years: f64,
    #[serde(default)]
    current_savings: f64,
    #[serde(default, alias = "rate")]
    rate_pct: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetRatePayload {
    symbol: Option<String>,
    #[serde(default)]
    cagr_pct: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TimelineQuery {
    comparison_rate: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DerivedResponse<'a> {
    derived: DerivedMetrics,
    currency: &'a Currency,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineResponse {
    points: Vec<TimelinePoint>,
    breakdown: Vec<TimelinePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<RateComparison>,
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(get_state_handler).patch(patch_state_handler))
        .route("/api/split", post(set_split_handler))
        .route("/api/split/reset", post(reset_split_handler))
        .route("/api/asset-rate", put(set_asset_rate_handler))
        .route("/api/derived", get(derived_handler))
        .route("/api/timeline", get(timeline_handler))
        .route("/api/milestones", get(milestones_handler))
        .route("/api/reverse", post(reverse_handler))
        .route("/api/currencies", get(currencies_handler))
        .route("/api/assets", get(assets_handler))
        .route(
            "/api/scenarios",
            get(list_scenarios_handler).post(save_scenario_handler),
        )
        .route(
            "/api/scenarios/:id",
            put(rename_scenario_handler).delete(delete_scenario_handler),
        )
        .route("/api/scenarios/:id/load", post(load_scenario_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(store: InvestmentStore, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = app_router(AppState::new(Arc::new(Mutex::new(store))));

    let listener = TcpListener::bind(addr).await?;
    info!("investo HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/api/derived");

    axum::serve(listener, app).await
}

fn lock(store: &SharedStore) -> Result<MutexGuard<'_, InvestmentStore>, ApiError> {
    store
        .lock()
        .map_err(|_| ApiError::internal("state lock poisoned"))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn get_state_handler(State(app): State<AppState>) -> ApiResult {
    let store = lock(&app.store)?;
    Ok(json_response(StatusCode::OK, store.state()))
}

async fn patch_state_handler(
    State(app): State<AppState>,
    Json(patch): Json<StatePatch>,
) -> ApiResult {
    let mut store = lock(&app.store)?;
    apply_patch(&mut store, patch)?;
    Ok(json_response(StatusCode::OK, store.state()))
}

fn apply_patch(store: &mut InvestmentStore, patch: StatePatch) -> Result<(), InvestoError> {
    // Resolve the currency first so an unknown code rejects the whole patch.
    let currency = match patch.currency.as_deref() {
        Some(code) => Some(
            Currency::from_code(code)
                .ok_or_else(|| InvestoError::UnknownCurrency(code.to_string()))?,
        ),
        None => None,
    };

    if let Some(v) = patch.income {
        store.set_income(v)?;
    }
    if let Some(v) = patch.deduction_pct {
        store.set_deduction_pct(v)?;
    }
    if let Some(v) = patch.horizon_years {
        store.set_horizon_years(v)?;
    }
    if let Some(v) = patch.lump_sum {
        store.set_lump_sum(v)?;
    }
    if let Some(v) = patch.manual_rate_pct {
        store.set_manual_rate_pct(v)?;
    }
    if let Some(v) = patch.inflation_adjusted {
        store.set_inflation_adjusted(v)?;
    }
    if let Some(v) = currency {
        store.set_currency(v)?;
    }
    if let Some(v) = patch.theme {
        store.set_theme(v)?;
    }
    Ok(())
}

async fn set_split_handler(
    State(app): State<AppState>,
    Json(payload): Json<SplitPayload>,
) -> ApiResult {
    let mut store = lock(&app.store)?;
    store.set_split(payload.key, payload.value)?;
    Ok(json_response(StatusCode::OK, store.state().split))
}

async fn reset_split_handler(State(app): State<AppState>) -> ApiResult {
    let mut store = lock(&app.store)?;
    store.reset_split()?;
    Ok(json_response(StatusCode::OK, store.state().split))
}

async fn set_asset_rate_handler(
    State(app): State<AppState>,
    Json(payload): Json<AssetRatePayload>,
) -> ApiResult {
    // A bare symbol is resolved before the lock is taken; the lookup may await.
    let rate = match (payload.symbol, payload.cagr_pct) {
        (Some(symbol), None) => {
            resolve_asset_rate(app.provider.as_ref(), &app.fallback, &symbol).await
        }
        (symbol, cagr_pct) => AssetRate {
            symbol,
            cagr_pct,
            source: None,
        },
    };
    let mut store = lock(&app.store)?;
    store.set_asset_rate(rate)?;
    Ok(json_response(StatusCode::OK, store.state()))
}

async fn assets_handler(State(app): State<AppState>) -> Response {
    json_response(StatusCode::OK, app.fallback.assets())
}

async fn derived_handler(State(app): State<AppState>) -> ApiResult {
    let store = lock(&app.store)?;
    Ok(json_response(
        StatusCode::OK,
        DerivedResponse {
            derived: store.derived(),
            currency: &store.state().currency,
        },
    ))
}

async fn timeline_handler(
    State(app): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> ApiResult {
    let store = lock(&app.store)?;
    Ok(json_response(
        StatusCode::OK,
        TimelineResponse {
            points: store.growth_timeline(query.comparison_rate),
            breakdown: store.timeline_breakdown(),
            comparison: query.comparison_rate.map(|rate| store.compare_rate(rate)),
        },
    ))
}

async fn milestones_handler(State(app): State<AppState>) -> ApiResult {
    let store = lock(&app.store)?;
    let report: MilestoneReport = store.milestones();
    Ok(json_response(StatusCode::OK, report))
}

async fn reverse_handler(
    State(app): State<AppState>,
    Json(payload): Json<ReversePayload>,
) -> ApiResult {
    let store = lock(&app.store)?;
    let result = store.reverse_goal(
        payload.target_amount,
        payload.years,
        payload.current_savings,
        payload.rate_pct,
    );
    Ok(json_response(StatusCode::OK, result))
}

async fn currencies_handler() -> Response {
    json_response(StatusCode::OK, Currency::catalogue())
}

async fn list_scenarios_handler(State(app): State<AppState>) -> ApiResult {
    let store = lock(&app.store)?;
    Ok(json_response(StatusCode::OK, store.scenarios()))
}

async fn save_scenario_handler(
    State(app): State<AppState>,
    Json(payload): Json<NamePayload>,
) -> ApiResult {
    let mut store = lock(&app.store)?;
    let scenario: Scenario = store.save_scenario(&payload.name)?;
    Ok(json_response(StatusCode::CREATED, scenario))
}

async fn load_scenario_handler(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let mut store = lock(&app.store)?;
    store.load_scenario(&id)?;
    let state: &InvestmentState = store.state();
    Ok(json_response(StatusCode::OK, state))
}

async fn rename_scenario_handler(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NamePayload>,
) -> ApiResult {
    let mut store = lock(&app.store)?;
    store.rename_scenario(&id, &payload.name)?;
    Ok(json_response(StatusCode::OK, store.scenarios()))
}

async fn delete_scenario_handler(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let mut store = lock(&app.store)?;
    store.delete_scenario(&id)?;
    Ok(with_cache_control(StatusCode::NO_CONTENT))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
