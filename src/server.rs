use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use chrono::Local;
use log::{error, info};
use std::net::SocketAddr;
use std::path::Path;

use crate::config::{RosterConfig, SolveOptions};
use crate::data::{DEFAULT_CREW_SIZE, RosterRequest, RosterResponse, Worker};
use crate::error::RosterError;
use crate::io::{check_schedule_shape, check_weeks, check_worker_names};
use crate::pipeline::{self, RosterOutcome, RosterPlan};

type HandlerError = (StatusCode, String);

fn plan_from_request(request: &RosterRequest) -> Result<RosterPlan, RosterError> {
    let source = Path::new("request");
    let names = match &request.workers {
        Some(names) => {
            check_worker_names(source, names)?;
            names.clone()
        }
        None => Worker::default_names(DEFAULT_CREW_SIZE),
    };
    let mut config = RosterConfig::default();
    if let Some(weeks) = request.weeks {
        check_weeks(source, weeks)?;
        config = config.with_weeks(weeks);
    }
    let start_date = request.start_date.unwrap_or_else(|| Local::now().date_naive());

    let mut plan = RosterPlan::new(&names, start_date).with_config(config);
    if let Some(previous) = &request.previous {
        check_schedule_shape(source, previous)?;
        plan = plan.with_previous(previous);
    }
    Ok(plan)
}

fn into_response(outcome: RosterOutcome) -> Result<Json<RosterResponse>, HandlerError> {
    match outcome {
        RosterOutcome::Generated(roster) => Ok(Json(RosterResponse {
            schedule: roster.schedule,
            extra_staffing_days: roster.extra_days,
            report: roster.report,
        })),
        RosterOutcome::Infeasible { .. } => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "No feasible solution found.".to_string(),
        )),
    }
}

fn status_for(e: &RosterError) -> StatusCode {
    if e.is_input() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn generate_handler(
    Json(request): Json<RosterRequest>,
) -> Result<Json<RosterResponse>, HandlerError> {
    let plan = plan_from_request(&request).map_err(|e| (status_for(&e), e.to_string()))?;
    let options = SolveOptions {
        seed: request.seed,
        time_limit: request.time_limit,
        ..SolveOptions::default()
    };
    info!(
        "Generating {}-week roster for {} workers",
        plan.config.weeks,
        plan.workers.len()
    );

    // the solve is synchronous; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || pipeline::run(&plan, &options))
        .await
        .map_err(|e| {
            error!("roster task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .map_err(|e| (status_for(&e), e.to_string()))?;
    into_response(outcome)
}

pub fn router() -> Router {
    Router::new().route("/v1/roster/generate", post(generate_handler))
}

pub async fn run_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await
}
