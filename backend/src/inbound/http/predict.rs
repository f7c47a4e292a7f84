//! Prediction handlers.
//!
//! ```text
//! GET /predict
//! POST /predict {"Age":"21","Branch":"CS","Sem1 GPA":3.5,"Internship Done":"Yes"}
//! ```

use std::collections::BTreeMap;

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::PredictionFormSchema;
use crate::domain::{Error, PredictionReceipt, RawForm};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// A submitted form value. Numbers and booleans are accepted for
/// convenience and kept in their JSON text form.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl FormValue {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
            Self::Flag(flag) => flag.to_string(),
        }
    }
}

/// Body of `POST /predict`: form field name → value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct PredictRequest(pub BTreeMap<String, FormValue>);

impl From<PredictRequest> for RawForm {
    fn from(request: PredictRequest) -> Self {
        Self::from_pairs(
            request
                .0
                .into_iter()
                .map(|(name, value)| (name, value.into_text())),
        )
    }
}

/// Fields and trained columns the model expects.
#[utoipa::path(
    get,
    path = "/predict",
    responses(
        (status = 200, description = "Prediction form layout", body = PredictionFormSchema),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["predictions"],
    operation_id = "predictionForm"
)]
#[get("/predict")]
pub async fn prediction_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PredictionFormSchema>> {
    session.require_username()?;
    Ok(web::Json(state.predictions.form_schema()))
}

/// Score a form, anchor its hash on the ledger and record it.
#[utoipa::path(
    post,
    path = "/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Prediction recorded", body = PredictionReceipt),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Model, ledger or storage failure", body = Error),
        (status = 503, description = "Ledger node or database unavailable", body = Error)
    ),
    tags = ["predictions"],
    operation_id = "submitPrediction"
)]
#[post("/predict")]
pub async fn submit_prediction(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PredictRequest>,
) -> ApiResult<web::Json<PredictionReceipt>> {
    let username = session.require_username()?;
    let form = RawForm::from(payload.into_inner());
    let receipt = state.predictions.predict(&username, form).await?;
    Ok(web::Json(receipt))
}

#[cfg(test)]
#[path = "predict_tests.rs"]
mod tests;
