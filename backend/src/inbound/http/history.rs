//! Audit history, label analytics and hash verification.
//!
//! ```text
//! GET /history
//! GET /history/42/verify
//! GET /analytics
//! ```

use actix_web::{get, web};

use crate::domain::{Error, HashVerification, LabelSummary, PredictionRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The signed-in user's predictions, newest first.
#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "Prediction history", body = [PredictionRecord]),
        (status = 401, description = "Login required", body = Error),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["history"],
    operation_id = "listHistory"
)]
#[get("/history")]
pub async fn list_history(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PredictionRecord>>> {
    let username = session.require_username()?;
    let records = state.history.list(&username).await?;
    Ok(web::Json(records))
}

/// Recompute a stored record's data hash and compare it with the anchored one.
#[utoipa::path(
    get,
    path = "/history/{id}/verify",
    params(("id" = i32, Path, description = "Prediction record id")),
    responses(
        (status = 200, description = "Verification result", body = HashVerification),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such record for this user", body = Error)
    ),
    tags = ["history"],
    operation_id = "verifyRecord"
)]
#[get("/history/{id}/verify")]
pub async fn verify_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<HashVerification>> {
    let username = session.require_username()?;
    let verification = state.history.verify(&username, path.into_inner()).await?;
    Ok(web::Json(verification))
}

/// Prediction counts per label for charting.
#[utoipa::path(
    get,
    path = "/analytics",
    responses(
        (status = 200, description = "Label counts", body = LabelSummary),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["history"],
    operation_id = "analytics"
)]
#[get("/analytics")]
pub async fn analytics(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<LabelSummary>> {
    let username = session.require_username()?;
    let summary = state.history.summarize(&username).await?;
    Ok(web::Json(summary))
}

#[cfg(test)]
mod tests {
    //! Handler tests for history, verification and analytics.
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{
        Confidence, DataHash, PlacementLabel, RawForm, TransactionId, Username,
    };
    use crate::inbound::http::test_utils::{
        MockPorts, TEST_SIGN_IN_PATH, sign_in_as, signed_in_cookie, test_session_middleware,
    };

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .service(list_history)
            .service(verify_record)
            .service(analytics)
            .route(
                &format!("{TEST_SIGN_IN_PATH}/{{username}}"),
                web::get().to(sign_in_as),
            )
    }

    #[fixture]
    fn record() -> PredictionRecord {
        let username = Username::new("alice").expect("username");
        let form = RawForm::from_pairs([("Age", "21"), ("Branch", "CS")]);
        PredictionRecord {
            id: 3,
            data_hash: DataHash::compute(&username, &form),
            username,
            user_input: form,
            transaction_id: TransactionId::parse(
                "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060",
            )
            .expect("transaction"),
            prediction: PlacementLabel::NotPlaced,
            confidence: Confidence::new(16.8).expect("confidence"),
            timestamp: Utc
                .with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
                .single()
                .expect("timestamp"),
        }
    }

    async fn get_as_alice(ports: MockPorts, uri: &str) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let cookie = signed_in_cookie(&app, "alice").await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(uri)
                .cookie(cookie)
                .to_request(),
        )
        .await
    }

    #[rstest]
    #[actix_web::test]
    async fn history_lists_the_session_users_records(record: PredictionRecord) {
        let mut ports = MockPorts::default();
        ports
            .history
            .expect_list()
            .withf(|username| username.as_ref() == "alice")
            .times(1)
            .returning(move |_| Ok(vec![record.clone()]));

        let res = get_as_alice(ports, "/history").await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body[0]["id"], 3);
        assert_eq!(body[0]["prediction"], "Not Placed");
        assert_eq!(body[0]["userInput"], json!({"Age": "21", "Branch": "CS"}));
    }

    #[rstest]
    #[actix_web::test]
    async fn verify_reports_matching_hash(record: PredictionRecord) {
        let verification = record.verify();
        let mut ports = MockPorts::default();
        ports
            .history
            .expect_verify()
            .withf(|username, id| username.as_ref() == "alice" && *id == 3)
            .returning(move |_, _| Ok(verification.clone()));

        let res = get_as_alice(ports, "/history/3/verify").await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["matches"], true);
        assert_eq!(body["recordId"], 3);
    }

    #[rstest]
    #[actix_web::test]
    async fn verify_of_foreign_record_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .history
            .expect_verify()
            .returning(|_, id| Err(Error::not_found(format!("prediction {id} not found"))));

        let res = get_as_alice(ports, "/history/99/verify").await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn analytics_returns_parallel_arrays() {
        let mut ports = MockPorts::default();
        ports.history.expect_summarize().returning(|_| {
            Ok(LabelSummary {
                labels: vec![PlacementLabel::NotPlaced, PlacementLabel::Placed],
                values: vec![1, 2],
            })
        });

        let res = get_as_alice(ports, "/analytics").await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"labels": ["Not Placed", "Placed"], "values": [1, 2]})
        );
    }

    #[rstest]
    #[case("/history")]
    #[case("/history/1/verify")]
    #[case("/analytics")]
    #[actix_web::test]
    async fn protected_routes_require_a_session(#[case] uri: &str) {
        let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;

        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
