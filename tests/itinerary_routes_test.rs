mod common;

use actix_web::test;
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use common::{build_app, seeded_context};

#[actix_web::test]
async fn offline_plan_matches_template_for_two_days() {
    let ctx = seeded_context();
    let app = test::init_service(build_app(&ctx)).await;

    let uri = format!("/api/destinations/{}/itinerary", ctx.goa.to_hex());
    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "days": 2, "budget": "moderate", "interests": "beaches" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["generated"], false);
    assert_eq!(body["days"], 2);
    assert_eq!(body["city"], "Goa");

    let plan = body["plan"].as_str().unwrap();
    assert!(plan.starts_with("(OpenRouter API key not configured)"));

    // The fallback is exactly one templated line per requested day.
    let lines: Vec<&str> = plan.lines().skip_while(|l| !l.starts_with("Day")).collect();
    assert_eq!(
        lines,
        vec![
            "Day 1: Explore Goa and enjoy local attractions.",
            "Day 2: Explore Goa and enjoy local attractions.",
        ]
    );
}

#[actix_web::test]
async fn plan_defaults_to_three_days() {
    let ctx = seeded_context();
    let app = test::init_service(build_app(&ctx)).await;

    let uri = format!("/api/destinations/{}/itinerary", ctx.goa.to_hex());
    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["days"], 3);
    let plan = body["plan"].as_str().unwrap();
    assert_eq!(plan.lines().filter(|l| l.starts_with("Day")).count(), 3);
}

#[actix_web::test]
async fn numeric_string_day_count_is_accepted() {
    let ctx = seeded_context();
    let app = test::init_service(build_app(&ctx)).await;

    let uri = format!("/api/destinations/{}/itinerary", ctx.goa.to_hex());
    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "days": "5" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["days"], 5);
}

#[actix_web::test]
async fn garbage_day_count_falls_back_to_default() {
    let ctx = seeded_context();
    let app = test::init_service(build_app(&ctx)).await;

    let uri = format!("/api/destinations/{}/itinerary", ctx.goa.to_hex());
    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "days": "next week" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["days"], 3);
}

#[actix_web::test]
async fn plan_is_never_empty() {
    let ctx = seeded_context();
    let app = test::init_service(build_app(&ctx)).await;

    for days in [json!(1), json!(7), json!("2"), json!(null), json!(0)] {
        let uri = format!("/api/destinations/{}/itinerary", ctx.goa.to_hex());
        let req = test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({ "days": days }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(!body["plan"].as_str().unwrap().trim().is_empty());
    }
}

#[actix_web::test]
async fn itinerary_for_unknown_destination_is_not_found() {
    let ctx = seeded_context();
    let app = test::init_service(build_app(&ctx)).await;

    let uri = format!("/api/destinations/{}/itinerary", ObjectId::new().to_hex());
    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "days": 2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
