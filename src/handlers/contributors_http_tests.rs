//! HTTP tests for the contributors endpoint
//!
//! Exercise the full request path against a scripted upstream source.

#[cfg(test)]
mod http_tests {
    use std::sync::Arc;

    use actix_web::{test, web, App};
    use chrono::{Duration as ChronoDuration, Utc};
    use serde_json::Value;

    use crate::config::Config;
    use crate::github::testing::{contributor, ScriptedSource};
    use crate::github::types::Fetched;
    use crate::github::{ContributorSource, GithubError};
    use crate::handlers::configure_contributor_routes;
    use crate::models::ContributorProfile;
    use crate::AppState;

    fn app_state(source: Option<Arc<ScriptedSource>>) -> web::Data<AppState> {
        web::Data::new(AppState {
            config: Config::default(),
            source: source.map(|s| s as Arc<dyn ContributorSource>),
        })
    }

    async fn get(state: web::Data<AppState>, uri: &str) -> (u16, Value) {
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(configure_contributor_routes),
        )
        .await;

        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status().as_u16();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_rt::test]
    async fn http_missing_owner_and_repo_is_400() {
        let source = Arc::new(ScriptedSource::new());
        let (status, body) = get(app_state(Some(source)), "/contributors?owner=octo-org").await;

        assert_eq!(status, 400);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("owner and repo"));
    }

    #[actix_rt::test]
    async fn http_missing_token_is_500() {
        let (status, body) = get(
            app_state(None),
            "/contributors?owner=octo-org&repo=widget",
        )
        .await;

        assert_eq!(status, 500);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("token"));
    }

    #[actix_rt::test]
    async fn http_invalid_sort_is_400_before_any_fetch() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page(vec![contributor("a", 1)]);

        let (status, _) = get(
            app_state(Some(source.clone())),
            "/contributors?owner=octo-org&repo=widget&sort_by=stars",
        )
        .await;

        assert_eq!(status, 400);
        assert!(!source.was_called("contributor_page"), "rejected before fetching");
    }

    #[actix_rt::test]
    async fn http_repo_not_found_is_404() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page_error(GithubError::NotFound("no such repo".to_string()));

        let (status, body) = get(
            app_state(Some(source)),
            "/contributors?owner=octo-org&repo=missing",
        )
        .await;

        assert_eq!(status, 404);
        assert_eq!(body["success"], false);
        assert!(body.get("data").is_none(), "no partial data on a fatal 404");
    }

    #[actix_rt::test]
    async fn http_single_page_success_envelope() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page((1..=30).map(|i| contributor(&format!("u{i:02}"), i)).collect());

        let (status, body) = get(
            app_state(Some(source)),
            "/contributors?owner=octo-org&repo=widget&per_page=10&page=1",
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 10);
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["per_page"], 10);
        assert_eq!(body["pagination"]["total_count"], 30);
        assert_eq!(body["pagination"]["has_next"], true);
        assert_eq!(body["meta"]["pages_fetched"], 1);
        assert_eq!(body["meta"]["total_fetched"], 30);
        assert_eq!(body["meta"]["rate_limit_hit"], false);
        // default order: contributions descending
        assert_eq!(body["data"][0]["identity"], "u30");
    }

    #[actix_rt::test]
    async fn http_windowing_matches_filtered_total() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page((1..=37).map(|i| contributor(&format!("u{i:02}"), i)).collect());

        let (status, body) = get(
            app_state(Some(source)),
            "/contributors?owner=octo-org&repo=widget&per_page=12&page=2&sort_by=contributions&sort_order=asc",
        )
        .await;

        assert_eq!(status, 200);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 12);
        assert_eq!(data.first().unwrap()["identity"], "u13");
        assert_eq!(data.last().unwrap()["identity"], "u24");
        assert_eq!(body["pagination"]["has_next"], true);

        // last, partial window
        let source = Arc::new(ScriptedSource::new());
        source.push_page((1..=37).map(|i| contributor(&format!("u{i:02}"), i)).collect());
        let (_, body) = get(
            app_state(Some(source)),
            "/contributors?owner=octo-org&repo=widget&per_page=12&page=4&sort_by=contributions&sort_order=asc",
        )
        .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["identity"], "u37");
        assert_eq!(body["pagination"]["has_next"], false);
    }

    #[actix_rt::test]
    async fn http_contribution_filters_are_inclusive() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page((1..=20).map(|i| contributor(&format!("u{i:02}"), i)).collect());

        let (_, body) = get(
            app_state(Some(source)),
            "/contributors?owner=octo-org&repo=widget&min_contributions=5&max_contributions=10",
        )
        .await;

        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 6);
        for record in data {
            let count = record["contribution_count"].as_u64().unwrap();
            assert!((5..=10).contains(&count));
        }
        assert_eq!(body["pagination"]["total_count"], 6);
    }

    #[actix_rt::test]
    async fn http_quota_exhaustion_mid_session_is_partial_success() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page((0..10).map(|i| contributor(&format!("p1-{i}"), 1)).collect());
        source.push_page((0..10).map(|i| contributor(&format!("p2-{i}"), 1)).collect());
        source.push_page_error(GithubError::RateLimited {
            reset_at: Some(Utc::now() + ChronoDuration::minutes(10)),
            message: "limited".to_string(),
        });

        let (status, body) = get(
            app_state(Some(source)),
            "/contributors?owner=octo-org&repo=widget&fetch_all=true",
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 20);
        assert_eq!(body["meta"]["rate_limit_hit"], true);
        assert!(body["meta"]["warning"].as_str().is_some());
        assert_eq!(body["pagination"]["has_next"], false, "full set was requested");
    }

    #[actix_rt::test]
    async fn http_enhanced_mode_attaches_profiles() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page(vec![contributor("octocat", 50)]);
        source.set_profile(
            "octocat",
            Ok(Fetched::bare(ContributorProfile {
                display_name: Some("The Octocat".to_string()),
                location: Some("Berlin".to_string()),
                ..Default::default()
            })),
        );

        let (_, body) = get(
            app_state(Some(source)),
            "/contributors?owner=octo-org&repo=widget&enhanced=true",
        )
        .await;

        assert_eq!(body["data"][0]["profile"]["display_name"], "The Octocat");
    }

    #[actix_rt::test]
    async fn http_location_filter_requires_profile() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page(vec![contributor("nowhere", 5), contributor("berliner", 5)]);
        source.set_profile(
            "berliner",
            Ok(Fetched::bare(ContributorProfile {
                location: Some("Berlin, Germany".to_string()),
                ..Default::default()
            })),
        );

        let (_, body) = get(
            app_state(Some(source)),
            "/contributors?owner=octo-org&repo=widget&enhanced=true&location=berlin",
        )
        .await;

        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["identity"], "berliner");
    }
}
