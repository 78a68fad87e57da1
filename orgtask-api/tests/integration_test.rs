/// Integration tests for the OrgTask API
///
/// These tests verify the system end-to-end through the router:
/// - Registration bootstrap (user + org + admin membership, atomically)
/// - Login and its constant failure message
/// - Cross-organization isolation of projects and todos
/// - Membership management error mapping
///
/// They require a running PostgreSQL database; see tests/common/mod.rs.
/// Run with: cargo test --test integration_test -- --test-threads=1

mod common;

use axum::http::StatusCode;
use common::TestContext;
use orgtask_shared::models::{
    membership::{Membership, Role},
    organization::Organization,
    user::User,
};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_register_creates_user_org_and_admin_membership() {
    let mut ctx = TestContext::new().await.unwrap();

    let (username, _email, body) = ctx.register_user("password123").await;

    // No password material in the response
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let user_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(body["username"], username);

    // Default organization exists and is owned by the new user
    let org = Organization::find_by_owner(&ctx.db, user_id)
        .await
        .unwrap()
        .expect("Registration should create a default organization");
    assert_eq!(org.name, format!("{}'s organization", username));

    // The creator holds an admin membership in it
    let membership = Membership::find_by_org_and_user(&ctx.db, org.id, user_id)
        .await
        .unwrap()
        .expect("Registration should create a membership");
    assert_eq!(membership.role, Role::Admin);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts_without_writes() {
    let mut ctx = TestContext::new().await.unwrap();

    let (_username, email, _body) = ctx.register_user("password123").await;

    let second_username = format!("user-{}", Uuid::new_v4().simple());
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "username": second_username,
                "email": email,
                "password": "password123",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
    assert_eq!(body["message"], "Email already in use");

    // The failed registration left no user behind
    let orphan = User::find_by_username(&ctx.db, &second_username)
        .await
        .unwrap();
    assert!(orphan.is_none());
}

#[tokio::test]
async fn test_register_rolls_back_on_org_name_collision() {
    let mut ctx = TestContext::new().await.unwrap();

    let org_name = format!("org-{}", Uuid::new_v4().simple());
    let first_username = format!("user-{}", Uuid::new_v4().simple());

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "username": first_username,
                "email": format!("{}@test.example", first_username),
                "password": "password123",
                "org_name": org_name,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    // Fresh user, same org name: the org insert fails mid-transaction
    let second_username = format!("user-{}", Uuid::new_v4().simple());
    let (status, _body) = ctx
        .request(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "username": second_username,
                "email": format!("{}@test.example", second_username),
                "password": "password123",
                "org_name": org_name,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The user insert that preceded the failing org insert was rolled back
    let orphan = User::find_by_username(&ctx.db, &second_username)
        .await
        .unwrap();
    assert!(orphan.is_none(), "Failed registration must not leave a user row");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let mut ctx = TestContext::new().await.unwrap();

    let (username, _email, _body) = ctx.register_user("password123").await;

    let (wrong_pw_status, wrong_pw_body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": username, "password": "not-the-password" })),
        )
        .await;

    let (unknown_status, unknown_body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "nobody-at-all", "password": "password123" })),
        )
        .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body["message"], "Invalid username or password");
    assert_eq!(wrong_pw_body, unknown_body, "Failure bodies must match exactly");
}

#[tokio::test]
async fn test_login_embeds_org_and_role_claims() {
    let mut ctx = TestContext::new().await.unwrap();

    let (username, email, register_body) = ctx.register_user("password123").await;

    // Identifier works as email
    let login = ctx.login(&email, "password123").await;
    assert_eq!(login["role"], "admin");
    assert_eq!(login["org_name"], register_body["org_name"]);

    // And as username
    let login = ctx.login(&username, "password123").await;
    assert!(login["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_cross_org_project_isolation() {
    let mut ctx = TestContext::new().await.unwrap();

    let (_ua, email_a, _) = ctx.register_user("password123").await;
    let (_ub, email_b, _) = ctx.register_user("password123").await;

    let token_a = ctx.login(&email_a, "password123").await["token"]
        .as_str()
        .unwrap()
        .to_string();
    let token_b = ctx.login(&email_b, "password123").await["token"]
        .as_str()
        .unwrap()
        .to_string();

    // A creates a project in their org
    let (status, project) = ctx
        .request(
            "POST",
            "/v1/projects",
            Some(&token_a),
            Some(json!({ "name": "alpha roadmap" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", project);
    let project_id = project["id"].as_str().unwrap().to_string();

    // B cannot see, rename, or delete it - the valid id behaves as absent
    let path = format!("/v1/projects/{}", project_id);

    let (status, _) = ctx.request("GET", &path, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .request("PATCH", &path, Some(&token_b), Some(json!({ "name": "stolen" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.request("DELETE", &path, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A still sees it, untouched
    let (status, body) = ctx.request("GET", &path, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "alpha roadmap");
}

#[tokio::test]
async fn test_cross_org_todo_isolation() {
    let mut ctx = TestContext::new().await.unwrap();

    let (_ua, email_a, _) = ctx.register_user("password123").await;
    let (_ub, email_b, _) = ctx.register_user("password123").await;

    let token_a = ctx.login(&email_a, "password123").await["token"]
        .as_str()
        .unwrap()
        .to_string();
    let token_b = ctx.login(&email_b, "password123").await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let (_, project) = ctx
        .request(
            "POST",
            "/v1/projects",
            Some(&token_a),
            Some(json!({ "name": "todos" })),
        )
        .await;
    let project_id = project["id"].as_str().unwrap().to_string();

    let (status, todo) = ctx
        .request(
            "POST",
            &format!("/v1/projects/{}/todos", project_id),
            Some(&token_a),
            Some(json!({ "title": "only mine" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", todo);
    let todo_id = todo["id"].as_str().unwrap().to_string();

    // The whole subtree is invisible to B: the parent project resolves 404
    let todo_path = format!("/v1/projects/{}/todos/{}", project_id, todo_id);

    let (status, _) = ctx.request("GET", &todo_path, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .request(
            "PATCH",
            &todo_path,
            Some(&token_b),
            Some(json!({ "completed": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A's view is unchanged
    let (status, body) = ctx.request("GET", &todo_path, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], false);
}

#[tokio::test]
async fn test_add_member_with_unknown_user_is_bad_request() {
    let mut ctx = TestContext::new().await.unwrap();

    let (_u, email, _) = ctx.register_user("password123").await;
    let login = ctx.login(&email, "password123").await;
    let token = login["token"].as_str().unwrap().to_string();
    let org_id = login["org_id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request(
            "POST",
            &format!("/v1/orgs/{}/members", org_id),
            Some(&token),
            Some(json!({ "user_id": Uuid::new_v4() })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_member_role_gate() {
    let mut ctx = TestContext::new().await.unwrap();

    let (_ua, email_a, _) = ctx.register_user("password123").await;
    let (_ub, _email_b, body_b) = ctx.register_user("password123").await;
    let user_b: Uuid = body_b["id"].as_str().unwrap().parse().unwrap();

    let login_a = ctx.login(&email_a, "password123").await;
    let token_a = login_a["token"].as_str().unwrap().to_string();
    let org_a = login_a["org_id"].as_str().unwrap().to_string();

    // Admin adds B as a plain member of A's org
    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/orgs/{}/members", org_a),
            Some(&token_a),
            Some(json!({ "user_id": user_b })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // B's token is scoped to B's own org, where B is admin; but B's
    // membership in A's org is member, so B cannot mutate A's org either
    // way: the org id in the path does not match B's token scope
    let login_b = ctx.login(&body_b["email"].as_str().unwrap(), "password123").await;
    let token_b = login_b["token"].as_str().unwrap().to_string();

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/orgs/{}/members", org_a),
            Some(&token_b),
            Some(json!({ "user_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_token_is_401_with_json_envelope() {
    let mut ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/v1/projects", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Unauthorized");
}
