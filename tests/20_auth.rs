mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn admin_routes_require_a_token() -> Result<()> {
    for uri in ["/api/admin/whoami", "/api/admin/products"] {
        let res = common::get(uri, None).await?;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["code"], "UNAUTHORIZED");
    }
    Ok(())
}

#[tokio::test]
async fn invalid_tokens_are_rejected() -> Result<()> {
    let res = common::get("/api/admin/whoami", Some("not.a.jwt")).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let mut tampered = common::token_for("admin")?;
    tampered.push('x');
    let res = common::get("/api/admin/whoami", Some(&tampered)).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn whoami_echoes_claims() -> Result<()> {
    let token = common::token_for("editor")?;
    let res = common::get("/api/admin/whoami", Some(&token)).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["email"], "editor@example.edu");
    assert_eq!(res.body["data"]["role"], "editor");
    assert_eq!(res.body["data"]["can_edit"], true);
    Ok(())
}

#[tokio::test]
async fn writes_require_an_editor_role() -> Result<()> {
    let token = common::token_for("viewer")?;
    let body = json!({ "name": "Centrifuge" });

    let res = common::send_json(Method::POST, "/api/admin/products", Some(&token), &body).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["code"], "FORBIDDEN");

    let res = common::send_json(Method::DELETE, "/api/admin/services/3", Some(&token), &body).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    // Reading is fine for any authenticated role
    let res = common::get("/api/admin/whoami", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["can_edit"], false);
    Ok(())
}

#[tokio::test]
async fn login_rejects_malformed_bodies() -> Result<()> {
    let res = common::send_json(Method::POST, "/auth/login", None, &json!({ "email": "a@example.edu" })).await?;
    assert!(res.status.is_client_error(), "unexpected status: {}", res.status);

    let res = common::send_json(Method::POST, "/auth/login", None, &json!({ "email": " ", "password": "" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    Ok(())
}
