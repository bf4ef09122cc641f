mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::json_body;

#[tokio::test]
async fn admin_sees_accounts_of_own_condominium() -> Result<()> {
    let gate = common::gate().await?;
    let token = gate.token_for(&gate.accounts.admin);

    let path = format!("/api/users/{}", gate.accounts.owner.id);
    let res = gate.api(Method::GET, &path, Some(&token), None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await?;
    assert_eq!(body["data"]["email"], "owner@condo.test");

    let path = format!("/api/users/{}", gate.accounts.other_owner.id);
    let res = gate.api(Method::GET, &path, Some(&token), None).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let path = format!("/api/users/{}", gate.accounts.superadmin.id);
    let res = gate.api(Method::GET, &path, Some(&token), None).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn missing_user_is_not_found() -> Result<()> {
    let gate = common::gate().await?;
    let token = gate.token_for(&gate.accounts.superadmin);

    let res = gate.api(Method::GET, "/api/users/4040", Some(&token), None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await?["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn owners_and_suppliers_cannot_reach_user_admin() -> Result<()> {
    let gate = common::gate().await?;

    for user in [&gate.accounts.owner, &gate.accounts.supplier] {
        let token = gate.token_for(user);
        let path = format!("/api/users/{}", user.id);
        let res = gate.api(Method::GET, &path, Some(&token), None).await?;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
    Ok(())
}

#[tokio::test]
async fn disabling_an_owner_blocks_their_session() -> Result<()> {
    let gate = common::gate().await?;
    let admin = gate.token_for(&gate.accounts.admin);
    let owner = &gate.accounts.owner;

    // Owner logs in while still enabled
    let res = gate.login(&owner.email, common::PASSWORD).await?;
    let body = json_body(res).await?;
    let owner_token = body["data"]["token"].as_str().unwrap_or_default().to_string();

    let path = format!("/api/users/{}/authorization", owner.id);
    let res = gate
        .api(Method::PUT, &path, Some(&admin), Some(json!({ "authorized": false })))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await?["data"]["authorized"], false);

    let res = gate.api(Method::GET, "/api/receipts", Some(&owner_token), None).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // A fresh login now carries authorized=false
    let res = gate.login(&owner.email, common::PASSWORD).await?;
    let body = json_body(res).await?;
    let blocked = body["data"]["token"].as_str().unwrap_or_default().to_string();
    common::assert_redirect(&gate.page("/owner", Some(&blocked)).await?, "/unauthorized");

    // Re-enable
    let res = gate
        .api(Method::PUT, &path, Some(&admin), Some(json!({ "authorized": true })))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = gate.api(Method::GET, "/api/receipts", Some(&owner_token), None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn authorization_changes_are_scoped() -> Result<()> {
    let gate = common::gate().await?;
    let admin = gate.token_for(&gate.accounts.admin);

    // Another condominium's account
    let path = format!("/api/users/{}/authorization", gate.accounts.other_owner.id);
    let res = gate
        .api(Method::PUT, &path, Some(&admin), Some(json!({ "authorized": false })))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Own account
    let path = format!("/api/users/{}/authorization", gate.accounts.admin.id);
    let res = gate
        .api(Method::PUT, &path, Some(&admin), Some(json!({ "authorized": false })))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Superadmin may change anyone else
    let root = gate.token_for(&gate.accounts.superadmin);
    let path = format!("/api/users/{}/authorization", gate.accounts.other_admin.id);
    let res = gate
        .api(Method::PUT, &path, Some(&root), Some(json!({ "authorized": false })))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn authorization_body_is_validated() -> Result<()> {
    let gate = common::gate().await?;
    let admin = gate.token_for(&gate.accounts.admin);
    let path = format!("/api/users/{}/authorization", gate.accounts.owner.id);

    let res = gate
        .api(Method::PUT, &path, Some(&admin), Some(json!({ "authorized": "nope" })))
        .await?;
    assert!(res.status().is_client_error());
    assert_eq!(json_body(res).await?["success"], false);
    Ok(())
}
