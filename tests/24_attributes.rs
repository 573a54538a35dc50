mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

// Category attribute store: per-category name uniqueness, SELECT option
// requirement, ordering and cascade on category delete.

async fn create_category(client: &Client, base_url: &str, name: &str) -> Result<String> {
    let res = client
        .post(format!("{}/api/categories", base_url))
        .json(&json!({ "name": name }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let payload = res.json::<Value>().await?;
    Ok(payload["data"]["category"]["id"].as_str().unwrap().to_string())
}

async fn create_attribute(
    client: &Client,
    base_url: &str,
    category_id: &str,
    body: Value,
) -> Result<(StatusCode, Value)> {
    let res = client
        .post(format!("{}/api/categories/{}/attributes", base_url, category_id))
        .json(&body)
        .send()
        .await?;
    let status = res.status();
    let payload = res.json::<Value>().await?;
    Ok((status, payload))
}

#[tokio::test]
async fn attribute_names_unique_per_category() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = Client::new();

    let category_id = create_category(&client, &server.base_url, &common::unique("Chaussures")).await?;

    let (status, first) = create_attribute(
        &client,
        &server.base_url,
        &category_id,
        json!({ "name": "Taille", "type": "SELECT", "options": ["36", "37", "38"] }),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", first);

    // duplicate name on the same category
    let (status, duplicate) = create_attribute(
        &client,
        &server.base_url,
        &category_id,
        json!({ "name": "Taille", "type": "TEXT" }),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT, "expected conflict: {}", duplicate);
    assert_eq!(duplicate["code"], "CONFLICT_ERROR");

    // same name on a different category is fine
    let other_id = create_category(&client, &server.base_url, &common::unique("Gants")).await?;
    let (status, _) = create_attribute(
        &client,
        &server.base_url,
        &other_id,
        json!({ "name": "Taille", "type": "TEXT" }),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    Ok(())
}

#[tokio::test]
async fn select_attributes_require_options() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = Client::new();

    let category_id = create_category(&client, &server.base_url, &common::unique("Pulls")).await?;

    let (status, payload) = create_attribute(
        &client,
        &server.base_url,
        &category_id,
        json!({ "name": "Taille", "type": "MULTI_SELECT" }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "expected rejection: {}", payload);
    assert!(
        payload["error"].as_str().unwrap_or_default().contains("Options are required"),
        "unexpected error: {}",
        payload
    );

    let (status, payload) = create_attribute(
        &client,
        &server.base_url,
        &category_id,
        json!({ "name": "Taille", "type": "SELECT", "options": [] }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "expected rejection: {}", payload);

    // TEXT carries no options
    let (status, _) = create_attribute(
        &client,
        &server.base_url,
        &category_id,
        json!({ "name": "Matière", "type": "TEXT" }),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    Ok(())
}

#[tokio::test]
async fn attributes_ordered_and_renameable() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = Client::new();

    let category_id = create_category(&client, &server.base_url, &common::unique("Lampes")).await?;

    let (_, first) = create_attribute(
        &client,
        &server.base_url,
        &category_id,
        json!({ "name": "Couleur", "type": "COLOR", "sortOrder": 2 }),
    )
    .await?;
    let first_id = first["data"]["attribute"]["id"].as_str().unwrap().to_string();

    let (_, second) = create_attribute(
        &client,
        &server.base_url,
        &category_id,
        json!({ "name": "Puissance", "type": "NUMBER", "sortOrder": 1 }),
    )
    .await?;
    let second_id = second["data"]["attribute"]["id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/api/categories/{}/attributes", server.base_url, category_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<Value>().await?;
    let attributes = payload["data"]["attributes"].as_array().cloned().unwrap_or_default();
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes[0]["id"], json!(second_id), "sortOrder not applied: {}", payload);

    // renaming onto the sibling's name conflicts
    let res = client
        .put(format!(
            "{}/api/categories/{}/attributes/{}",
            server.base_url, category_id, first_id
        ))
        .json(&json!({ "name": "Puissance" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // a fresh name goes through
    let res = client
        .put(format!(
            "{}/api/categories/{}/attributes/{}",
            server.base_url, category_id, first_id
        ))
        .json(&json!({ "name": "Teinte", "required": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<Value>().await?;
    assert_eq!(payload["data"]["attribute"]["name"], json!("Teinte"));
    assert_eq!(payload["data"]["attribute"]["required"], json!(true));

    Ok(())
}

#[tokio::test]
async fn attribute_delete_and_category_cascade() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not configured");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = Client::new();

    let category_id = create_category(&client, &server.base_url, &common::unique("Tapis")).await?;

    let (_, attribute) = create_attribute(
        &client,
        &server.base_url,
        &category_id,
        json!({ "name": "Dimension", "type": "TEXT" }),
    )
    .await?;
    let attribute_id = attribute["data"]["attribute"]["id"].as_str().unwrap().to_string();

    // delete one attribute explicitly
    let res = client
        .delete(format!(
            "{}/api/categories/{}/attributes/{}",
            server.base_url, category_id, attribute_id
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // deleting again is a 404
    let res = client
        .delete(format!(
            "{}/api/categories/{}/attributes/{}",
            server.base_url, category_id, attribute_id
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // remaining attributes disappear with the category
    let _ = create_attribute(
        &client,
        &server.base_url,
        &category_id,
        json!({ "name": "Origine", "type": "TEXT" }),
    )
    .await?;
    let res = client
        .delete(format!("{}/api/categories/{}", server.base_url, category_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/categories/{}/attributes", server.base_url, category_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<Value>().await?;
    let attributes = payload["data"]["attributes"].as_array().cloned().unwrap_or_default();
    assert!(attributes.is_empty(), "attributes survived the cascade: {}", payload);

    Ok(())
}
