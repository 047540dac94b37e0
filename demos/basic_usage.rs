use std::net::SocketAddr;

use axum::{Json, Router, routing::get};
use axum_swagger_assets::prelude::*;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Swagger UI</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist/swagger-ui.css" />
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://unpkg.com/swagger-ui-dist/swagger-ui-bundle.js" crossorigin></script>
<script>
  window.onload = () => {
    window.ui = SwaggerUIBundle({ url: 'swagger.json', dom_id: '#swagger-ui' });
  };
</script>
</body>
</html>
"#;

const SWAGGER_JSON: &str = r#"{
  "swagger": "2.0",
  "info": {
    "title": "Swagger Example API",
    "version": "1.0",
    "description": "This is a sample server Petstore server.",
    "termsOfService": "http://swagger.io/terms/"
  },
  "host": "{host}",
  "basePath": "/v2",
  "paths": {
    "/pets": {
      "get": {
        "summary": "List all pets",
        "responses": { "200": { "description": "A list of pets" } }
      }
    }
  }
}"#;

async fn list_pets() -> Json<Value> {
    Json(json!([{ "id": 1, "name": "Rex" }]))
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("axum_swagger_assets=debug,info")),
        )
        .init();

    // Usually this document comes from the application's config file
    let host_config = json!({
        "swagger": {
            "user": "admin",
            "pass": "admin",
            "title": "Pet Store",
            "schemes": ["http"]
        }
    });
    let config = SwaggerConfig::from_host_config(&host_config)?;

    let assets = AssetSource::memory([("index.html", INDEX_HTML), ("swagger.json", SWAGGER_JSON)]);
    let swagger = SwaggerPlugin::new(config, assets)?;

    let app = swagger.install(Router::new().route("/v2/pets", get(list_pets)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8199").await?;
    tracing::info!("Swagger UI on http://127.0.0.1:8199/swagger/index.html (admin/admin)");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
