use serde_json::{Map, Value};

use crate::{config::SwaggerConfig, error::Result};

/// Rewrites `host`, `basePath`, `schemes` and `info.*` of a Swagger document.
///
/// `host` and `basePath` fall back to the request host and `/` when the
/// document leaves them out or still holds a `{placeholder}`.
pub fn patch_document(
    document: &mut Map<String, Value>,
    config: &SwaggerConfig,
    request_host: Option<&str>,
) {
    if !config.host.is_empty() {
        document.insert("host".to_string(), Value::from(config.host.as_str()));
    } else if needs_default(document.get("host")) {
        if let Some(host) = request_host {
            document.insert("host".to_string(), Value::from(host));
        }
    }

    if !config.base_path.is_empty() {
        document.insert("basePath".to_string(), Value::from(config.base_path.as_str()));
    } else if needs_default(document.get("basePath")) {
        document.insert("basePath".to_string(), Value::from("/"));
    }

    if !config.schemes.is_empty() {
        document.insert("schemes".to_string(), Value::from(config.schemes.clone()));
    }

    let info = &config.info;
    let updates: Vec<(&str, &str)> = [
        ("title", info.title.as_str()),
        ("version", info.version.as_str()),
        ("termsOfService", info.terms_of_service.as_str()),
        ("description", info.description.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .collect();

    if updates.is_empty() {
        return;
    }

    let info = document
        .entry("info")
        .or_insert_with(|| Value::Object(Map::new()));
    if !info.is_object() {
        *info = Value::Object(Map::new());
    }
    if let Some(info) = info.as_object_mut() {
        for (field, value) in updates {
            info.insert(field.to_string(), Value::from(value));
        }
    }
}

/// Parses, patches and re-serializes a document. Fails with
/// [`SwaggerError::DocumentParse`](crate::SwaggerError::DocumentParse) when
/// `content` is not a JSON object.
pub fn render_document(
    content: &[u8],
    config: &SwaggerConfig,
    request_host: Option<&str>,
) -> Result<Vec<u8>> {
    let mut document: Map<String, Value> = serde_json::from_slice(content)?;
    patch_document(&mut document, config, request_host);
    Ok(serde_json::to_vec(&document)?)
}

fn needs_default(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(value)) => value.contains('{'),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwaggerError;
    use serde_json::json;

    fn patched(document: Value, config: &SwaggerConfig, host: Option<&str>) -> Value {
        let content = serde_json::to_vec(&document).unwrap();
        serde_json::from_slice(&render_document(&content, config, host).unwrap()).unwrap()
    }

    #[test]
    fn placeholder_host_and_title() {
        let config = SwaggerConfig::new().with_title("My API");
        let output = patched(
            json!({ "host": "{defaultHost}", "basePath": "/", "info": {} }),
            &config,
            Some("api.example.com"),
        );

        assert_eq!(
            output,
            json!({ "host": "api.example.com", "basePath": "/", "info": { "title": "My API" } })
        );
    }

    #[test]
    fn concrete_host_is_kept_without_override() {
        let output = patched(
            json!({ "host": "petstore.swagger.io" }),
            &SwaggerConfig::new(),
            Some("localhost:8080"),
        );
        assert_eq!(output["host"], "petstore.swagger.io");
    }

    #[test]
    fn templated_host_is_replaced_by_request_host() {
        let output = patched(
            json!({ "host": "api.{env}.example.com" }),
            &SwaggerConfig::new(),
            Some("localhost:8080"),
        );
        assert_eq!(output["host"], "localhost:8080");
    }

    #[test]
    fn missing_host_without_request_host_is_left_out() {
        let output = patched(json!({}), &SwaggerConfig::new(), None);
        assert!(output.get("host").is_none());
        assert_eq!(output["basePath"], "/");
    }

    #[test]
    fn configured_values_always_win() {
        let config = SwaggerConfig::new()
            .with_host("docs.example.com")
            .with_base_path("/v2")
            .with_schemes(["https"]);
        let output = patched(
            json!({ "host": "petstore.swagger.io", "basePath": "/v1", "schemes": ["http", "ws"] }),
            &config,
            Some("localhost"),
        );

        assert_eq!(output["host"], "docs.example.com");
        assert_eq!(output["basePath"], "/v2");
        assert_eq!(output["schemes"], json!(["https"]));
    }

    #[test]
    fn schemes_untouched_without_configuration() {
        let output = patched(json!({ "schemes": ["http"] }), &SwaggerConfig::new(), None);
        assert_eq!(output["schemes"], json!(["http"]));
    }

    #[test]
    fn templated_and_null_base_path_default_to_root() {
        let config = SwaggerConfig::new();
        assert_eq!(patched(json!({ "basePath": "/{version}" }), &config, None)["basePath"], "/");
        assert_eq!(patched(json!({ "basePath": null }), &config, None)["basePath"], "/");
        assert_eq!(patched(json!({ "basePath": "/v1" }), &config, None)["basePath"], "/v1");
    }

    #[test]
    fn info_fields_only_set_when_configured() {
        let config = SwaggerConfig::new()
            .with_version("3.1.0")
            .with_terms_of_service("https://example.com/tos")
            .with_description("Patched");
        let output = patched(
            json!({
                "info": { "title": "Original", "version": "1.0", "contact": { "name": "Ops" } }
            }),
            &config,
            None,
        );

        assert_eq!(
            output["info"],
            json!({
                "title": "Original",
                "version": "3.1.0",
                "contact": { "name": "Ops" },
                "termsOfService": "https://example.com/tos",
                "description": "Patched"
            })
        );
    }

    #[test]
    fn info_created_when_missing_or_not_an_object() {
        let config = SwaggerConfig::new().with_title("T");
        assert_eq!(patched(json!({}), &config, None)["info"], json!({ "title": "T" }));
        assert_eq!(
            patched(json!({ "info": "bogus" }), &config, None)["info"],
            json!({ "title": "T" })
        );
    }

    #[test]
    fn other_fields_pass_through_in_order() {
        let content = br#"{"swagger":"2.0","paths":{"/pets":{"get":{}}},"host":"a.b"}"#;
        let output = render_document(content, &SwaggerConfig::new(), None).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            r#"{"swagger":"2.0","paths":{"/pets":{"get":{}}},"host":"a.b","basePath":"/"}"#
        );
    }

    #[test]
    fn non_object_documents_fail_to_parse() {
        let config = SwaggerConfig::new();
        assert!(matches!(
            render_document(b"[1, 2]", &config, None),
            Err(SwaggerError::DocumentParse(_))
        ));
        assert!(matches!(
            render_document(b"{not json", &config, None),
            Err(SwaggerError::DocumentParse(_))
        ));
    }
}
