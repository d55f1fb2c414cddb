//! Default [`HttpCaller`] built on `reqwest`.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::clients::{ClientConfig, HttpCall, HttpCaller, HttpResponse};
use crate::framework::HttpError;

#[derive(Clone)]
pub struct ReqwestCaller {
    client: Client,
    config: ClientConfig,
}

impl ReqwestCaller {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn from_env() -> Result<Self, HttpError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl HttpCaller for ReqwestCaller {
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    async fn call(&self, request: HttpCall) -> Result<HttpResponse, HttpError> {
        let url = self.config.resolve(&request.url)?;
        let mut builder = self.client.request(request.method.into(), url);

        for (name, value) in &self.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(params) = &request.params {
            let query: Vec<(String, String)> = params
                .iter()
                .map(|(k, v)| match v {
                    Value::String(s) => (k.clone(), s.clone()),
                    other => (k.clone(), other.to_string()),
                })
                .collect();
            builder = builder.query(&query);
        }
        if let Some(data) = &request.data {
            builder = builder.json(data);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| HttpError::Decode(e.to_string()))?;
        let data = parse_body(&text);

        if !status.is_success() {
            warn!(status = status.as_u16(), "Request failed");
            return Err(HttpError::Status {
                status: status.as_u16(),
                body: data,
            });
        }
        debug!(status = status.as_u16(), "Response");
        Ok(HttpResponse {
            status: status.as_u16(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Method;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn call(method: Method, url: &str) -> HttpCall {
        HttpCall {
            method,
            url: url.to_string(),
            params: None,
            data: None,
        }
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(parse_body("plain"), json!("plain"));
    }

    #[tokio::test]
    async fn test_get_with_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .mount(&server)
            .await;

        let caller = ReqwestCaller::new(ClientConfig::new(&server.uri()).unwrap());
        let mut request = call(Method::Get, "/users");
        request.params = Some(json!({"page": 2}).as_object().cloned().unwrap());

        let response = caller.call(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.data, json!([{"id": 1}]));
    }

    #[tokio::test]
    async fn test_shared_client_with_default_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(wiremock::matchers::header("x-tenant", "acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::new(&format!("{}/api", server.uri()))
            .unwrap()
            .with_header("x-tenant", "acme");
        let caller = ReqwestCaller::with_client(Client::new(), config.clone());
        assert_eq!(caller.config(), &config);

        let response = caller.call(call(Method::Get, "/users")).await.unwrap();
        assert_eq!(response.data, json!([]));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_json(json!({"name": "Ada"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5, "name": "Ada"})))
            .mount(&server)
            .await;

        let caller = ReqwestCaller::new(ClientConfig::new(&server.uri()).unwrap());
        let mut request = call(Method::Post, "/users");
        request.data = Some(json!({"name": "Ada"}));

        let response = caller.call(request).await.unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(response.data["id"], 5);
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/users/1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "gone"})))
            .mount(&server)
            .await;

        let caller = ReqwestCaller::new(ClientConfig::new(&server.uri()).unwrap());
        let err = caller.call(call(Method::Delete, "/users/1")).await.unwrap_err();
        assert_eq!(
            err,
            HttpError::Status {
                status: 404,
                body: json!({"error": "gone"})
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        let caller = ReqwestCaller::new(ClientConfig::new("http://127.0.0.1:1").unwrap());
        let err = caller.call(call(Method::Get, "/users")).await.unwrap_err();
        assert!(matches!(err, HttpError::Network(_)));
    }
}
