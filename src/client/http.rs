// Blocking HTTP client for the tree data gateway

use crate::client::path_spec::PathSpec;
use crate::client::{TreeClient, TreeConnection};
use crate::core::error::{BciError, RetrievalCause, Result};
use crate::core::trace::NodePayload;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

pub struct HttpTreeClient {
    client: Client,
    spec: PathSpec,
}

impl HttpTreeClient {
    pub fn new(spec: PathSpec, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BciError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self { client, spec })
    }

    pub fn spec(&self) -> &PathSpec {
        &self.spec
    }
}

impl TreeClient for HttpTreeClient {
    type Connection = HttpTreeConnection;

    fn open(&self, tree: &str, shot: i32) -> Result<HttpTreeConnection> {
        let url = format!("{}/trees/{}/{}", self.spec.base_url(), tree, shot);
        let paths = self.spec.expand(tree, shot).join(";");
        let context = format!("open {} shot {}", tree, shot);

        debug!("Opening {} via {}", context, url);

        let response = self
            .client
            .get(&url)
            .query(&[("path", paths.as_str())])
            .send()
            .map_err(|e| BciError::retrieval(&context, e.into()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BciError::retrieval(context, RetrievalCause::UnknownShot(shot)));
        }
        check_status(response, &context)?;

        Ok(HttpTreeConnection {
            client: self.client.clone(),
            node_url: format!("{}/node", url),
            paths,
            tree: tree.to_string(),
            shot,
        })
    }
}

pub struct HttpTreeConnection {
    client: Client,
    node_url: String,
    paths: String,
    tree: String,
    shot: i32,
}

impl TreeConnection for HttpTreeConnection {
    fn get_node(&mut self, node: &str) -> Result<NodePayload> {
        let context = format!("{} shot {} node {}", self.tree, self.shot, node);
        debug!("Reading {}", context);

        let response = self
            .client
            .get(&self.node_url)
            .query(&[("path", self.paths.as_str()), ("node", node)])
            .send()
            .map_err(|e| BciError::retrieval(&context, e.into()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BciError::retrieval(
                context,
                RetrievalCause::NodeNotFound(node.to_string()),
            ));
        }

        check_status(response, &context)?
            .json::<NodePayload>()
            .map_err(|e| BciError::retrieval(context, e.into()))
    }
}

impl Drop for HttpTreeConnection {
    fn drop(&mut self) {
        debug!("Released {} shot {}", self.tree, self.shot);
    }
}

fn check_status(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(BciError::retrieval(
        context,
        RetrievalCause::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn spec_for(server: &MockServer) -> PathSpec {
        format!("{}::/trees/~t;/archive/~t", server.uri())
            .parse()
            .unwrap()
    }

    // The blocking client must be built and dropped off the async runtime
    fn client(spec: PathSpec) -> HttpTreeClient {
        HttpTreeClient::new(spec, Some(Duration::from_secs(5))).unwrap()
    }

    async fn mount_shot(server: &MockServer, shot: i32) {
        Mock::given(method("GET"))
            .and(path(format!("/trees/bci/{}", shot)))
            .and(query_param("path", "/trees/bci;/archive/bci"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_node_payload() {
        let server = MockServer::start().await;
        mount_shot(&server, 169572).await;
        Mock::given(method("GET"))
            .and(path("/trees/bci/169572/node"))
            .and(query_param("node", "\\PL1V2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [0.5, 1.5, 2.5],
                "rate": 1000.0,
                "start": -0.001
            })))
            .mount(&server)
            .await;

        let spec = spec_for(&server);
        let payload = tokio::task::spawn_blocking(move || {
            let mut conn = client(spec).open("bci", 169572)?;
            conn.get_node("\\PL1V2")
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(payload.data, vec![0.5, 1.5, 2.5]);
        assert_eq!(payload.rate, Some(1000.0));
        assert_eq!(payload.start, Some(-0.001));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_shot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trees/bci/1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let spec = spec_for(&server);
        let err = tokio::task::spawn_blocking(move || client(spec).open("bci", 1).err())
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            err,
            BciError::Retrieval {
                source: RetrievalCause::UnknownShot(1),
                ..
            }
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_node() {
        let server = MockServer::start().await;
        mount_shot(&server, 169572).await;
        Mock::given(method("GET"))
            .and(path("/trees/bci/169572/node"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let spec = spec_for(&server);
        let err = tokio::task::spawn_blocking(move || {
            let mut conn = client(spec).open("bci", 169572)?;
            conn.get_node("\\VIB1V2")
        })
        .await
        .unwrap()
        .unwrap_err();

        assert!(matches!(
            err,
            BciError::Retrieval {
                source: RetrievalCause::NodeNotFound(ref node),
                ..
            } if node == "\\VIB1V2"
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_server_error_and_bad_body() {
        let server = MockServer::start().await;
        mount_shot(&server, 169572).await;
        Mock::given(method("GET"))
            .and(path("/trees/bci/169572/node"))
            .and(query_param("node", "\\PL1V1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/trees/bci/169572/node"))
            .and(query_param("node", "\\PL1V3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let spec = spec_for(&server);
        let (status_err, body_err) = tokio::task::spawn_blocking(move || {
            let mut conn = client(spec).open("bci", 169572).unwrap();
            (
                conn.get_node("\\PL1V1").unwrap_err(),
                conn.get_node("\\PL1V3").unwrap_err(),
            )
        })
        .await
        .unwrap();

        assert!(matches!(
            status_err,
            BciError::Retrieval {
                source: RetrievalCause::Status { status: 500, .. },
                ..
            }
        ));
        assert!(matches!(
            body_err,
            BciError::Retrieval {
                source: RetrievalCause::Http(_),
                ..
            }
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unreachable_server() {
        let spec: PathSpec = "http://127.0.0.1:1::/trees/~t".parse().unwrap();
        let err = tokio::task::spawn_blocking(move || client(spec).open("bci", 169572).err())
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            err,
            BciError::Retrieval {
                source: RetrievalCause::Http(_),
                ..
            }
        ));
    }
}
