use std::future::Future;

pub use http;

/// An abstract HTTP client.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait HttpClient {
    /// Send an HTTP request and return the response.
    ///
    /// Non-2xx statuses are returned as responses, not errors; only transport
    /// failures are reported through the `Err` side.
    fn send_http(
        &self,
        request: http::Request<Vec<u8>>,
    ) -> impl Future<
        Output = core::result::Result<
            http::Response<Vec<u8>>,
            Box<dyn std::error::Error + Send + Sync + 'static>,
        >,
    >;
}

#[cfg(feature = "default-client")]
pub mod default {
    use super::HttpClient;
    use reqwest::Client;

    /// [`HttpClient`] implementation backed by [`reqwest`].
    #[derive(Debug, Clone, Default)]
    pub struct DefaultHttpClient {
        client: Client,
    }

    impl DefaultHttpClient {
        pub fn new(client: Client) -> Self {
            Self { client }
        }
    }

    impl HttpClient for DefaultHttpClient {
        async fn send_http(
            &self,
            request: http::Request<Vec<u8>>,
        ) -> core::result::Result<
            http::Response<Vec<u8>>,
            Box<dyn std::error::Error + Send + Sync + 'static>,
        > {
            let response = self.client.execute(request.try_into()?).await?;
            let mut builder = http::Response::builder().status(response.status());
            for (k, v) in response.headers() {
                builder = builder.header(k, v);
            }
            builder.body(response.bytes().await?.to_vec()).map_err(Into::into)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use http::{Method, Request, StatusCode};
        use mockito::{Matcher, Server};

        #[tokio::test]
        async fn test_send_http() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            let mut server = Server::new_async().await;
            let mock = server
                .mock("POST", "/token")
                .match_header("content-type", "application/x-www-form-urlencoded")
                .match_body(Matcher::Exact(String::from("a=b")))
                .with_status(400)
                .with_header("content-type", "application/json")
                .with_body(r#"{"error":"invalid_request"}"#)
                .create_async()
                .await;

            let request = Request::builder()
                .method(Method::POST)
                .uri(format!("{}/token", server.url()))
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(b"a=b".to_vec())?;
            let response = DefaultHttpClient::default().send_http(request).await?;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                response.headers().get("content-type").map(|v| v.as_bytes()),
                Some(&b"application/json"[..])
            );
            assert_eq!(response.body(), br#"{"error":"invalid_request"}"#);
            mock.assert_async().await;
            Ok(())
        }

        #[tokio::test]
        async fn test_send_http_connection_refused() {
            let request = Request::builder()
                .method(Method::GET)
                .uri("http://127.0.0.1:1/unreachable")
                .body(Vec::new())
                .expect("request should be built");
            assert!(DefaultHttpClient::default().send_http(request).await.is_err());
        }
    }
}
