use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::{FetchCause, FetchError};
use crate::config::FetchSettings;
use crate::domain::{FeedDescriptor, RawFeedPayload};
use crate::fetcher::Fetcher;

pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    async fn get(&self, uri: &str) -> Result<Vec<u8>, FetchCause> {
        let url = Url::parse(uri)?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(FetchCause::UnsupportedScheme(other.to_string())),
        }

        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchCause::Status(status.as_u16()));
        }

        let limit = self.max_body_bytes;
        if response
            .content_length()
            .is_some_and(|len| len > limit as u64)
        {
            return Err(FetchCause::TooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len().saturating_add(chunk.len()) > limit {
                return Err(FetchCause::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, descriptor: &FeedDescriptor) -> Result<RawFeedPayload, FetchError> {
        let bytes = self
            .get(&descriptor.uri)
            .await
            .map_err(|cause| FetchError::new(descriptor.clone(), cause))?;

        tracing::debug!(bytes = bytes.len(), "Fetched {}", descriptor.uri);

        Ok(RawFeedPayload::new(descriptor.clone(), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(settings: FetchSettings) -> HttpFetcher {
        HttpFetcher::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .and(header("user-agent", "feedpipe-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<rss/>"))
            .expect(1)
            .mount(&server)
            .await;

        let settings = FetchSettings {
            user_agent: "feedpipe-test".into(),
            ..FetchSettings::default()
        };
        let descriptor = FeedDescriptor::new(format!("{}/feed.xml", server.uri()));

        let payload = fetcher(settings).fetch(&descriptor).await.unwrap();

        assert_eq!(payload.bytes, b"<rss/>");
        assert_eq!(payload.descriptor, descriptor);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let descriptor = FeedDescriptor::new(format!("{}/missing.xml", server.uri()));
        let err = fetcher(FetchSettings::default())
            .fetch(&descriptor)
            .await
            .unwrap_err();

        assert!(matches!(err.cause, FetchCause::Status(404)));
        assert_eq!(err.descriptor, descriptor);
    }

    #[tokio::test]
    async fn test_body_over_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
            .mount(&server)
            .await;

        let settings = FetchSettings {
            max_body_bytes: 16,
            ..FetchSettings::default()
        };
        let descriptor = FeedDescriptor::new(format!("{}/big.xml", server.uri()));
        let err = fetcher(settings).fetch(&descriptor).await.unwrap_err();

        assert!(matches!(err.cause, FetchCause::TooLarge { limit: 16 }));
    }

    #[tokio::test]
    async fn test_chunked_body_over_limit_stops_early() {
        // Chunked response with no Content-Length that never finishes
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await.unwrap();
            let head = "HTTP/1.1 200 OK\r\nContent-Type: application/rss+xml\r\nTransfer-Encoding: chunked\r\n\r\n";
            socket.write_all(head.as_bytes()).await.unwrap();
            let chunk = format!("40\r\n{}\r\n", "x".repeat(64));
            socket.write_all(chunk.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let settings = FetchSettings {
            max_body_bytes: 16,
            timeout_secs: 5,
            ..FetchSettings::default()
        };
        let descriptor = FeedDescriptor::new(format!("http://{}/stream.xml", addr));

        let started = Instant::now();
        let err = fetcher(settings).fetch(&descriptor).await.unwrap_err();

        assert!(matches!(err.cause, FetchCause::TooLarge { limit: 16 }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_client_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let settings = FetchSettings {
            timeout_secs: 1,
            ..FetchSettings::default()
        };
        let descriptor = FeedDescriptor::new(format!("{}/slow.xml", server.uri()));
        let err = fetcher(settings).fetch(&descriptor).await.unwrap_err();

        assert!(matches!(err.cause, FetchCause::Http(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let descriptor = FeedDescriptor::new("ftp://example.com/feed.xml");
        let err = fetcher(FetchSettings::default())
            .fetch(&descriptor)
            .await
            .unwrap_err();

        assert!(matches!(err.cause, FetchCause::UnsupportedScheme(ref s) if s == "ftp"));
    }
}
