//! HTTP access to the published datasets.

use reqwest::blocking::Client;
use tracing::info;

use crate::error::{Error, Result};

/// Source of upstream text files, keyed by URL.
///
/// Any closure `Fn(&str) -> Result<String>` is a fetcher, which is how tests
/// feed fixture text into the pipelines.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

impl<F> Fetcher for F
where
    F: Fn(&str) -> Result<String>,
{
    fn fetch(&self, url: &str) -> Result<String> {
        self(url)
    }
}

/// Blocking HTTP fetcher. Responses are ISO-8859-1 encoded.
#[derive(Debug, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching {}", url);

        let http = |source: reqwest::Error| Error::Http {
            url: url.to_string(),
            source,
        };
        let bytes = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(http)?;

        info!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(decode_latin1(&bytes))
    }
}

/// ISO-8859-1 maps every byte to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answers a single request on a local port with `response`.
    fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            stream.write_all(&response).unwrap();
        });
        format!("http://{addr}/vertices.txt")
    }

    fn local_fetcher() -> HttpFetcher {
        HttpFetcher {
            client: Client::builder().no_proxy().build().unwrap(),
        }
    }

    #[test]
    fn test_decode_latin1() {
        // "Ä 1.0" with Ä as 0xC4
        let text = decode_latin1(&[0xC4, b' ', b'1', b'.', b'0']);
        assert_eq!(text, "Ä 1.0");
    }

    #[test]
    fn test_http_fetch_decodes_latin1() {
        let mut response =
            b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\n".to_vec();
        response.extend_from_slice(&[0xC4, b' ', b'1', b'.', b'0']);
        let url = serve_once(response);

        assert_eq!(local_fetcher().fetch(&url).unwrap(), "Ä 1.0");
    }

    #[test]
    fn test_http_error_status() {
        let url = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_vec(),
        );

        match local_fetcher().fetch(&url) {
            Err(Error::Http { url: failed, source }) => {
                assert_eq!(failed, url);
                assert_eq!(source.status(), Some(reqwest::StatusCode::NOT_FOUND));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn test_http_connection_refused() {
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let url = format!("http://{addr}/vertices.txt");

        assert!(matches!(
            local_fetcher().fetch(&url),
            Err(Error::Http { .. })
        ));
    }

    #[test]
    fn test_closure_fetcher() {
        let fetcher = |url: &str| -> Result<String> { Ok(format!("body of {url}")) };
        assert_eq!(fetcher.fetch("a").unwrap(), "body of a");
    }
}
