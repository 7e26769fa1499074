// src/core/net.rs
// HTTPS GET for the search page. No retries and no timeouts of our own;
// whatever the transport enforces is the only bound.

use std::io;

use thiserror::Error;

use crate::config::LookupOptions;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status.
    #[error("HTTP status {0}")]
    Status(u16),
    /// DNS, TLS, connection reset, unreadable body...
    #[error("{0}")]
    Transport(String),
}

impl From<io::Error> for FetchError {
    fn from(e: io::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}

/// Anything that can turn a URL into a response body.
/// The resolver only talks to this, so fixtures can stand in for the network.
pub trait Fetch {
    fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        (**self).get_text(url)
    }
}

impl<F: Fetch + ?Sized> Fetch for std::sync::Arc<F> {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        (**self).get_text(url)
    }
}

pub struct HttpFetch {
    agent: ureq::Agent,
}

impl HttpFetch {
    pub fn new(options: &LookupOptions) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(&options.user_agent)
            .build();
        Self { agent }
    }
}

impl Default for HttpFetch {
    fn default() -> Self {
        Self::new(&LookupOptions::default())
    }
}

impl Fetch for HttpFetch {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        match self.agent.get(url).call() {
            // Redirects ureq could not follow come back as Ok.
            Ok(resp) if !(200..=299).contains(&resp.status()) => Err(FetchError::Status(resp.status())),
            Ok(resp) => Ok(resp.into_string()?),
            Err(ureq::Error::Status(code, _)) => Err(FetchError::Status(code)),
            Err(ureq::Error::Transport(t)) => Err(FetchError::Transport(t.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer one request on a local port with `response`, return its URL.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut req = Vec::new();
            let mut buf = [0u8; 1024];
            while !req.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => req.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{addr}/search/movies?q=x")
    }

    #[test]
    fn ok_body_is_returned() {
        let url = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello");
        assert_eq!(HttpFetch::default().get_text(&url).unwrap(), "hello");
    }

    #[test]
    fn unfollowed_redirect_is_a_status_error() {
        let url = serve_once("HTTP/1.1 302 Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        assert!(matches!(HttpFetch::default().get_text(&url), Err(FetchError::Status(302))));
    }

    #[test]
    fn server_error_is_a_status_error() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        assert!(matches!(HttpFetch::default().get_text(&url), Err(FetchError::Status(503))));
    }
}
