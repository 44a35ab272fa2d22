use std::time::Duration;

use log::info;
use reqwest::{
    blocking::Client,
    header::{ACCEPT, USER_AGENT},
};

use crate::errors::DiabetesError;

/// Download the body of `url` as text.  Fails on a transport error or on a
/// non-success status.  Nothing is written to disk.
pub fn download_text(url: &str, timeout: Duration) -> Result<String, DiabetesError> {
    let fetch_error = |reason: String| DiabetesError::RemoteFetch {
        url: url.to_string(),
        reason,
    };

    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;
    let response = client
        .get(url)
        .header(USER_AGENT, concat!("diabetes_data/", env!("CARGO_PKG_VERSION")))
        .header(ACCEPT, "text/csv,text/plain,*/*")
        .send()
        .map_err(|e| fetch_error(e.to_string()))?;
    if !response.status().is_success() {
        return Err(fetch_error(format!("status {}", response.status())));
    }
    let body = response.text().map_err(|e| fetch_error(e.to_string()))?;
    info!("downloaded {} bytes from {}", body.len(), url);

    Ok(body)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::error::Error;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Serve a single canned HTTP response on a random local port and return
    /// the url to hit.
    pub(crate) fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/diabetes.csv", addr)
    }

    #[test]
    fn download_ok() -> Result<(), Box<dyn Error>> {
        let url = serve_once("200 OK", "Pregnancies,Glucose\n1,85\n");
        let body = download_text(&url, Duration::from_secs(5))?;
        assert_eq!(body, "Pregnancies,Glucose\n1,85\n");
        Ok(())
    }

    #[test]
    fn download_other_success_status() -> Result<(), Box<dyn Error>> {
        let url = serve_once("203 Non-Authoritative Information", "Pregnancies\n1\n");
        let body = download_text(&url, Duration::from_secs(5))?;
        assert_eq!(body, "Pregnancies\n1\n");
        Ok(())
    }

    #[test]
    fn download_server_error() {
        let url = serve_once("500 Internal Server Error", "");
        assert!(matches!(
            download_text(&url, Duration::from_secs(5)),
            Err(DiabetesError::RemoteFetch { .. })
        ));
    }

    #[test]
    fn download_not_found() {
        let url = serve_once("404 Not Found", "");
        let res = download_text(&url, Duration::from_secs(5));
        match res {
            Err(DiabetesError::RemoteFetch { reason, .. }) => assert!(reason.contains("404")),
            other => panic!("expected a RemoteFetch error, got {:?}", other),
        }
    }
}
