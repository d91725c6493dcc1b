//! mpm download over HTTP
//!
//! One GET, no retries. The body is streamed to disk in chunks so an
//! interrupt can stop the transfer and remove the half-written file.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{Result, WizardError};
use crate::process_guard::{CancellationToken, CleanupRegistry};

const CHUNK_SIZE: usize = 64 * 1024;

/// Blocking HTTP client for the mpm binary.
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("mpm-wizard/", env!("CARGO_PKG_VERSION")))
            // The wizard has no timeout policy; a stalled transfer waits for Ctrl+C.
            .timeout(Option::<Duration>::None)
            .build()
            .map_err(|e| WizardError::download(e.to_string()))?;
        Ok(Self { client })
    }

    /// Download `url` into `dest`, returning the number of bytes written.
    ///
    /// Any non-200 status is an error. On failure or cancellation `dest` is removed.
    pub fn download(&self, url: &str, dest: &Path, cancel: &CancellationToken) -> Result<u64> {
        tracing::info!("Downloading {} to {}", url, dest.display());

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| WizardError::download(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(WizardError::download(format!(
                "download failed: HTTP {}",
                status
            )));
        }

        let mut file = File::create(dest)
            .map_err(|e| WizardError::download(format!("{}: {}", dest.display(), e)))?;

        with_registry(|r| r.register_partial_file(dest));
        let copied = copy_with_cancel(&mut response, &mut file, cancel);
        with_registry(|r| r.unregister_partial_file(dest));
        drop(file);

        match copied {
            Ok(bytes) => {
                tracing::info!("Downloaded {} bytes", bytes);
                Ok(bytes)
            }
            Err(e) => {
                if let Err(rm) = std::fs::remove_file(dest) {
                    tracing::warn!("Could not remove partial download {}: {}", dest.display(), rm);
                }
                Err(e)
            }
        }
    }
}

fn with_registry(f: impl FnOnce(&mut CleanupRegistry)) {
    if let Ok(mut registry) = CleanupRegistry::global().lock() {
        f(&mut registry);
    }
}

/// Copy `reader` into `writer`, checking `cancel` between chunks.
pub fn copy_with_cancel<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    cancel: &CancellationToken,
) -> Result<u64> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        if cancel.is_cancelled() {
            return Err(WizardError::Interrupted);
        }

        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(WizardError::download(e.to_string())),
        };

        writer
            .write_all(&buf[..n])
            .map_err(|e| WizardError::download(e.to_string()))?;
        total += n as u64;
    }

    writer
        .flush()
        .map_err(|e| WizardError::download(e.to_string()))?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Cursor};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answer one request on loopback with `response`, returning the base URL.
    fn serve_once(response: &'static [u8]) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = reader.into_inner();
            stream.write_all(response).unwrap();
            stream.flush().unwrap();
        });
        (url, handle)
    }

    #[test]
    fn test_copy_whole_stream() {
        let data = vec![7u8; CHUNK_SIZE * 2 + 13];
        let mut out = Vec::new();
        let copied =
            copy_with_cancel(&mut Cursor::new(&data), &mut out, &CancellationToken::new()).unwrap();
        assert_eq!(copied, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn test_copy_stops_when_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let mut out = Vec::new();
        let result = copy_with_cancel(&mut Cursor::new(vec![1u8; 10]), &mut out, &token);
        assert!(matches!(result, Err(WizardError::Interrupted)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_connection_failure_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mpm");
        let downloader = HttpDownloader::new().unwrap();

        // Port 1 on loopback refuses connections.
        let result = downloader.download("http://127.0.0.1:1/mpm", &dest, &CancellationToken::new());
        assert!(matches!(result, Err(WizardError::Download(_))));
        assert!(!dest.exists());
    }

    #[test]
    fn test_not_found_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mpm");
        let (url, server) = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found",
        );

        let downloader = HttpDownloader::new().unwrap();
        let result = downloader.download(&format!("{}/mpm", url), &dest, &CancellationToken::new());
        server.join().unwrap();

        let err = result.unwrap_err();
        assert!(matches!(err, WizardError::Download(_)));
        assert!(err.to_string().contains("download failed: HTTP 404"));
        assert!(!dest.exists());
    }

    #[test]
    fn test_ok_response_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mpm");
        let (url, server) = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\nConnection: close\r\n\r\n#!/bin/sh\n",
        );

        let downloader = HttpDownloader::new().unwrap();
        let bytes = downloader
            .download(&format!("{}/mpm", url), &dest, &CancellationToken::new())
            .unwrap();
        server.join().unwrap();

        assert_eq!(bytes, 10);
        assert_eq!(std::fs::read(&dest).unwrap(), b"#!/bin/sh\n");
    }
}
