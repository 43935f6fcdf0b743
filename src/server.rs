//! One-shot loopback HTTP server
//!
//! Serves a single in-memory document under `/<file name>` until one
//! transfer completes. Any other path gets a 404 and the server keeps
//! waiting. The server is started before its URL is handed out, so a
//! viewer launched with that URL cannot race the listener.

use crate::RandpageError;
use std::cell::Cell;
use std::io::{self, Read};
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Disposable server for one document
pub struct OneShotServer {
    server: Arc<Server>,
    port: u16,
    file_name: String,
    done: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl OneShotServer {
    /// Bind an OS-assigned loopback port and start serving `body`
    pub fn bind(file_name: &str, body: Vec<u8>) -> Result<Self, RandpageError> {
        let listener = TcpListener::bind("127.0.0.1:0").map_err(RandpageError::Bind)?;
        let port = listener.local_addr().map_err(RandpageError::Bind)?.port();

        let server = Server::from_listener(listener, None)
            .map_err(|e| RandpageError::Http(e.to_string()))?;
        let server = Arc::new(server);

        let content_type = Header::from_bytes(&b"Content-Type"[..], &b"application/pdf"[..])
            .map_err(|_| RandpageError::Http("invalid Content-Type header".to_string()))?;

        let (tx, done) = mpsc::sync_channel(1);
        let document = Document {
            path: format!("/{}", file_name),
            body: body.into(),
            content_type,
        };

        let worker = Arc::clone(&server);
        let handle = thread::spawn(move || serve(&worker, &document, &tx));

        Ok(Self {
            server,
            port,
            file_name: file_name.to_string(),
            done,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path the document is served under, percent-escaped
    pub fn url_path(&self) -> String {
        format!("/{}", urlencoding::encode(&self.file_name))
    }

    /// URL a viewer should open to land on `page`
    pub fn url(&self, page: u32) -> String {
        format!("http://127.0.0.1:{}{}#page={}", self.port, self.url_path(), page)
    }

    /// Block until the document has been transferred once
    ///
    /// There is no timeout: if nothing ever requests the document, this
    /// never returns.
    pub fn wait(self) -> Result<(), RandpageError> {
        self.done.recv().map_err(|_| {
            RandpageError::Http("server stopped before the document was served".to_string())
        })
    }
}

impl Drop for OneShotServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

struct Document {
    /// Decoded request path that matches
    path: String,
    body: Arc<[u8]>,
    content_type: Header,
}

fn serve(server: &Server, document: &Document, done: &SyncSender<()>) {
    for request in server.incoming_requests() {
        log::info!(
            "http request method={} path={} user-agent={}",
            request.method(),
            request.url(),
            user_agent(&request).unwrap_or("-")
        );

        if !matches_path(request.url(), &document.path) {
            if let Err(e) = request.respond(Response::empty(404)) {
                log::warn!("answering {}: {}", document.path, e);
            }
            continue;
        }

        // HEAD carries no body, so it can't complete the transfer
        if *request.method() == Method::Head {
            if let Err(e) = send_head(request, document) {
                log::debug!("answering HEAD {}: {}", document.path, e);
            }
            continue;
        }

        match send_document(request, document) {
            Ok(()) => {
                // Receiver may already be gone; nothing else to do either way
                let _ = done.try_send(());
                return;
            }
            Err(e) => {
                log::error!("{} path={}", RandpageError::Write(e), document.path);
            }
        }
    }
}

fn send_document(request: Request, document: &Document) -> io::Result<()> {
    let len = document.body.len();
    let sent = Rc::new(Cell::new(0usize));
    let reader = BodyReader {
        body: Arc::clone(&document.body),
        pos: 0,
        sent: Rc::clone(&sent),
    };

    let response = Response::new(
        StatusCode(200),
        vec![document.content_type.clone()],
        reader,
        Some(len),
        None,
    )
    // Never switch to chunked encoding; viewers get a real Content-Length
    .with_chunked_threshold(usize::MAX);
    request.respond(response)?;

    // A client that hangs up mid-body can still look like a clean respond()
    if sent.get() < len {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("transfer stopped after {} of {} bytes", sent.get(), len),
        ));
    }
    Ok(())
}

fn send_head(request: Request, document: &Document) -> io::Result<()> {
    let response = Response::new(
        StatusCode(200),
        vec![document.content_type.clone()],
        io::empty(),
        Some(document.body.len()),
        None,
    )
    .with_chunked_threshold(usize::MAX);
    request.respond(response)
}

fn matches_path(url: &str, expected: &str) -> bool {
    let path = url.split('?').next().unwrap_or(url);
    match urlencoding::decode(path) {
        Ok(decoded) => decoded == expected,
        Err(_) => false,
    }
}

fn user_agent(request: &Request) -> Option<&str> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv("User-Agent"))
        .map(|h| h.value.as_str())
}

/// Reads the shared body and records how much of it was handed out
struct BodyReader {
    body: Arc<[u8]>,
    pos: usize,
    sent: Rc<Cell<usize>>,
}

impl Read for BodyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.body[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        self.sent.set(self.pos);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_path() {
        assert!(matches_path("/report.pdf", "/report.pdf"));
        assert!(matches_path("/report.pdf?download=1", "/report.pdf"));
        assert!(matches_path("/my%20report.pdf", "/my report.pdf"));
        assert!(!matches_path("/favicon.ico", "/report.pdf"));
        assert!(!matches_path("/", "/report.pdf"));
        assert!(!matches_path("/sub/report.pdf", "/report.pdf"));
    }

    #[test]
    fn test_url_format() {
        let server = OneShotServer::bind("my report.pdf", b"%PDF-1.5".to_vec()).unwrap();
        let url = server.url(3);
        assert!(url.starts_with("http://127.0.0.1:"));
        assert!(url.ends_with("/my%20report.pdf#page=3"));
        assert!(url.contains(&format!(":{}/", server.port())));
    }

    #[test]
    fn test_drop_without_request_returns() {
        let server = OneShotServer::bind("a.pdf", Vec::new()).unwrap();
        drop(server);
    }

    #[test]
    fn test_body_reader_tracks_progress() {
        let sent = Rc::new(Cell::new(0));
        let mut reader = BodyReader {
            body: Arc::from(&b"abcdef"[..]),
            pos: 0,
            sent: Rc::clone(&sent),
        };
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf).unwrap(), 4);
        assert_eq!(sent.get(), 4);
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert_eq!(sent.get(), 6);
    }
}
