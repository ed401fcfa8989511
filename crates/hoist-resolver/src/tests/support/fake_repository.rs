//! Local HTTP repository for exercising the real transport.
//!
//! Serves canned responses on an ephemeral port until dropped and records
//! the path of every request it receives.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

/// Canned answer for one request path.
#[derive(Clone, Debug)]
pub(crate) struct Route {
    status: u16,
    body: Vec<u8>,
    headers: Vec<(String, String)>,
    byte_gap: Option<Duration>,
}

impl Route {
    pub(crate) fn ok(body: &[u8]) -> Self {
        Self::status(200).with_body(body)
    }

    pub(crate) fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            headers: Vec::new(),
            byte_gap: None,
        }
    }

    pub(crate) fn with_body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    pub(crate) fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Sends the body one byte at a time, pausing `gap` before each byte.
    pub(crate) fn trickled(mut self, gap: Duration) -> Self {
        self.byte_gap = Some(gap);
        self
    }

    fn not_found() -> Self {
        Self::status(404).with_body(b"not found")
    }
}

type Routes = HashMap<String, Route>;

pub(crate) struct FakeRepository {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeRepository {
    /// Starts serving `routes`, keyed by request path (for example
    /// `/maven2/g/a/1.0/a-1.0.jar`). Unknown paths answer `404`.
    pub(crate) fn spawn(table: Vec<(&str, Route)>) -> Result<Self> {
        let routes: Routes = table
            .into_iter()
            .map(|(path, route)| (path.to_owned(), route))
            .collect();
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake repository")?;
        listener
            .set_nonblocking(true)
            .context("fake repository nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let requests_clone = Arc::clone(&requests);
        let stop_clone = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            serve(&listener, &routes, &requests_clone, &stop_clone);
        });
        Ok(Self {
            port,
            requests,
            stop,
            handle: Some(handle),
        })
    }

    /// Base URL with the given path prefix, e.g. `base_url("/maven2/")`.
    pub(crate) fn base_url(&self, prefix: &str) -> String {
        format!("http://127.0.0.1:{}{prefix}", self.port)
    }

    pub(crate) fn requests(&self) -> Result<Vec<String>> {
        let guard = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(guard.clone())
    }
}

impl Drop for FakeRepository {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(
    listener: &TcpListener,
    routes: &Routes,
    requests: &Mutex<Vec<String>>,
    stop: &AtomicBool,
) {
    while !stop.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, _)) => {
                let _ = answer(stream, routes, requests);
            }
            Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(5));
            }
            Err(_) => return,
        }
    }
}

fn answer(stream: TcpStream, routes: &Routes, requests: &Mutex<Vec<String>>) -> Result<()> {
    stream.set_nonblocking(false).context("blocking stream")?;
    let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .context("read request line")?;
    loop {
        let mut header = String::new();
        let read = reader.read_line(&mut header).context("read header")?;
        if read == 0 || header.trim().is_empty() {
            break;
        }
    }

    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_owned();
    requests
        .lock()
        .map_err(|error| anyhow!("lock requests: {error}"))?
        .push(path.clone());

    let route = routes.get(&path).cloned().unwrap_or_else(Route::not_found);
    let mut writer = stream;
    write!(
        writer,
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        reason(route.status),
        route.body.len()
    )
    .context("write status")?;
    for (name, value) in &route.headers {
        write!(writer, "{name}: {value}\r\n").context("write header")?;
    }
    writer.write_all(b"\r\n").context("end headers")?;
    writer.flush().context("flush headers")?;

    match route.byte_gap {
        Some(gap) => {
            for byte in route.body.chunks(1) {
                thread::sleep(gap);
                writer.write_all(byte).context("write body byte")?;
                writer.flush().context("flush body byte")?;
            }
        }
        None => writer.write_all(&route.body).context("write body")?,
    }
    writer.flush().context("flush response")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
