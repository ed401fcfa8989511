//! In-memory transport and confirmation doubles.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::{self, Cursor, Read};

use crate::confirm::ConfirmationGate;
use crate::error::{ConfirmError, FetchError};
use crate::fetch::ArtifactTransport;

#[derive(Debug, Clone)]
enum Canned {
    Body(Vec<u8>),
    Status(u16),
    Unreachable,
    BrokenBody,
}

/// Transport answering from a table of URLs and recording every request.
///
/// Unknown URLs answer `404`.
#[derive(Debug, Default)]
pub(crate) struct MemoryTransport {
    responses: HashMap<String, Canned>,
    requests: RefCell<Vec<String>>,
}

impl MemoryTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn serve(mut self, url: &str, body: &[u8]) -> Self {
        self.responses
            .insert(url.to_owned(), Canned::Body(body.to_vec()));
        self
    }

    pub(crate) fn status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_owned(), Canned::Status(status));
        self
    }

    pub(crate) fn unreachable(mut self, url: &str) -> Self {
        self.responses.insert(url.to_owned(), Canned::Unreachable);
        self
    }

    pub(crate) fn broken_body(mut self, url: &str) -> Self {
        self.responses.insert(url.to_owned(), Canned::BrokenBody);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ArtifactTransport for MemoryTransport {
    fn open(&self, url: &str) -> Result<Box<dyn Read + '_>, FetchError> {
        self.requests.borrow_mut().push(url.to_owned());
        match self.responses.get(url).cloned().unwrap_or(Canned::Status(404)) {
            Canned::Body(body) => Ok(Box::new(Cursor::new(body))),
            Canned::Status(status) => Err(FetchError::Status {
                url: url.to_owned(),
                status,
            }),
            Canned::Unreachable => Err(FetchError::Transport {
                url: url.to_owned(),
                message: "connection refused".to_owned(),
            }),
            Canned::BrokenBody => Ok(Box::new(BrokenReader)),
        }
    }
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "body truncated"))
    }
}

/// Gate replaying scripted answers and recording prompts.
#[derive(Debug, Default)]
pub(crate) struct ScriptedGate {
    answers: VecDeque<Result<bool, ConfirmError>>,
    prompts: Vec<String>,
}

impl ScriptedGate {
    pub(crate) fn answering(answer: bool) -> Self {
        Self {
            answers: VecDeque::from([Ok(answer)]),
            prompts: Vec::new(),
        }
    }

    pub(crate) fn closed() -> Self {
        Self {
            answers: VecDeque::from([Err(ConfirmError::InputClosed)]),
            prompts: Vec::new(),
        }
    }

    pub(crate) fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl ConfirmationGate for ScriptedGate {
    fn confirm(&mut self, prompt: &str) -> Result<bool, ConfirmError> {
        self.prompts.push(prompt.to_owned());
        self.answers
            .pop_front()
            .unwrap_or(Err(ConfirmError::InputClosed))
    }
}
