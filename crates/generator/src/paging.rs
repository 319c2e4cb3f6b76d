//! Continuation-token page iteration
//!
//! Executable form of the page retrieval contract that paged convenience
//! operations expand to:
//!
//! - the first page is requested with no continuation token
//! - each later page uses the token returned by the previous page
//! - the sequence ends on the first page that returns no token
//! - exactly one page is fetched per advance, never ahead of time

use clientgen_common::Result;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

/// Status and headers of the response a page was read from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
}

impl PageResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Header lookup, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// One undecoded page as returned by the service
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub items: Vec<Value>,
    pub continuation: Option<String>,
    pub response: PageResponse,
}

/// A decoded page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub elements: Vec<T>,
    /// Token this page was requested with
    pub request_token: Option<String>,
    /// Token of the next page, if any
    pub continuation: Option<String>,
    pub response: PageResponse,
}

/// Fetches exactly one page per call
#[cfg_attr(test, mockall::automock)]
pub trait PageSource {
    fn fetch_page(&mut self, continuation: Option<String>, page_size: Option<usize>)
        -> Result<RawPage>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Lazy, restartable sequence over a page source
pub struct PagedSequence<S, F> {
    source: S,
    decode: F,
    page_size: Option<usize>,
}

impl<S, F, T> PagedSequence<S, F>
where
    S: PageSource,
    F: Fn(Value) -> Result<T>,
{
    pub fn new(source: S, decode: F) -> Self {
        Self {
            source,
            decode,
            page_size: None,
        }
    }

    /// Page-size hint passed with every request
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Iterate page by page from the first page
    pub fn by_page(&mut self) -> Pages<'_, S, F> {
        Pages {
            sequence: self,
            cursor: Cursor::Start,
        }
    }

    /// Iterate page by page, resuming at a continuation token
    pub fn by_page_from(&mut self, continuation: String) -> Pages<'_, S, F> {
        Pages {
            sequence: self,
            cursor: Cursor::Next(continuation),
        }
    }

    /// Iterate decoded elements from the first page
    pub fn iter(&mut self) -> Items<'_, S, F, T> {
        Items {
            pages: self.by_page(),
            buffer: VecDeque::new(),
        }
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

/// Page iterator; each call to `next` fetches at most one page
pub struct Pages<'a, S, F> {
    sequence: &'a mut PagedSequence<S, F>,
    cursor: Cursor,
}

impl<'a, S, F, T> Iterator for Pages<'a, S, F>
where
    S: PageSource,
    F: Fn(Value) -> Result<T>,
{
    type Item = Result<Page<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let request_token = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return None,
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
        };

        let sequence = &mut *self.sequence;
        let raw = match sequence
            .source
            .fetch_page(request_token.clone(), sequence.page_size)
        {
            Ok(raw) => raw,
            Err(e) => return Some(Err(e)),
        };

        debug!(
            status = raw.response.status,
            items = raw.items.len(),
            has_next = raw.continuation.is_some(),
            "fetched page"
        );

        let elements = match raw
            .items
            .into_iter()
            .map(&sequence.decode)
            .collect::<Result<Vec<T>>>()
        {
            Ok(elements) => elements,
            Err(e) => return Some(Err(e)),
        };

        if let Some(token) = &raw.continuation {
            self.cursor = Cursor::Next(token.clone());
        }

        Some(Ok(Page {
            elements,
            request_token,
            continuation: raw.continuation,
            response: raw.response,
        }))
    }
}

/// Element iterator flattening pages in page order, then element order
pub struct Items<'a, S, F, T> {
    pages: Pages<'a, S, F>,
    buffer: VecDeque<T>,
}

impl<'a, S, F, T> Iterator for Items<'a, S, F, T>
where
    S: PageSource,
    F: Fn(Value) -> Result<T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.buffer.pop_front() {
                return Some(Ok(element));
            }
            match self.pages.next()? {
                Ok(page) => self.buffer.extend(page.elements),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
