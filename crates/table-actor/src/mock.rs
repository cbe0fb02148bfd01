//! # Mock Tables
//!
//! Utilities for testing table callers without spawning a real table.
//!
//! Use [`MockTable`] to script the answers a table gives, in order, and
//! [`MockTable::verify`] to check that every scripted statement was issued.
//! For finer control, [`create_mock_table`] hands back the raw request
//! receiver together with helpers such as [`expect_upsert`].

use crate::client::TableClient;
use crate::error::TableError;
use crate::message::TableRequest;
use crate::row::TableRow;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Scripted answer for a write: a fixed result, or the rows that were sent.
enum WriteReply<R> {
    Fixed(Result<Vec<R>, TableError>),
    Echo,
}

/// A statement the mock expects next, with the answer it gives.
enum Expectation<R: TableRow> {
    Select {
        response: Result<Vec<R>, TableError>,
    },
    Insert {
        reply: WriteReply<R>,
    },
    Upsert {
        reply: WriteReply<R>,
    },
    Delete {
        response: Result<usize, TableError>,
    },
}

type Expectations<R> = Arc<Mutex<VecDeque<Expectation<R>>>>;

/// A mock table with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mut stock = MockTable::<StockRow>::new();
/// stock.expect_upsert().return_err(TableError::Unavailable("timeout".into()));
///
/// let client = stock.client();
/// // hand `client` to the code under test...
/// stock.verify();
/// ```
pub struct MockTable<R: TableRow> {
    client: TableClient<R>,
    expectations: Expectations<R>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<R: TableRow> MockTable<R> {
    /// Creates a new mock table with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<TableRequest<R>>(100);
        let (events, _) = broadcast::channel(16);
        let expectations: Expectations<R> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (TableRequest::Select { respond_to, .. }, Some(Expectation::Select { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (TableRequest::Insert { rows, respond_to }, Some(Expectation::Insert { reply })) => {
                        let _ = respond_to.send(reply.resolve(rows));
                    }
                    (TableRequest::Upsert { rows, respond_to }, Some(Expectation::Upsert { reply })) => {
                        let _ = respond_to.send(reply.resolve(rows));
                    }
                    (TableRequest::Delete { respond_to, .. }, Some(Expectation::Delete { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request on mock {}: {:?}", R::TABLE, request);
                    }
                }
            }
        });

        Self {
            client: TableClient::new(sender, events),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> TableClient<R> {
        self.client.clone()
    }

    /// Expects a `select`.
    pub fn expect_select(&mut self) -> SelectExpectationBuilder<R> {
        SelectExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects an `insert`.
    pub fn expect_insert(&mut self) -> WriteExpectationBuilder<R> {
        WriteExpectationBuilder {
            expectations: self.expectations.clone(),
            upsert: false,
        }
    }

    /// Expects an `upsert`.
    pub fn expect_upsert(&mut self) -> WriteExpectationBuilder<R> {
        WriteExpectationBuilder {
            expectations: self.expectations.clone(),
            upsert: true,
        }
    }

    /// Expects a `delete`.
    pub fn expect_delete(&mut self) -> DeleteExpectationBuilder<R> {
        DeleteExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Number of scripted statements not issued yet.
    pub fn remaining(&self) -> usize {
        self.expectations.lock().unwrap().len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.remaining();
        if remaining > 0 {
            panic!("Not all expectations were met on {}. {} remaining", R::TABLE, remaining);
        }
    }
}

impl<R: TableRow> Default for MockTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> WriteReply<R> {
    fn resolve(self, sent: Vec<R>) -> Result<Vec<R>, TableError> {
        match self {
            WriteReply::Fixed(response) => response,
            WriteReply::Echo => Ok(sent),
        }
    }
}

/// Builder for `select` expectations.
pub struct SelectExpectationBuilder<R: TableRow> {
    expectations: Expectations<R>,
}

impl<R: TableRow> SelectExpectationBuilder<R> {
    /// Answers with these rows.
    pub fn return_ok(self, rows: Vec<R>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Select { response: Ok(rows) });
    }

    /// Answers with an error.
    pub fn return_err(self, error: TableError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Select {
                response: Err(error),
            });
    }
}

/// Builder for `insert` and `upsert` expectations.
pub struct WriteExpectationBuilder<R: TableRow> {
    expectations: Expectations<R>,
    upsert: bool,
}

impl<R: TableRow> WriteExpectationBuilder<R> {
    fn push(self, reply: WriteReply<R>) {
        let expectation = if self.upsert {
            Expectation::Upsert { reply }
        } else {
            Expectation::Insert { reply }
        };
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Answers with these rows.
    pub fn return_ok(self, rows: Vec<R>) {
        self.push(WriteReply::Fixed(Ok(rows)));
    }

    /// Answers with the rows that were sent, unchanged.
    pub fn echo(self) {
        self.push(WriteReply::Echo);
    }

    /// Answers with an error.
    pub fn return_err(self, error: TableError) {
        self.push(WriteReply::Fixed(Err(error)));
    }
}

/// Builder for `delete` expectations.
pub struct DeleteExpectationBuilder<R: TableRow> {
    expectations: Expectations<R>,
}

impl<R: TableRow> DeleteExpectationBuilder<R> {
    /// Answers with a removed-row count.
    pub fn return_ok(self, count: usize) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Delete { response: Ok(count) });
    }

    /// Answers with an error.
    pub fn return_err(self, error: TableError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Delete {
                response: Err(error),
            });
    }
}

// =============================================================================
// RAW RECEIVER HELPERS
// =============================================================================

/// Creates a table client and the receiver its statements arrive on.
///
/// # Testing Strategy
/// The test plays the table: it reads each statement off `receiver`, asserts
/// on it, and answers through the oneshot sender. That makes delays and
/// interleavings deterministic.
pub fn create_mock_table<R: TableRow>(
    buffer_size: usize,
) -> (TableClient<R>, mpsc::Receiver<TableRequest<R>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (events, _) = broadcast::channel(16);
    (TableClient::new(sender, events), receiver)
}

/// Awaits the next statement and returns it if it is a Select.
pub async fn expect_select<R: TableRow>(
    receiver: &mut mpsc::Receiver<TableRequest<R>>,
) -> Option<oneshot::Sender<Result<Vec<R>, TableError>>> {
    match receiver.recv().await {
        Some(TableRequest::Select { respond_to, .. }) => Some(respond_to),
        _ => None,
    }
}

/// Awaits the next statement and returns it if it is an Upsert.
pub async fn expect_upsert<R: TableRow>(
    receiver: &mut mpsc::Receiver<TableRequest<R>>,
) -> Option<(Vec<R>, oneshot::Sender<Result<Vec<R>, TableError>>)> {
    match receiver.recv().await {
        Some(TableRequest::Upsert { rows, respond_to }) => Some((rows, respond_to)),
        _ => None,
    }
}

/// Awaits the next statement and returns it if it is an Insert.
pub async fn expect_insert<R: TableRow>(
    receiver: &mut mpsc::Receiver<TableRequest<R>>,
) -> Option<(Vec<R>, oneshot::Sender<Result<Vec<R>, TableError>>)> {
    match receiver.recv().await {
        Some(TableRequest::Insert { rows, respond_to }) => Some((rows, respond_to)),
        _ => None,
    }
}

/// Awaits the next statement and returns it if it is a Delete.
pub async fn expect_delete<R: TableRow>(
    receiver: &mut mpsc::Receiver<TableRequest<R>>,
) -> Option<oneshot::Sender<Result<usize, TableError>>> {
    match receiver.recv().await {
        Some(TableRequest::Delete { respond_to, .. }) => Some(respond_to),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Tag {
        id: u32,
        label: String,
    }

    impl TableRow for Tag {
        const TABLE: &'static str = "tags";
        type Key = u32;
        type Context = ();

        fn key(&self) -> Option<u32> {
            Some(self.id)
        }
    }

    #[tokio::test]
    async fn test_raw_mock_table() {
        let (client, mut receiver) = create_mock_table::<Tag>(10);

        let task = tokio::spawn(async move {
            client
                .upsert(vec![Tag {
                    id: 7,
                    label: "blue".into(),
                }])
                .await
        });

        let (rows, responder) = expect_upsert(&mut receiver)
            .await
            .expect("Expected Upsert request");
        assert_eq!(rows[0].label, "blue");
        responder.send(Ok(rows)).unwrap();

        let stored = task.await.unwrap().unwrap();
        assert_eq!(stored[0].id, 7);
    }

    #[tokio::test]
    async fn test_mock_table_with_expectations() {
        let mut mock = MockTable::<Tag>::new();
        mock.expect_upsert().echo();
        mock.expect_select().return_err(TableError::Unavailable("offline".into()));

        let client = mock.client();
        let written = client
            .upsert(vec![Tag {
                id: 1,
                label: "red".into(),
            }])
            .await
            .unwrap();
        assert_eq!(written.len(), 1);

        let err = client.select_all().await.unwrap_err();
        assert!(matches!(err, TableError::Unavailable(_)));

        mock.verify();
    }
}
