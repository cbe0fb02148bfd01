use async_trait::async_trait;
use table_actor::{TableActor, TableClient, TableError, TableRow, WriteKind};

// --- Test Rows ---

#[derive(Clone, Debug, PartialEq)]
struct Shelf {
    id: Option<u32>,
    code: String,
}

#[derive(Clone, Debug, PartialEq)]
struct Book {
    shelf_id: u32,
    isbn: String,
    copies: u32,
}

#[async_trait]
impl TableRow for Shelf {
    const TABLE: &'static str = "shelves";
    type Key = u32;
    type Context = TableClient<Book>;

    fn key(&self) -> Option<u32> {
        self.id
    }

    fn assign_key(&mut self, seq: u32) -> Result<u32, TableError> {
        self.id = Some(seq);
        Ok(seq)
    }

    fn key_seq(key: &u32) -> Option<u32> {
        Some(*key)
    }

    fn unique_value(&self) -> Option<String> {
        Some(self.code.clone())
    }

    async fn on_delete(&self, books: &TableClient<Book>) -> Result<(), TableError> {
        let id = self.id;
        let referencing = books
            .select_where(move |book| Some(book.shelf_id) == id)
            .await?;
        if referencing.is_empty() {
            Ok(())
        } else {
            Err(TableError::ForeignKeyViolation {
                table: Self::TABLE,
                dependent: Book::TABLE,
                key: format!("{:?}", id),
            })
        }
    }
}

#[async_trait]
impl TableRow for Book {
    const TABLE: &'static str = "books";
    type Key = String;
    type Context = ();

    fn key(&self) -> Option<String> {
        Some(format!("{}:{}", self.shelf_id, self.isbn))
    }

    async fn on_write(&mut self, _previous: Option<&Self>, _ctx: &()) -> Result<(), TableError> {
        if self.isbn.is_empty() {
            return Err(TableError::Rejected {
                table: Self::TABLE,
                reason: "isbn is empty".into(),
            });
        }
        Ok(())
    }
}

fn start() -> (TableClient<Shelf>, TableClient<Book>) {
    let (shelf_actor, shelves) = TableActor::<Shelf>::new(10);
    let (book_actor, books) = TableActor::<Book>::new(10);
    tokio::spawn(book_actor.run(()));
    tokio::spawn(shelf_actor.run(books.clone()));
    (shelves, books)
}

fn shelf(code: &str) -> Shelf {
    Shelf {
        id: None,
        code: code.to_string(),
    }
}

#[tokio::test]
async fn test_insert_assigns_keys_in_sequence() {
    let (shelves, _books) = start();

    let stored = shelves.insert(vec![shelf("A"), shelf("B")]).await.unwrap();
    assert_eq!(stored[0].id, Some(1));
    assert_eq!(stored[1].id, Some(2));

    let all = shelves.select_all().await.unwrap();
    let codes: Vec<_> = all.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["A", "B"]);
}

#[tokio::test]
async fn test_explicit_key_advances_sequence() {
    let (shelves, _books) = start();

    let placed = Shelf {
        id: Some(7),
        code: "G".into(),
    };
    shelves.upsert(vec![placed.clone()]).await.unwrap();
    let stored = shelves.upsert(vec![shelf("H")]).await.unwrap();
    assert_eq!(stored[0].id, Some(8));

    let all = shelves.select_all().await.unwrap();
    assert_eq!(all, vec![placed, stored[0].clone()]);
}

#[tokio::test]
async fn test_unique_column_is_enforced() {
    let (shelves, _books) = start();
    shelves.insert(vec![shelf("A")]).await.unwrap();

    let err = shelves.insert(vec![shelf("A")]).await.unwrap_err();
    assert!(matches!(err, TableError::Conflict { table: "shelves", .. }));

    // Upserting the same row under its own key is not a clash.
    let mut existing = shelves.select_all().await.unwrap().remove(0);
    existing.code = "A".into();
    shelves.upsert(vec![existing]).await.unwrap();
    assert_eq!(shelves.select_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_upsert_replaces_by_key_and_keeps_position() {
    let (_shelves, books) = start();
    let book = |isbn: &str, copies| Book {
        shelf_id: 1,
        isbn: isbn.to_string(),
        copies,
    };

    books.upsert(vec![book("111", 1), book("222", 1)]).await.unwrap();
    books.upsert(vec![book("111", 9)]).await.unwrap();

    let all = books.select_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].isbn, "111");
    assert_eq!(all[0].copies, 9);
}

#[tokio::test]
async fn test_rejected_row_aborts_whole_statement() {
    let (_shelves, books) = start();
    let rows = vec![
        Book {
            shelf_id: 1,
            isbn: "111".into(),
            copies: 1,
        },
        Book {
            shelf_id: 1,
            isbn: String::new(),
            copies: 1,
        },
    ];

    let err = books.upsert(rows).await.unwrap_err();
    assert!(matches!(err, TableError::Rejected { .. }));
    assert!(books.select_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_restricted_while_children_exist() {
    let (shelves, books) = start();
    let stored = shelves.insert(vec![shelf("A")]).await.unwrap();
    let shelf_id = stored[0].id.unwrap();
    books
        .upsert(vec![Book {
            shelf_id,
            isbn: "111".into(),
            copies: 2,
        }])
        .await
        .unwrap();

    let err = shelves
        .delete_where(move |s| s.id == Some(shelf_id))
        .await
        .unwrap_err();
    assert!(matches!(err, TableError::ForeignKeyViolation { .. }));
    assert_eq!(shelves.select_all().await.unwrap().len(), 1);

    // Children first, then the parent.
    let removed = books.delete_where(move |b| b.shelf_id == shelf_id).await.unwrap();
    assert_eq!(removed, 1);
    let removed = shelves.delete_where(move |s| s.id == Some(shelf_id)).await.unwrap();
    assert_eq!(removed, 1);
}

#[tokio::test]
async fn test_writes_publish_change_events() {
    let (shelves, _books) = start();
    let mut feed = shelves.subscribe();

    shelves.insert(vec![shelf("A")]).await.unwrap();
    let event = feed.recv().await.unwrap();
    assert_eq!(event.table, "shelves");
    assert_eq!(event.kind, WriteKind::Insert);
    assert_eq!(event.rows, 1);

    shelves.delete_where(|_| true).await.unwrap();
    let event = feed.recv().await.unwrap();
    assert_eq!(event.kind, WriteKind::Delete);
}

#[tokio::test]
async fn test_closed_table_reports_actor_closed() {
    let (actor, client) = TableActor::<Book>::new(1);
    drop(actor);

    let err = client.select_all().await.unwrap_err();
    assert!(matches!(err, TableError::ActorClosed));
}
