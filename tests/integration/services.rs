//! Service tests against a real PostgreSQL database

use library_catalog::{
    models::{AuthorInput, AuthorReference, BookInput},
    repository::Repository,
    services::Services,
    AppError,
};
use sqlx::PgPool;

fn services(pool: PgPool) -> Services {
    Services::new(Repository::new(pool))
}

fn author_input(name: &str) -> AuthorInput {
    AuthorInput {
        name: name.to_string(),
        bio: Some(format!("{} bio", name)),
    }
}

fn book_input(title: &str, year: i32, author: Option<AuthorReference>) -> BookInput {
    BookInput {
        title: title.to_string(),
        isbn: None,
        year_published: year,
        author,
    }
}

fn existing(id: i64) -> Option<AuthorReference> {
    Some(AuthorReference {
        id: Some(id),
        ..Default::default()
    })
}

fn new_author(id: Option<i64>, name: &str) -> Option<AuthorReference> {
    Some(AuthorReference {
        id,
        name: Some(name.to_string()),
        bio: None,
    })
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_create_author_assigns_distinct_ids(pool: PgPool) {
    let services = services(pool);

    let first = services.authors.create(author_input("Arthur Morgan")).await.unwrap();
    let second = services.authors.create(author_input("John Marston")).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.name, "Arthur Morgan");
    assert_eq!(first.bio.as_deref(), Some("Arthur Morgan bio"));
    assert_eq!(first.created_at, first.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_update_author_refreshes_updated_at_only(pool: PgPool) {
    let services = services(pool);
    let created = services.authors.create(author_input("Arthur Morgan")).await.unwrap();

    let updated = services
        .authors
        .update(created.id, AuthorInput {
            name: "Arthur M.".to_string(),
            bio: None,
        })
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Arthur M.");
    assert_eq!(updated.bio, None);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_missing_ids_are_not_found(pool: PgPool) {
    let services = services(pool);

    assert!(matches!(services.authors.get_by_id(999).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        services.authors.update(999, author_input("Nobody")).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(services.authors.delete(999).await, Err(AppError::NotFound(_))));
    assert!(matches!(services.books.get_by_id(999).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        services.books.update(999, book_input("Nothing", 2000, None)).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(services.books.delete(999).await, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_search_authors_by_name(pool: PgPool) {
    let services = services(pool);
    services.authors.create(author_input("Arthur Morgan")).await.unwrap();
    services.authors.create(author_input("Sadie Adler")).await.unwrap();
    services.authors.create(author_input("100%_Real")).await.unwrap();

    let hits = services.authors.search_by_name("MORG").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Arthur Morgan");

    assert_eq!(services.authors.search_by_name("").await.unwrap().len(), 3);
    assert_eq!(services.authors.search_by_name("%_").await.unwrap().len(), 1);
    assert!(services.authors.search_by_name("Micah").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_create_book_with_existing_author(pool: PgPool) {
    let services = services(pool.clone());
    let author = services.authors.create(author_input("Arthur Morgan")).await.unwrap();

    let mut input = book_input("RDR", 2018, existing(author.id));
    input.isbn = Some("1234567890".to_string());
    let book = services.books.create(input).await.unwrap();

    assert_eq!(book.author.id, author.id);
    assert_eq!(count(&pool, "authors").await, 1);

    let fetched = services.books.get_by_id(book.id).await.unwrap();
    assert_eq!(fetched, book);
    assert_eq!(fetched.title, "RDR");
    assert_eq!(fetched.isbn.as_deref(), Some("1234567890"));
    assert_eq!(fetched.year_published, 2018);

    let by_author = services.books.list_by_author(author.id).await.unwrap();
    assert_eq!(by_author, vec![book]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_create_book_with_new_author(pool: PgPool) {
    let services = services(pool.clone());

    for (title, id) in [("No id", None), ("Zero id", Some(0)), ("Negative id", Some(-1))] {
        let book = services
            .books
            .create(book_input(title, 1999, new_author(id, "Hosea Matthews")))
            .await
            .unwrap();
        assert!(book.author.id > 0);
        assert_eq!(book.author.name, "Hosea Matthews");
    }

    assert_eq!(count(&pool, "authors").await, 3);
    assert_eq!(count(&pool, "books").await, 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_create_book_with_unknown_author_persists_nothing(pool: PgPool) {
    let services = services(pool.clone());

    let result = services.books.create(book_input("Orphan", 2000, existing(42))).await;

    match result {
        Err(AppError::NotFound(msg)) => assert!(msg.contains("not found")),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(count(&pool, "authors").await, 0);
    assert_eq!(count(&pool, "books").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_failed_book_insert_rolls_back_new_author(pool: PgPool) {
    let services = services(pool.clone());

    let mut first = book_input("First", 2000, new_author(None, "Lenny Summers"));
    first.isbn = Some("1111111111".to_string());
    services.books.create(first).await.unwrap();

    let mut duplicate = book_input("Second", 2001, new_author(None, "Charles Smith"));
    duplicate.isbn = Some("1111111111".to_string());
    let result = services.books.create(duplicate).await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(count(&pool, "authors").await, 1);
    assert_eq!(count(&pool, "books").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_create_book_without_author_is_rejected(pool: PgPool) {
    let services = services(pool.clone());

    let result = services.books.create(book_input("Anonymous", 2000, None)).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(count(&pool, "books").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_update_book_overwrites_fields_and_keeps_author(pool: PgPool) {
    let services = services(pool);
    let author = services.authors.create(author_input("Arthur Morgan")).await.unwrap();
    let mut input = book_input("Draft", 2010, existing(author.id));
    input.isbn = Some("1234567890".to_string());
    let book = services.books.create(input).await.unwrap();

    let updated = services
        .books
        .update(book.id, book_input("Final", 2012, None))
        .await
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.isbn, None);
    assert_eq!(updated.year_published, 2012);
    assert_eq!(updated.author.id, author.id);
    assert_eq!(updated.created_at, book.created_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_update_book_replaces_author(pool: PgPool) {
    let services = services(pool.clone());
    let original = services.authors.create(author_input("Arthur Morgan")).await.unwrap();
    let other = services.authors.create(author_input("John Marston")).await.unwrap();
    let book = services
        .books
        .create(book_input("RDR", 2018, existing(original.id)))
        .await
        .unwrap();

    let moved = services
        .books
        .update(book.id, book_input("RDR", 2018, existing(other.id)))
        .await
        .unwrap();
    assert_eq!(moved.author.id, other.id);

    let inline = services
        .books
        .update(book.id, book_input("RDR", 2018, new_author(None, "Abigail Roberts")))
        .await
        .unwrap();
    assert_eq!(inline.author.name, "Abigail Roberts");
    assert_eq!(count(&pool, "authors").await, 3);

    let unknown = services
        .books
        .update(book.id, book_input("Changed", 2019, existing(999)))
        .await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
    assert_eq!(services.books.get_by_id(book.id).await.unwrap().title, "RDR");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_delete_author_cascades_to_books(pool: PgPool) {
    let services = services(pool.clone());
    let author = services.authors.create(author_input("Dutch van der Linde")).await.unwrap();
    let keeper = services.authors.create(author_input("Hosea Matthews")).await.unwrap();
    services.books.create(book_input("Plan A", 1899, existing(author.id))).await.unwrap();
    services.books.create(book_input("Plan B", 1899, existing(author.id))).await.unwrap();
    services.books.create(book_input("Con", 1899, existing(keeper.id))).await.unwrap();

    services.authors.delete(author.id).await.unwrap();

    assert!(services.books.list_by_author(author.id).await.unwrap().is_empty());
    assert_eq!(count(&pool, "books").await, 1);
    assert!(matches!(services.authors.get_by_id(author.id).await, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_delete_book_keeps_author(pool: PgPool) {
    let services = services(pool);
    let author = services.authors.create(author_input("Sadie Adler")).await.unwrap();
    let book = services.books.create(book_input("Bounty", 1900, existing(author.id))).await.unwrap();

    services.books.delete(book.id).await.unwrap();

    assert!(matches!(services.books.get_by_id(book.id).await, Err(AppError::NotFound(_))));
    assert_eq!(services.authors.get_by_id(author.id).await.unwrap().name, "Sadie Adler");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_book_searches(pool: PgPool) {
    let services = services(pool);
    let author = services.authors.create(author_input("Arthur Morgan")).await.unwrap();
    for (title, year) in [("Red Dead", 2010), ("Red Dead Redemption II", 2018), ("Gunslinger", 1995)] {
        services.books.create(book_input(title, year, existing(author.id))).await.unwrap();
    }

    assert_eq!(services.books.search_by_title("red dead").await.unwrap().len(), 2);
    assert_eq!(services.books.search_by_title("").await.unwrap().len(), 3);
    assert!(services.books.search_by_title("Valentine").await.unwrap().is_empty());

    let recent = services.books.list_published_since(2010).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|b| b.year_published >= 2010));
    assert!(services.books.list_published_since(2027).await.unwrap().is_empty());

    let all = services.books.list().await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|b| b.author.id == author.id));
    assert!(services.books.list_by_author(author.id + 100).await.unwrap().is_empty());
}
