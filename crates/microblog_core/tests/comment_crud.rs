use microblog_core::db::open_db_in_memory;
use microblog_core::{
    CommentService, Post, PostDraft, PostRepository, RawFields, ServiceError,
    SqliteCommentRepository, SqlitePostRepository, SqliteUserRepository, User, UserDraft,
    UserRepository,
};
use rusqlite::Connection;

const ABSENT_ID: &str = "64fa3c2b9d1e8a7b6c5d4e3f";

fn comment_service(
    conn: &Connection,
) -> CommentService<SqliteCommentRepository<'_>, SqlitePostRepository<'_>, SqliteUserRepository<'_>>
{
    CommentService::new(
        SqliteCommentRepository::try_new(conn).unwrap(),
        SqlitePostRepository::try_new(conn).unwrap(),
        SqliteUserRepository::try_new(conn).unwrap(),
    )
}

fn fields(pairs: &[(&str, &str)]) -> RawFields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn seed_user(conn: &Connection, name: &str, email: &str) -> User {
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .create_user(&UserDraft {
            name: name.to_string(),
            email: email.to_string(),
        })
        .unwrap()
}

fn seed_post(conn: &Connection, author: &User, title: &str) -> Post {
    SqlitePostRepository::try_new(conn)
        .unwrap()
        .create_post(&PostDraft {
            user_id: author.id.as_str().to_string(),
            title: title.to_string(),
            text: "body".to_string(),
        })
        .unwrap()
}

#[test]
fn create_and_detail_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    let post = seed_post(&conn, &author, "Hello");
    let service = comment_service(&conn);

    let created = service
        .create(&fields(&[
            ("postId", post.id.as_str()),
            ("userId", author.id.as_str()),
            ("text", "Nice!"),
        ]))
        .unwrap()
        .applied()
        .unwrap();

    assert_eq!(created.post_id, post.id);
    assert_eq!(created.user_id, author.id);
    assert_eq!(created.text, "Nice!");

    let stored = service.detail(created.id.as_str()).unwrap();
    assert_eq!(stored, created);
}

#[test]
fn create_rejects_short_text() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    let post = seed_post(&conn, &author, "Hello");
    let service = comment_service(&conn);

    let (attempted, errors) = service
        .create(&fields(&[
            ("postId", post.id.as_str()),
            ("userId", author.id.as_str()),
            ("text", "Hi"),
        ]))
        .unwrap()
        .rejected()
        .unwrap();

    assert_eq!(attempted.text, "Hi");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "text");
    assert_eq!(errors[0].message, "text must be at least 3 characters long.");
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn create_requires_existing_post_and_user() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    let service = comment_service(&conn);

    let (_, errors) = service
        .create(&fields(&[
            ("postId", ABSENT_ID),
            ("userId", author.id.as_str()),
            ("text", "Nice!"),
        ]))
        .unwrap()
        .rejected()
        .unwrap();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "postId");
    assert_eq!(
        errors[0].message,
        "postId does not reference an existing post."
    );
}

#[test]
fn create_escapes_markup_in_text() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    let post = seed_post(&conn, &author, "Hello");
    let service = comment_service(&conn);

    let created = service
        .create(&fields(&[
            ("postId", post.id.as_str()),
            ("userId", author.id.as_str()),
            ("text", " <b>loud</b> "),
        ]))
        .unwrap()
        .applied()
        .unwrap();

    assert_eq!(created.text, "&lt;b&gt;loud&lt;&#x2F;b&gt;");
}

#[test]
fn update_changes_text_and_keeps_references() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    let other = seed_user(&conn, "Grace Hopper", "grace@example.com");
    let post = seed_post(&conn, &author, "Hello");
    let other_post = seed_post(&conn, &other, "Elsewhere");
    let service = comment_service(&conn);

    let created = service
        .create(&fields(&[
            ("postId", post.id.as_str()),
            ("userId", author.id.as_str()),
            ("text", "Nice!"),
        ]))
        .unwrap()
        .applied()
        .unwrap();

    // The patch tries to move the comment; references must not change.
    let updated = service
        .update(
            created.id.as_str(),
            &fields(&[
                ("postId", other_post.id.as_str()),
                ("userId", other.id.as_str()),
                ("text", "Edited."),
            ]),
        )
        .unwrap()
        .applied()
        .unwrap();

    assert_eq!(updated.post_id, post.id);
    assert_eq!(updated.user_id, author.id);
    assert_eq!(updated.text, "Edited.");
}

#[test]
fn update_with_empty_text_keeps_stored_value() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    let post = seed_post(&conn, &author, "Hello");
    let service = comment_service(&conn);

    let created = service
        .create(&fields(&[
            ("postId", post.id.as_str()),
            ("userId", author.id.as_str()),
            ("text", "Nice!"),
        ]))
        .unwrap()
        .applied()
        .unwrap();

    let updated = service
        .update(created.id.as_str(), &fields(&[("text", "  ")]))
        .unwrap()
        .applied()
        .unwrap();

    assert_eq!(updated.text, "Nice!");
}

#[test]
fn delete_always_succeeds_once_found() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    let post = seed_post(&conn, &author, "Hello");
    let service = comment_service(&conn);

    let created = service
        .create(&fields(&[
            ("postId", post.id.as_str()),
            ("userId", author.id.as_str()),
            ("text", "Nice!"),
        ]))
        .unwrap()
        .applied()
        .unwrap();

    let removed = service
        .delete(created.id.as_str())
        .unwrap()
        .removed()
        .unwrap();
    assert_eq!(removed, created);

    assert!(matches!(
        service.detail(created.id.as_str()).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
    assert!(matches!(
        service.delete(created.id.as_str()).unwrap_err(),
        ServiceError::NotFound { .. }
    ));
}

#[test]
fn list_orders_comments_by_text() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "Ada Lovelace", "ada@example.com");
    let post = seed_post(&conn, &author, "Hello");
    let service = comment_service(&conn);

    for text in ["beta thoughts", "alpha thoughts", "gamma thoughts"] {
        service
            .create(&fields(&[
                ("postId", post.id.as_str()),
                ("userId", author.id.as_str()),
                ("text", text),
            ]))
            .unwrap()
            .applied()
            .unwrap();
    }

    let texts: Vec<String> = service
        .list()
        .unwrap()
        .into_iter()
        .map(|comment| comment.text)
        .collect();
    assert_eq!(texts, ["alpha thoughts", "beta thoughts", "gamma thoughts"]);
}
