use microblog_core::db::open_db_in_memory;
use microblog_core::{
    AdminService, CommentDraft, CommentRepository, PostDraft, PostRepository,
    SqliteCommentRepository, SqlitePostRepository, SqliteUserRepository, UserDraft, UserRepository,
};
use rusqlite::Connection;

fn admin_service(
    conn: &Connection,
) -> AdminService<SqliteUserRepository<'_>, SqlitePostRepository<'_>, SqliteCommentRepository<'_>>
{
    AdminService::new(
        SqliteUserRepository::try_new(conn).unwrap(),
        SqlitePostRepository::try_new(conn).unwrap(),
        SqliteCommentRepository::try_new(conn).unwrap(),
    )
}

fn seed(conn: &Connection) {
    let users = SqliteUserRepository::try_new(conn).unwrap();
    let posts = SqlitePostRepository::try_new(conn).unwrap();
    let comments = SqliteCommentRepository::try_new(conn).unwrap();

    let user = users
        .create_user(&UserDraft {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        })
        .unwrap();

    for title in ["Hello", "Again"] {
        let post = posts
            .create_post(&PostDraft {
                user_id: user.id.as_str().to_string(),
                title: title.to_string(),
                text: "body".to_string(),
            })
            .unwrap();

        comments
            .create_comment(&CommentDraft {
                post_id: post.id.as_str().to_string(),
                user_id: user.id.as_str().to_string(),
                text: "Nice!".to_string(),
            })
            .unwrap();
    }
}

#[test]
fn count_all_reports_per_entity_counts() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let admin = admin_service(&conn);

    let report = admin.count_all();
    assert!(report.all_ok());

    let counts = report.counts().unwrap();
    assert_eq!(counts.users, 1);
    assert_eq!(counts.posts, 2);
    assert_eq!(counts.comments, 2);
}

#[test]
fn wipe_all_removes_everything_bypassing_the_guard() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let admin = admin_service(&conn);

    // Every parent has dependents; the wipe must still succeed.
    let report = admin.wipe_all();
    assert!(report.all_ok());
    assert_eq!(report.users.unwrap(), 1);
    assert_eq!(report.posts.unwrap(), 2);
    assert_eq!(report.comments.unwrap(), 2);

    let after = admin.count_all().counts().unwrap();
    assert_eq!(after.users, 0);
    assert_eq!(after.posts, 0);
    assert_eq!(after.comments, 0);
}

#[test]
fn wipe_on_empty_store_reports_zeroes() {
    let conn = open_db_in_memory().unwrap();
    let admin = admin_service(&conn);

    let report = admin.wipe_all();
    assert!(report.all_ok());
    assert_eq!(report.users.unwrap(), 0);
    assert_eq!(report.posts.unwrap(), 0);
    assert_eq!(report.comments.unwrap(), 0);
}
