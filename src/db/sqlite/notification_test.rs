//! Tests for SqliteNotificationRepository.

use tokio::time::Instant;

use crate::db::{
    ApplicantRepository, Database, EmployerRepository, ErrorKind, Id, NewApplicant, NewEmployer,
    NewNotification, NotificationRepository, NotificationType, RequestContext, SqliteDatabase,
    UserRole,
};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

struct Fixture {
    applicant_id: Id,
    employer_id: Id,
    vacancy_id: Id,
    resume_id: Id,
}

async fn seed(db: &SqliteDatabase) -> Fixture {
    let ctx = RequestContext::generate();

    let applicant = db
        .applicants()
        .create(
            &ctx,
            &NewApplicant {
                email: "ivan@example.com".to_string(),
                password_hash: b"hash".to_vec(),
                password_salt: b"salt".to_vec(),
                first_name: "Ivan".to_string(),
                last_name: "Petrov".to_string(),
            },
        )
        .await
        .expect("Create applicant should succeed");

    let employer = db
        .employers()
        .create(
            &ctx,
            &NewEmployer {
                email: "hr@acme.com".to_string(),
                password_hash: b"hash".to_vec(),
                password_salt: b"salt".to_vec(),
                company_name: "Acme".to_string(),
                legal_address: String::new(),
            },
        )
        .await
        .expect("Create employer should succeed");

    let vacancy_id: Id = sqlx::query_scalar(
        "INSERT INTO vacancy (employer_id, title) VALUES (?, 'Rust developer') RETURNING id",
    )
    .bind(employer.id)
    .fetch_one(db.pool())
    .await
    .expect("Insert vacancy should succeed");

    let resume_id: Id = sqlx::query_scalar(
        "INSERT INTO resume (applicant_id, profession) VALUES (?, 'Backend engineer') RETURNING id",
    )
    .bind(applicant.id)
    .fetch_one(db.pool())
    .await
    .expect("Insert resume should succeed");

    Fixture {
        applicant_id: applicant.id,
        employer_id: employer.id,
        vacancy_id,
        resume_id,
    }
}

fn apply(f: &Fixture) -> NewNotification {
    NewNotification {
        notification_type: NotificationType::Apply,
        sender_id: f.applicant_id,
        sender_role: UserRole::Applicant,
        receiver_id: f.employer_id,
        receiver_role: UserRole::Employer,
        object_id: f.vacancy_id,
        resume_id: Some(f.resume_id),
    }
}

fn download_resume(f: &Fixture) -> NewNotification {
    NewNotification {
        notification_type: NotificationType::DownloadResume,
        sender_id: f.employer_id,
        sender_role: UserRole::Employer,
        receiver_id: f.applicant_id,
        receiver_role: UserRole::Applicant,
        object_id: f.resume_id,
        resume_id: None,
    }
}

async fn count_notifications(db: &SqliteDatabase) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM notification")
        .fetch_one(db.pool())
        .await
        .expect("Count should succeed")
}

async fn count_viewed(db: &SqliteDatabase) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM notification WHERE is_viewed = 1")
        .fetch_one(db.pool())
        .await
        .expect("Count should succeed")
}

#[tokio::test(flavor = "multi_thread")]
async fn create_and_get_notification() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    let created = repo
        .create_notification(&ctx, &apply(&f))
        .await
        .expect("Create should succeed");

    assert!(created.id > 0);
    assert_eq!(created.notification_type, NotificationType::Apply);
    assert_eq!(created.sender_id, f.applicant_id);
    assert_eq!(created.sender_role, UserRole::Applicant);
    assert_eq!(created.receiver_id, f.employer_id);
    assert_eq!(created.receiver_role, UserRole::Employer);
    assert_eq!(created.object_id, f.vacancy_id);
    assert_eq!(created.resume_id, f.resume_id);
    assert!(!created.is_viewed);

    let fetched = repo
        .get_notification_by_id(&ctx, created.id)
        .await
        .expect("Get should succeed");
    assert_eq!(fetched, created);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_resume_id_reads_as_zero() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let ctx = RequestContext::generate();

    let created = db
        .notifications()
        .create_notification(&ctx, &download_resume(&f))
        .await
        .expect("Create should succeed");
    assert_eq!(created.resume_id, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_missing_notification_is_not_found() {
    let db = setup_db().await;
    let ctx = RequestContext::generate();

    let err = db
        .notifications()
        .get_notification_by_id(&ctx, 404)
        .await
        .expect_err("Should fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn apply_preview_resolves_names_and_vacancy_title() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    let created = repo
        .create_notification(&ctx, &apply(&f))
        .await
        .expect("Create should succeed");

    let preview = repo
        .get_apply_notification_preview(&ctx, created.id)
        .await
        .expect("Preview should succeed");
    assert_eq!(preview.id, created.id);
    assert_eq!(preview.notification_type, NotificationType::Apply);
    assert_eq!(preview.applicant_name, "Ivan");
    assert_eq!(preview.employer_name, "Acme");
    assert_eq!(preview.title, "Rust developer");
    assert_eq!(preview.resume_id, f.resume_id);
    assert!(!preview.is_viewed);
    assert_eq!(preview.created_at, created.created_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn download_resume_preview_resolves_resume_owner_and_profession() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    let created = repo
        .create_notification(&ctx, &download_resume(&f))
        .await
        .expect("Create should succeed");

    let preview = repo
        .get_download_resume_notification_preview(&ctx, created.id)
        .await
        .expect("Preview should succeed");
    assert_eq!(preview.notification_type, NotificationType::DownloadResume);
    assert_eq!(preview.sender_id, f.employer_id);
    assert_eq!(preview.receiver_id, f.applicant_id);
    assert_eq!(preview.applicant_name, "Ivan");
    assert_eq!(preview.employer_name, "Acme");
    assert_eq!(preview.title, "Backend engineer");
}

#[tokio::test(flavor = "multi_thread")]
async fn preview_of_other_type_is_not_found() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    let created = repo
        .create_notification(&ctx, &download_resume(&f))
        .await
        .expect("Create should succeed");

    let err = repo
        .get_apply_notification_preview(&ctx, created.id)
        .await
        .expect_err("Should fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = repo
        .get_download_resume_notification_preview(&ctx, created.id + 1)
        .await
        .expect_err("Should fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn dangling_references_read_as_empty_strings() {
    let db = setup_db().await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    let created = repo
        .create_notification(
            &ctx,
            &NewNotification {
                notification_type: NotificationType::Apply,
                sender_id: 900,
                sender_role: UserRole::Applicant,
                receiver_id: 901,
                receiver_role: UserRole::Employer,
                object_id: 902,
                resume_id: None,
            },
        )
        .await
        .expect("Create should succeed");

    let preview = repo
        .get_apply_notification_preview(&ctx, created.id)
        .await
        .expect("Preview should succeed");
    assert_eq!(preview.applicant_name, "");
    assert_eq!(preview.employer_name, "");
    assert_eq!(preview.title, "");

    let inbox = repo
        .get_apply_notifications_for_user(&ctx, 901)
        .await
        .expect("List should succeed");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn inbox_lists_newest_first_and_filters_by_type() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    let mut apply_ids = Vec::new();
    for _ in 0..3 {
        let n = repo
            .create_notification(&ctx, &apply(&f))
            .await
            .expect("Create should succeed");
        apply_ids.push(n.id);
    }
    repo.create_notification(&ctx, &download_resume(&f))
        .await
        .expect("Create should succeed");

    let inbox = repo
        .get_apply_notifications_for_user(&ctx, f.employer_id)
        .await
        .expect("List should succeed");
    let ids: Vec<Id> = inbox.iter().map(|p| p.id).collect();
    apply_ids.reverse();
    assert_eq!(ids, apply_ids);
    assert!(
        inbox
            .iter()
            .all(|p| p.notification_type == NotificationType::Apply)
    );
    assert!(inbox.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let downloads = repo
        .get_download_resume_notifications_for_user(&ctx, f.applicant_id)
        .await
        .expect("List should succeed");
    assert_eq!(downloads.len(), 1);
    assert_eq!(downloads[0].title, "Backend engineer");
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_inbox_is_empty_vec() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    repo.create_notification(&ctx, &apply(&f))
        .await
        .expect("Create should succeed");

    let inbox = repo
        .get_apply_notifications_for_user(&ctx, f.applicant_id)
        .await
        .expect("List should succeed");
    assert!(inbox.is_empty());

    let inbox = repo
        .get_download_resume_notifications_for_user(&ctx, 12345)
        .await
        .expect("List should succeed");
    assert!(inbox.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn read_notification_marks_viewed_and_stays_viewed() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    let created = repo
        .create_notification(&ctx, &apply(&f))
        .await
        .expect("Create should succeed");

    repo.read_notification(&ctx, created.id)
        .await
        .expect("Read should succeed");
    repo.read_notification(&ctx, created.id)
        .await
        .expect("Second read should succeed");

    let fetched = repo
        .get_notification_by_id(&ctx, created.id)
        .await
        .expect("Get should succeed");
    assert!(fetched.is_viewed);
}

#[tokio::test(flavor = "multi_thread")]
async fn read_missing_notification_is_not_found() {
    let db = setup_db().await;
    let ctx = RequestContext::generate();

    let err = db
        .notifications()
        .read_notification(&ctx, 55)
        .await
        .expect_err("Should fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn read_all_marks_only_the_role_inbox() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    repo.create_notification(&ctx, &apply(&f))
        .await
        .expect("Create should succeed");
    repo.create_notification(&ctx, &apply(&f))
        .await
        .expect("Create should succeed");
    let download = repo
        .create_notification(&ctx, &download_resume(&f))
        .await
        .expect("Create should succeed");

    repo.read_all_notifications(&ctx, f.employer_id, "employer")
        .await
        .expect("Read all should succeed");

    let inbox = repo
        .get_apply_notifications_for_user(&ctx, f.employer_id)
        .await
        .expect("List should succeed");
    assert!(inbox.iter().all(|p| p.is_viewed));

    let untouched = repo
        .get_notification_by_id(&ctx, download.id)
        .await
        .expect("Get should succeed");
    assert!(!untouched.is_viewed);

    repo.read_all_notifications(&ctx, f.applicant_id, "applicant")
        .await
        .expect("Read all should succeed");
    assert_eq!(count_viewed(&db).await, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn read_all_with_no_rows_succeeds() {
    let db = setup_db().await;
    let ctx = RequestContext::generate();

    db.notifications()
        .read_all_notifications(&ctx, 1, "applicant")
        .await
        .expect("Read all on an empty inbox should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_all_removes_only_the_role_inbox() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    repo.create_notification(&ctx, &apply(&f))
        .await
        .expect("Create should succeed");
    repo.create_notification(&ctx, &download_resume(&f))
        .await
        .expect("Create should succeed");

    repo.delete_all_notifications(&ctx, f.applicant_id, "applicant")
        .await
        .expect("Delete all should succeed");

    assert_eq!(count_notifications(&db).await, 1);
    let remaining = repo
        .get_apply_notifications_for_user(&ctx, f.employer_id)
        .await
        .expect("List should succeed");
    assert_eq!(remaining.len(), 1);

    repo.delete_all_notifications(&ctx, f.employer_id, "employer")
        .await
        .expect("Delete all should succeed");
    assert_eq!(count_notifications(&db).await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_role_is_bad_request_and_touches_nothing() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::generate();

    repo.create_notification(&ctx, &apply(&f))
        .await
        .expect("Create should succeed");
    repo.create_notification(&ctx, &download_resume(&f))
        .await
        .expect("Create should succeed");

    for role in ["", "admin", "Employer", "APPLICANT", " applicant"] {
        let err = repo
            .read_all_notifications(&ctx, f.employer_id, role)
            .await
            .expect_err("Read all should fail");
        assert_eq!(err.kind(), ErrorKind::BadRequest, "role {:?}", role);

        let err = repo
            .delete_all_notifications(&ctx, f.employer_id, role)
            .await
            .expect_err("Delete all should fail");
        assert_eq!(err.kind(), ErrorKind::BadRequest, "role {:?}", role);
    }

    assert_eq!(count_notifications(&db).await, 2);
    assert_eq!(count_viewed(&db).await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_deadline_is_internal() {
    let db = setup_db().await;
    let f = seed(&db).await;
    let repo = db.notifications();
    let ctx = RequestContext::new("expired").with_deadline(Instant::now());

    let err = repo
        .create_notification(&ctx, &apply(&f))
        .await
        .expect_err("Create should fail");
    assert_eq!(err.kind(), ErrorKind::Internal);

    let err = repo
        .get_apply_notifications_for_user(&ctx, f.employer_id)
        .await
        .expect_err("List should fail");
    assert_eq!(err.kind(), ErrorKind::Internal);

    assert_eq!(count_notifications(&db).await, 0);
}
