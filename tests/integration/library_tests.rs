//! Repository and service scenarios against a real database

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use deptlib_server::{
    error::AppError,
    models::{
        book::{Book, BookQuery, CreateBook},
        borrow::{BorrowQuery, BorrowStatus},
        profile::{Profile, ProfileStatus, Role},
    },
    repository::{profiles::NewProfile, Repository},
    services::{borrows::BorrowsService, registrations::RegistrationsService},
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn profile(repo: &Repository, external_id: &str, role: Role, status: ProfileStatus) -> Profile {
    let new_profile = NewProfile {
        name: format!("Member {}", external_id),
        role,
        external_id: external_id.to_string(),
        phone: "9876543210".to_string(),
        status,
    };
    let (_, profile) = repo
        .profiles
        .create_with_account(
            &format!("{}@library.edu", external_id.to_lowercase()),
            "not-a-real-hash",
            &new_profile,
        )
        .await
        .expect("create profile");
    profile
}

async fn book(repo: &Repository, title: &str, total: i32, available: i32) -> Book {
    repo.books
        .create(&CreateBook {
            title: title.to_string(),
            author: "A. Author".to_string(),
            publisher: "Campus Press".to_string(),
            edition: None,
            total_copies: total,
            available_copies: Some(available),
            category: Some("AI".to_string()),
            cover_url: None,
            isbn: None,
        })
        .await
        .expect("create book")
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn borrow_and_return_keep_copies_and_ledger_in_step(pool: PgPool) {
    let repo = Repository::new(pool);
    let asha = profile(&repo, "23481A54K9", Role::Student, ProfileStatus::Active).await;
    let ravi = profile(&repo, "aids_12345", Role::Faculty, ProfileStatus::Active).await;
    let book = book(&repo, "Deep Learning", 3, 3).await;

    let first = repo
        .borrows
        .borrow(asha.id, book.id, date(2025, 1, 10), date(2025, 7, 10))
        .await
        .unwrap();
    repo.borrows
        .borrow(ravi.id, book.id, date(2025, 1, 11), date(2025, 7, 11))
        .await
        .unwrap();

    assert_eq!(repo.books.get_by_id(book.id).await.unwrap().available_copies, 1);

    let returned = repo.borrows.return_borrow(first.id, date(2025, 2, 1)).await.unwrap();
    assert_eq!(returned.status, BorrowStatus::Returned);
    assert_eq!(returned.returned_at, Some(date(2025, 2, 1)));
    assert_eq!(repo.books.get_by_id(book.id).await.unwrap().available_copies, 2);

    let (records, total) = repo.borrows.list(&BorrowQuery::default()).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(records.iter().filter(|r| r.status == BorrowStatus::Returned).count(), 1);
    assert_eq!(records.iter().filter(|r| r.status == BorrowStatus::Borrowed).count(), 1);

    let counts = repo.borrows.counts(None).await.unwrap();
    assert_eq!((counts.borrowed, counts.returned), (1, 1));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn borrowing_without_available_copies_is_refused(pool: PgPool) {
    let repo = Repository::new(pool);
    let asha = profile(&repo, "23481A54K9", Role::Student, ProfileStatus::Active).await;
    let book = book(&repo, "Pattern Recognition", 1, 0).await;

    let err = repo
        .borrows
        .borrow(asha.id, book.id, date(2025, 1, 10), date(2025, 7, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));

    assert_eq!(repo.books.get_by_id(book.id).await.unwrap().available_copies, 0);
    let (_, total) = repo.borrows.list(&BorrowQuery::default()).await.unwrap();
    assert_eq!(total, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn concurrent_borrows_of_the_last_copy_lend_it_once(pool: PgPool) {
    let repo = Repository::new(pool);
    let asha = profile(&repo, "23481A54K9", Role::Student, ProfileStatus::Active).await;
    let ravi = profile(&repo, "aids_12345", Role::Faculty, ProfileStatus::Active).await;
    let book = book(&repo, "Information Theory", 1, 1).await;

    let (first, second) = tokio::join!(
        repo.borrows.borrow(asha.id, book.id, date(2025, 1, 10), date(2025, 7, 10)),
        repo.borrows.borrow(ravi.id, book.id, date(2025, 1, 10), date(2025, 7, 10)),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| matches!(r, Err(AppError::Unavailable(_))))
            .count(),
        1
    );

    assert_eq!(repo.books.get_by_id(book.id).await.unwrap().available_copies, 0);
    let (_, total) = repo.borrows.list(&BorrowQuery::default()).await.unwrap();
    assert_eq!(total, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn books_without_copies_are_never_offered_for_borrowing(pool: PgPool) {
    let repo = Repository::new(pool);
    let borrows = BorrowsService::new(repo.clone(), 6);
    book(&repo, "Graph Neural Networks", 2, 0).await;
    let on_shelf = book(&repo, "Bayesian Reasoning", 2, 2).await;

    let candidates = borrows.candidates().await.unwrap();
    let offered: Vec<_> = candidates.books.iter().map(|b| b.id).collect();
    assert_eq!(offered, vec![on_shelf.id]);

    let (found, total) = repo
        .books
        .search(&BookQuery {
            available_only: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(found.iter().map(|b| b.id).collect::<Vec<_>>(), vec![on_shelf.id]);

    let (_, all) = repo.books.search(&BookQuery::default()).await.unwrap();
    assert_eq!(all, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn borrowing_an_unknown_book_is_not_found(pool: PgPool) {
    let repo = Repository::new(pool);
    let asha = profile(&repo, "23481A54K9", Role::Student, ProfileStatus::Active).await;

    let err = repo
        .borrows
        .borrow(asha.id, Uuid::new_v4(), date(2025, 1, 10), date(2025, 7, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn returning_twice_is_an_invalid_transition(pool: PgPool) {
    let repo = Repository::new(pool);
    let asha = profile(&repo, "23481A54K9", Role::Student, ProfileStatus::Active).await;
    let book = book(&repo, "Reinforcement Learning", 2, 2).await;

    let record = repo
        .borrows
        .borrow(asha.id, book.id, date(2025, 1, 10), date(2025, 7, 10))
        .await
        .unwrap();
    repo.borrows.return_borrow(record.id, date(2025, 1, 20)).await.unwrap();

    let err = repo
        .borrows
        .return_borrow(record.id, date(2025, 1, 21))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));
    assert_eq!(repo.books.get_by_id(book.id).await.unwrap().available_copies, 2);

    let err = repo
        .borrows
        .return_borrow(Uuid::new_v4(), date(2025, 1, 21))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn only_active_members_can_borrow(pool: PgPool) {
    let repo = Repository::new(pool);
    let pending = profile(&repo, "24481A54B2", Role::Student, ProfileStatus::Pending).await;
    let librarian = profile(&repo, "LIB001", Role::Librarian, ProfileStatus::Active).await;
    let book = book(&repo, "Computer Vision", 2, 2).await;

    for borrower in [pending.id, librarian.id] {
        let err = repo
            .borrows
            .borrow(borrower, book.id, date(2025, 1, 10), date(2025, 7, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    assert_eq!(repo.books.get_by_id(book.id).await.unwrap().available_copies, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn registration_decisions_apply_once(pool: PgPool) {
    let repo = Repository::new(pool);
    let registrations = RegistrationsService::new(repo.clone());
    let asha = profile(&repo, "23481A54K9", Role::Student, ProfileStatus::Pending).await;
    let ravi = profile(&repo, "aids_12345", Role::Faculty, ProfileStatus::Pending).await;

    let approved = registrations.approve(asha.id).await.unwrap();
    assert_eq!(approved.status, ProfileStatus::Active);

    let rejected = registrations.reject(ravi.id).await.unwrap();
    assert_eq!(rejected.status, ProfileStatus::Rejected);

    let err = registrations.reject(asha.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));
    assert_eq!(repo.profiles.get_by_id(asha.id).await.unwrap().status, ProfileStatus::Active);

    let err = registrations.approve(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn books_on_loan_cannot_be_deleted(pool: PgPool) {
    let repo = Repository::new(pool);
    let asha = profile(&repo, "23481A54K9", Role::Student, ProfileStatus::Active).await;
    let book = book(&repo, "Probabilistic Models", 1, 1).await;

    let record = repo
        .borrows
        .borrow(asha.id, book.id, date(2025, 1, 10), date(2025, 7, 10))
        .await
        .unwrap();

    let err = repo.books.delete(book.id).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    repo.borrows.return_borrow(record.id, date(2025, 1, 12)).await.unwrap();
    repo.books.delete(book.id).await.unwrap();
    assert!(matches!(
        repo.books.get_by_id(book.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}
