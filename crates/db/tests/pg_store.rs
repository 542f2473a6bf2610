//! Survey repository tests against PostgreSQL.
//!
//! Each test gets a fresh database from `#[sqlx::test]` with the crate's
//! migrations applied. Set `DATABASE_URL` and run with `--ignored`.

use sqlx::PgPool;
use tempo_core::filter::FilterState;
use tempo_core::survey::{PageContent, PageInput, PageType, RatingType, SurveyInput};
use tempo_db::repositories::SurveyRepo;
use tempo_db::store::{PgSurveyStore, SurveyStore};

fn csat() -> SurveyInput {
    SurveyInput {
        title: "CSAT".to_string(),
        description: "d".to_string(),
        pages: vec![
            PageInput {
                title: "Pick one".to_string(),
                description: String::new(),
                content: PageContent::Mcq {
                    options: vec!["A".into(), "B".into(), "C".into()],
                    allow_multiple: false,
                },
            },
            PageInput {
                title: "Rate us".to_string(),
                description: String::new(),
                content: PageContent::Rating {
                    rating_type: Some(RatingType::Emoji),
                    low_label: Some("Poor".into()),
                    high_label: None,
                    rating_scale: Some(5),
                },
            },
        ],
    }
}

async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_create_and_fetch(pool: PgPool) {
    let store = PgSurveyStore::new(pool);

    let created = SurveyRepo::save(&store, &csat(), None, "u1").await.unwrap();

    assert_eq!(created.pages.len(), 2);
    assert_eq!(created.pages[0].content.options(), ["A", "B", "C"]);
    assert_eq!(created.pages[1].content, csat().pages[1].content);
    assert!(store.ping().await.is_ok());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_update_replaces_children(pool: PgPool) {
    let store = PgSurveyStore::new(pool.clone());
    let created = SurveyRepo::create(&store, &csat(), "u1").await.unwrap();

    let replacement = SurveyInput {
        title: "Short".to_string(),
        description: String::new(),
        pages: vec![PageInput {
            title: "Why?".to_string(),
            description: String::new(),
            content: PageContent::Text { placeholder: None },
        }],
    };
    let updated = SurveyRepo::update(&store, created.id, &replacement)
        .await
        .unwrap();

    assert_eq!(updated.pages.len(), 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM survey_options").await, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM survey_pages").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_delete_and_list(pool: PgPool) {
    let store = PgSurveyStore::new(pool.clone());
    let first = SurveyRepo::create(&store, &csat(), "u1").await.unwrap();
    let second = SurveyRepo::create(&store, &csat(), "u1").await.unwrap();

    let listed = SurveyRepo::list_for_user(&store, "u1", &FilterState::by_type(PageType::Mcq))
        .await
        .unwrap();
    assert_eq!(
        listed.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![second.id, first.id]
    );

    SurveyRepo::delete(&store, first.id).await.unwrap();
    assert!(SurveyRepo::find_by_id(&store, first.id)
        .await
        .unwrap_err()
        .is_not_found());
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM surveys").await, 1);
}
