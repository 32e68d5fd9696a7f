use std::time::Duration;

use todo_server::{
    db::dao::{DaoContext, DaoLayerError, TodoChanges, TodoDao},
    test_helpers::memory_db,
};

async fn todo_dao() -> TodoDao {
    DaoContext::new(&memory_db().await).todo()
}

fn title(value: &str) -> TodoChanges {
    TodoChanges {
        title: Some(value.to_string()),
        ..Default::default()
    }
}

async fn tick() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn create_then_retrieve_returns_supplied_fields() {
    let dao = todo_dao().await;
    let id = dao
        .create(
            None,
            TodoChanges {
                title: Some("buy milk".to_string()),
                description: Some("two litres".to_string()),
                status: Some(true),
            },
        )
        .await
        .expect("create todo");

    let todo = dao
        .retrieve(id)
        .await
        .expect("retrieve todo")
        .expect("todo should exist");

    assert_eq!(todo.id, id);
    assert_eq!(todo.title, "buy milk");
    assert_eq!(todo.description, "two litres");
    assert!(todo.status);
    assert_eq!(todo.created, todo.modified);
}

#[tokio::test]
async fn create_fills_unset_fields_with_defaults() {
    let dao = todo_dao().await;
    let id = dao
        .create(None, TodoChanges::default())
        .await
        .expect("create todo");

    let todo = dao.retrieve(id).await.unwrap().unwrap();
    assert_eq!(todo.title, "");
    assert_eq!(todo.description, "");
    assert!(!todo.status);
}

#[tokio::test]
async fn retrieve_missing_id_is_none() {
    let dao = todo_dao().await;
    assert!(dao.retrieve(404).await.expect("retrieve").is_none());
}

#[tokio::test]
async fn update_without_fields_writes_nothing() {
    let dao = todo_dao().await;
    let id = dao.create(None, title("read")).await.unwrap();
    let before = dao.retrieve(id).await.unwrap().unwrap();

    tick().await;
    let updated = dao
        .update(id, TodoChanges::default())
        .await
        .expect("empty update");

    let after = dao.retrieve(id).await.unwrap().unwrap();
    assert_eq!(updated, 0);
    assert_eq!(after, before);
}

#[tokio::test]
async fn update_missing_id_returns_zero() {
    let dao = todo_dao().await;
    let updated = dao
        .update(12, title("ghost"))
        .await
        .expect("update should not error");
    assert_eq!(updated, 0);
}

#[tokio::test]
async fn update_touches_only_supplied_fields() {
    let dao = todo_dao().await;
    let id = dao
        .create(
            None,
            TodoChanges {
                title: Some("draft".to_string()),
                description: Some("keep me".to_string()),
                status: None,
            },
        )
        .await
        .unwrap();
    let before = dao.retrieve(id).await.unwrap().unwrap();

    tick().await;
    let updated = dao.update(id, title("")).await.expect("update title");

    let after = dao.retrieve(id).await.unwrap().unwrap();
    assert_eq!(updated, 1);
    assert_eq!(after.title, "");
    assert_eq!(after.description, "keep me");
    assert!(!after.status);
    assert_eq!(after.created, before.created);
    assert!(after.modified > before.modified);
}

#[tokio::test]
async fn delete_reports_zero_for_missing_rows() {
    let dao = todo_dao().await;
    let id = dao.create(None, title("once")).await.unwrap();

    assert_eq!(dao.delete(id).await.expect("first delete"), 1);
    assert_eq!(dao.delete(id).await.expect("second delete"), 0);
    assert!(dao.retrieve(id).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_existing_id_updates_like_update() {
    let dao = todo_dao().await;
    let id = dao
        .create(
            None,
            TodoChanges {
                title: Some("walk dog".to_string()),
                description: Some("around the block".to_string()),
                status: None,
            },
        )
        .await
        .unwrap();
    let before = dao.retrieve(id).await.unwrap().unwrap();

    tick().await;
    let returned = dao
        .upsert(
            id,
            TodoChanges {
                status: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("upsert existing");

    let after = dao.retrieve(id).await.unwrap().unwrap();
    assert_eq!(returned, id);
    assert_eq!(after.title, "walk dog");
    assert_eq!(after.description, "around the block");
    assert!(after.status);
    assert_eq!(after.created, before.created);
    assert!(after.modified > before.modified);
}

#[tokio::test]
async fn upsert_missing_id_creates_record() {
    let dao = todo_dao().await;
    let returned = dao.upsert(42, title("answer")).await.expect("upsert new");

    let todo = dao.retrieve(42).await.unwrap().expect("record created");
    assert_eq!(returned, 42);
    assert_eq!(todo.title, "answer");
    assert_eq!(todo.description, "");
    assert!(!todo.status);
    assert_eq!(todo.created, todo.modified);
}

#[tokio::test]
async fn upsert_without_fields_keeps_existing_record() {
    let dao = todo_dao().await;
    let id = dao.create(None, title("stay")).await.unwrap();
    let before = dao.retrieve(id).await.unwrap().unwrap();

    tick().await;
    let returned = dao
        .upsert(id, TodoChanges::default())
        .await
        .expect("empty upsert");

    assert_eq!(returned, id);
    assert_eq!(dao.retrieve(id).await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn explicit_ids_do_not_collide_with_generated_ids() {
    let dao = todo_dao().await;
    let first = dao.create(None, title("first")).await.unwrap();
    let explicit = dao
        .create(Some(first + 10), title("explicit"))
        .await
        .expect("explicit id create");
    let next = dao
        .create(None, title("next"))
        .await
        .expect("generated id after explicit");

    assert_eq!(explicit, first + 10);
    assert!(next > explicit);
}

#[tokio::test]
async fn explicit_id_already_in_use_is_a_constraint_violation() {
    let dao = todo_dao().await;
    let id = dao.create(None, title("taken")).await.unwrap();

    let err = dao
        .create(Some(id), title("duplicate"))
        .await
        .expect_err("duplicate id should fail");

    assert!(matches!(err, DaoLayerError::Constraint(_)), "got {err}");
    assert_eq!(dao.retrieve(id).await.unwrap().unwrap().title, "taken");
}

#[tokio::test]
async fn get_all_reflects_creates_and_deletes() {
    let dao = todo_dao().await;
    let mut ids = Vec::new();
    for n in 0..5 {
        ids.push(dao.create(None, title(&format!("task {n}"))).await.unwrap());
    }
    dao.delete(ids[1]).await.unwrap();
    dao.delete(ids[3]).await.unwrap();

    let todos = dao.get_all().await.expect("list todos");
    let listed: Vec<i64> = todos.iter().map(|todo| todo.id).collect();

    assert_eq!(listed, vec![ids[0], ids[2], ids[4]]);
}

#[tokio::test]
async fn non_positive_ids_are_stored_and_do_not_disturb_generated_ids() {
    let dao = todo_dao().await;

    assert_eq!(dao.upsert(-5, title("negative")).await.expect("upsert -5"), -5);
    assert_eq!(dao.create(Some(0), title("zero")).await.expect("create 0"), 0);
    let generated = dao.create(None, title("generated")).await.expect("create");

    assert!(generated >= 1);
    assert_eq!(dao.retrieve(-5).await.unwrap().unwrap().title, "negative");
    assert_eq!(dao.retrieve(0).await.unwrap().unwrap().title, "zero");
}
