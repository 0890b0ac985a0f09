use chrono::{NaiveDate, Utc};
use sea_orm::Database;

use engine::{AccountType, Engine, EngineError, ExpenseNew, Group, MemberRole};
use migration::MigratorTrait;

async fn fresh_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn with_profile(engine: &Engine, uid: &str) {
    engine
        .create_profile(
            uid,
            &format!("{uid}@example.com"),
            uid,
            "USD",
            "en",
            Utc::now(),
        )
        .await
        .unwrap();
}

async fn household(engine: &Engine) -> Group {
    with_profile(engine, "alice").await;
    with_profile(engine, "bob").await;
    let group = engine
        .create_group("alice", "household", Utc::now())
        .await
        .unwrap();
    engine.join_group("bob", &group.invite_code).await.unwrap();
    group
}

fn expense() -> ExpenseNew {
    ExpenseNew {
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        category: "Food".to_string(),
        item_name: "item".to_string(),
        quantity: 1.0,
        unit: None,
        price: 10.0,
        currency: "USD".to_string(),
        device: None,
    }
}

#[tokio::test]
async fn creating_a_group_flips_the_owner_to_group_scope() {
    let engine = fresh_engine().await;
    with_profile(&engine, "alice").await;

    let group = engine
        .create_group("alice", "household", Utc::now())
        .await
        .unwrap();
    assert!(group.invite_code.starts_with("GR-"));

    let profile = engine.user_profile("alice").await.unwrap();
    assert_eq!(profile.account_type, AccountType::Group);
    assert_eq!(profile.group_id, Some(group.id.to_string()));

    // Group scope gets its own seeded categories.
    assert_eq!(engine.list_categories("alice").await.unwrap().len(), 5);
}

#[tokio::test]
async fn group_members_share_records() {
    let engine = fresh_engine().await;
    household(&engine).await;

    engine.add_expense("alice", expense(), Utc::now()).await.unwrap();

    let seen_by_bob = engine.list_expenses("bob").await.unwrap();
    assert_eq!(seen_by_bob.len(), 1);
    assert_eq!(seen_by_bob[0].user_id, "alice");
    assert_eq!(seen_by_bob[0].created_by_name.as_deref(), Some("alice"));
}

#[tokio::test]
async fn a_member_of_one_group_cannot_create_or_join_another() {
    let engine = fresh_engine().await;
    let group = household(&engine).await;

    let err = engine
        .create_group("bob", "second", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MemberAlreadyExists(_)));

    let err = engine
        .join_group("bob", &group.invite_code)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MemberAlreadyExists(_)));
}

#[tokio::test]
async fn joining_with_an_unknown_code_is_rejected() {
    let engine = fresh_engine().await;
    with_profile(&engine, "bob").await;

    let err = engine.join_group("bob", "GR-DEADBEEF").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInviteCode(_)));
}

#[tokio::test]
async fn removing_a_member_reverts_them_to_personal_scope() {
    let engine = fresh_engine().await;
    let group = household(&engine).await;

    // Personal record from before bob joined must stay invisible to the group.
    engine.remove_member("alice", group.id, "bob").await.unwrap();

    let profile = engine.user_profile("bob").await.unwrap();
    assert_eq!(profile.account_type, AccountType::Personal);
    assert_eq!(profile.group_id, None);

    let members = engine.list_members("alice", group.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].role, MemberRole::Admin);
}

#[tokio::test]
async fn only_admins_remove_members_and_the_owner_is_immovable() {
    let engine = fresh_engine().await;
    let group = household(&engine).await;

    let err = engine
        .remove_member("bob", group.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .remove_member("alice", group.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.leave_group("alice").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.leave_group("bob").await.unwrap();
    let profile = engine.user_profile("bob").await.unwrap();
    assert_eq!(profile.group_id, None);
}

#[tokio::test]
async fn group_records_survive_a_member_leaving() {
    let engine = fresh_engine().await;
    household(&engine).await;

    engine.add_expense("bob", expense(), Utc::now()).await.unwrap();
    engine.leave_group("bob").await.unwrap();

    // The record stays with the group, not its author.
    assert_eq!(engine.list_expenses("alice").await.unwrap().len(), 1);
    assert!(engine.list_expenses("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn non_members_cannot_inspect_a_group() {
    let engine = fresh_engine().await;
    let group = household(&engine).await;
    with_profile(&engine, "mallory").await;

    let err = engine
        .list_members("mallory", group.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .pending_invitations("mallory", group.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn invitations_are_admin_only_and_idempotent_per_email() {
    let engine = fresh_engine().await;
    let group = household(&engine).await;

    let err = engine
        .send_invitation("bob", group.id, "carol@example.com", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let first = engine
        .send_invitation("alice", group.id, "Carol@Example.com", Utc::now())
        .await
        .unwrap();
    assert_eq!(first.email, "carol@example.com");
    assert_eq!(first.status, "pending");
    assert_eq!(first.inviter_name, "alice");

    // Re-inviting a pending email hands back the same record.
    let second = engine
        .send_invitation("alice", group.id, "carol@example.com", Utc::now())
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(engine.pending_invitations("alice", group.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn inviting_a_current_member_conflicts() {
    let engine = fresh_engine().await;
    let group = household(&engine).await;

    let err = engine
        .send_invitation("alice", group.id, "bob@example.com", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MemberAlreadyExists(_)));
}

#[tokio::test]
async fn revoking_an_invitation_clears_it_from_the_pending_list() {
    let engine = fresh_engine().await;
    let group = household(&engine).await;

    let invitation = engine
        .send_invitation("alice", group.id, "carol@example.com", Utc::now())
        .await
        .unwrap();

    let err = engine
        .revoke_invitation("bob", invitation.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.revoke_invitation("alice", invitation.id).await.unwrap();
    assert!(engine
        .pending_invitations("alice", group.id)
        .await
        .unwrap()
        .is_empty());

    let err = engine
        .revoke_invitation("alice", invitation.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
