//! Integration tests for `SqliteStore`, mostly against an in-memory database.

use std::collections::BTreeSet;

use lifskill_core::{
  CategoryId, Classify, ErrorKind, ItemId, QUORUM, UserId,
  gate::AdminOverride,
  gate::ExpertRoster,
  item::{ItemFilter, ItemKind, ItemStatus, NewItem},
  store::ModerationStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, name: &str) -> UserId {
  s.add_user(name.into()).await.unwrap().user_id
}

async fn category(s: &SqliteStore, name: &str) -> CategoryId {
  s.add_category(name.into()).await.unwrap().category_id
}

async fn post(s: &SqliteStore, owner: UserId, categories: &[CategoryId]) -> ItemId {
  s.create_item(
    owner,
    NewItem::post("Sourdough", "Feed the starter daily.", categories.iter().copied()),
  )
  .await
  .unwrap()
  .item_id
}

fn kind_of<T: std::fmt::Debug>(r: Result<T, Error>) -> ErrorKind {
  r.expect_err("expected an error").kind()
}

/// Item I in {A, B}; E1, E2 expert in A; E3 expert in B; E4 in neither.
struct Scenario {
  store: SqliteStore,
  item:  ItemId,
  a:     CategoryId,
  b:     CategoryId,
  e1:    UserId,
  e2:    UserId,
  e3:    UserId,
  e4:    UserId,
}

async fn scenario() -> Scenario {
  let store = store().await;
  let owner = user(&store, "owner").await;
  let a = category(&store, "Cooking").await;
  let b = category(&store, "Gardening").await;
  let e1 = user(&store, "e1").await;
  let e2 = user(&store, "e2").await;
  let e3 = user(&store, "e3").await;
  let e4 = user(&store, "e4").await;
  store.assign_expert(e1, a).await.unwrap();
  store.assign_expert(e2, a).await.unwrap();
  store.assign_expert(e3, b).await.unwrap();
  let item = post(&store, owner, &[a, b]).await;
  Scenario { store, item, a, b, e1, e2, e3, e4 }
}

// ─── Users and categories ────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;
  let added = s.add_user("ada".into()).await.unwrap();
  let fetched = s.get_user(added.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.username, "ada");
  assert!(s.get_user(UserId(999)).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
  let s = store().await;
  user(&s, "ada").await;
  assert_eq!(kind_of(s.add_user("ada".into()).await), ErrorKind::Conflict);
}

#[tokio::test]
async fn blank_names_are_invalid_input() {
  let s = store().await;
  assert_eq!(kind_of(s.add_user("  ".into()).await), ErrorKind::InvalidInput);
  assert_eq!(kind_of(s.add_category("".into()).await), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn categories_list_in_creation_order() {
  let s = store().await;
  let a = category(&s, "Cooking").await;
  let b = category(&s, "Gardening").await;
  let listed: Vec<_> =
    s.list_categories().await.unwrap().into_iter().map(|c| c.category_id).collect();
  assert_eq!(listed, vec![a, b]);
  assert_eq!(s.get_category(b).await.unwrap().unwrap().name, "Gardening");
}

// ─── Category directory ──────────────────────────────────────────────────────

#[tokio::test]
async fn assign_and_revoke_expert() {
  let s = store().await;
  let u = user(&s, "u").await;
  let c = category(&s, "Cooking").await;

  assert!(!s.is_expert(u, c).await.unwrap());
  assert!(s.assign_expert(u, c).await.unwrap());
  assert!(!s.assign_expert(u, c).await.unwrap(), "second assign is a no-op");
  assert!(s.is_expert(u, c).await.unwrap());
  assert_eq!(s.experts(c).await.unwrap(), vec![u]);
  assert_eq!(s.expert_categories(u).await.unwrap(), vec![c]);

  assert!(s.revoke_expert(u, c).await.unwrap());
  assert!(!s.revoke_expert(u, c).await.unwrap());
  assert!(!s.is_expert(u, c).await.unwrap());
}

#[tokio::test]
async fn unknown_identities_are_not_experts() {
  let s = store().await;
  let c = category(&s, "Cooking").await;
  assert!(!s.is_expert(UserId(42), c).await.unwrap());
  assert!(!s.is_expert(UserId(42), CategoryId(42)).await.unwrap());
}

#[tokio::test]
async fn assign_expert_requires_existing_user_and_category() {
  let s = store().await;
  let u = user(&s, "u").await;
  let c = category(&s, "Cooking").await;
  assert_eq!(kind_of(s.assign_expert(UserId(77), c).await), ErrorKind::NotFound);
  assert_eq!(kind_of(s.assign_expert(u, CategoryId(77)).await), ErrorKind::NotFound);
  assert_eq!(kind_of(s.experts(CategoryId(77)).await), ErrorKind::NotFound);
}

#[tokio::test]
async fn replace_expertise_is_all_or_nothing() {
  let s = store().await;
  let u = user(&s, "u").await;
  let a = category(&s, "A").await;
  let b = category(&s, "B").await;
  let c = category(&s, "C").await;
  s.assign_expert(u, a).await.unwrap();

  s.replace_expertise(u, BTreeSet::from([b, c])).await.unwrap();
  assert_eq!(s.expert_categories(u).await.unwrap(), vec![b, c]);

  let err = s
    .replace_expertise(u, BTreeSet::from([a, CategoryId(404)]))
    .await;
  assert_eq!(kind_of(err), ErrorKind::InvalidReference);
  assert_eq!(s.expert_categories(u).await.unwrap(), vec![b, c]);
}

// ─── Content item registry ───────────────────────────────────────────────────

#[tokio::test]
async fn create_item_starts_pending_with_its_categories() {
  let s = store().await;
  let owner = user(&s, "owner").await;
  let a = category(&s, "A").await;
  let b = category(&s, "B").await;

  let item = s
    .create_item(owner, NewItem::post("t", "b", [a, b]))
    .await
    .unwrap();
  assert_eq!(item.status, ItemStatus::Pending);
  assert!(item.approved_at.is_none());

  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert_eq!(fetched.categories, BTreeSet::from([a, b]));
  assert_eq!(fetched.owner_id, owner);
  assert_eq!(s.item_categories(item.item_id).await.unwrap(), BTreeSet::from([a, b]));
  assert_eq!(s.item_status(item.item_id).await.unwrap(), ItemStatus::Pending);
}

#[tokio::test]
async fn create_item_rejects_unknown_category_without_side_effects() {
  let s = store().await;
  let owner = user(&s, "owner").await;
  let a = category(&s, "A").await;

  let err = s
    .create_item(owner, NewItem::post("t", "b", [a, CategoryId(404)]))
    .await;
  assert!(matches!(
    err,
    Err(Error::Core(lifskill_core::Error::UnknownCategory(CategoryId(404))))
  ));
  assert!(s.list_items(ItemFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_item_validates_payload_and_owner() {
  let s = store().await;
  let owner = user(&s, "owner").await;
  let a = category(&s, "A").await;

  let empty = NewItem::post("t", "b", []);
  assert_eq!(kind_of(s.create_item(owner, empty).await), ErrorKind::InvalidInput);
  assert_eq!(
    kind_of(s.create_item(UserId(404), NewItem::post("t", "b", [a])).await),
    ErrorKind::NotFound
  );
}

#[tokio::test]
async fn missing_item_lookups() {
  let s = store().await;
  assert!(s.get_item(ItemId(1)).await.unwrap().is_none());
  assert_eq!(kind_of(s.item_status(ItemId(1)).await), ErrorKind::NotFound);
  assert_eq!(kind_of(s.item_categories(ItemId(1)).await), ErrorKind::NotFound);
  assert_eq!(kind_of(s.approval_count(ItemId(1)).await), ErrorKind::NotFound);
  assert_eq!(kind_of(s.approvals(ItemId(1)).await), ErrorKind::NotFound);
}

#[tokio::test]
async fn list_items_filters_by_status_kind_and_owner() {
  let sc = scenario().await;
  let s = &sc.store;
  let owner = user(s, "asker").await;
  let request = s
    .create_item(
      owner,
      NewItem { kind: ItemKind::Request, ..NewItem::post("q", "how?", [sc.a]) },
    )
    .await
    .unwrap();

  for voter in [sc.e1, sc.e2, sc.e3] {
    s.cast_approval(voter, sc.item).await.unwrap();
  }

  let all = s.list_items(ItemFilter::default()).await.unwrap();
  assert_eq!(
    all.iter().map(|i| i.item_id).collect::<Vec<_>>(),
    vec![request.item_id, sc.item],
    "newest first"
  );

  let approved = s
    .list_items(ItemFilter { status: Some(ItemStatus::Approved), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(approved.len(), 1);
  assert_eq!(approved[0].item_id, sc.item);

  let requests = s
    .list_items(ItemFilter { kind: Some(ItemKind::Request), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].kind, ItemKind::Request);

  let mine = s
    .list_items(ItemFilter { owner: Some(owner), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(mine.iter().map(|i| i.item_id).collect::<Vec<_>>(), vec![request.item_id]);

  let nobody = s
    .list_items(ItemFilter { owner: Some(UserId(999)), ..Default::default() })
    .await
    .unwrap();
  assert!(nobody.is_empty());
}

#[tokio::test]
async fn pending_for_expert_follows_roster() {
  let sc = scenario().await;
  let s = &sc.store;

  let for_e3 = s.pending_for_expert(sc.e3).await.unwrap();
  assert_eq!(for_e3.len(), 1);
  assert_eq!(for_e3[0].item_id, sc.item);
  assert!(s.pending_for_expert(sc.e4).await.unwrap().is_empty());

  for voter in [sc.e1, sc.e2, sc.e3] {
    s.cast_approval(voter, sc.item).await.unwrap();
  }
  assert!(s.pending_for_expert(sc.e3).await.unwrap().is_empty());
}

// ─── Approval ledger ─────────────────────────────────────────────────────────

#[tokio::test]
async fn quorum_scenario() {
  let sc = scenario().await;
  let s = &sc.store;

  let first = s.cast_approval(sc.e1, sc.item).await.unwrap();
  assert_eq!((first.approval_count, first.status), (1, ItemStatus::Pending));

  assert_eq!(kind_of(s.cast_approval(sc.e4, sc.item).await), ErrorKind::Forbidden);

  let second = s.cast_approval(sc.e2, sc.item).await.unwrap();
  assert_eq!((second.approval_count, second.status), (2, ItemStatus::Pending));
  assert!(!second.transitioned);

  let third = s.cast_approval(sc.e3, sc.item).await.unwrap();
  assert_eq!((third.approval_count, third.status), (3, ItemStatus::Approved));
  assert!(third.transitioned);

  assert_eq!(kind_of(s.cast_approval(sc.e1, sc.item).await), ErrorKind::Conflict);
  assert_eq!(s.approval_count(sc.item).await.unwrap(), 3);

  let item = s.get_item(sc.item).await.unwrap().unwrap();
  assert_eq!(item.status, ItemStatus::Approved);
  assert!(item.approved_at.is_some());
}

#[tokio::test]
async fn forbidden_vote_leaves_no_row() {
  let sc = scenario().await;
  let s = &sc.store;
  assert_eq!(kind_of(s.cast_approval(sc.e4, sc.item).await), ErrorKind::Forbidden);
  assert_eq!(
    kind_of(s.cast_approval(UserId(999), sc.item).await),
    ErrorKind::Forbidden
  );
  assert_eq!(s.approval_count(sc.item).await.unwrap(), 0);
  assert!(s.approvals(sc.item).await.unwrap().is_empty());
}

#[tokio::test]
async fn vote_on_missing_item_is_not_found() {
  let sc = scenario().await;
  assert_eq!(
    kind_of(sc.store.cast_approval(sc.e1, ItemId(999)).await),
    ErrorKind::NotFound
  );
}

#[tokio::test]
async fn votes_past_quorum_do_not_transition_again() {
  let sc = scenario().await;
  let s = &sc.store;
  let e5 = user(s, "e5").await;
  s.assign_expert(e5, sc.b).await.unwrap();

  for voter in [sc.e1, sc.e2, sc.e3] {
    s.cast_approval(voter, sc.item).await.unwrap();
  }
  let approved_at = s.get_item(sc.item).await.unwrap().unwrap().approved_at;

  let fourth = s.cast_approval(e5, sc.item).await.unwrap();
  assert_eq!(fourth.approval_count, QUORUM + 1);
  assert_eq!(fourth.status, ItemStatus::Approved);
  assert!(!fourth.transitioned);
  assert_eq!(s.get_item(sc.item).await.unwrap().unwrap().approved_at, approved_at);
}

#[tokio::test]
async fn revoked_expert_cannot_vote_but_keeps_past_votes() {
  let sc = scenario().await;
  let s = &sc.store;

  s.cast_approval(sc.e1, sc.item).await.unwrap();
  s.revoke_expert(sc.e1, sc.a).await.unwrap();
  s.revoke_expert(sc.e2, sc.a).await.unwrap();

  assert_eq!(s.approval_count(sc.item).await.unwrap(), 1);
  assert!(!s.can_approve(sc.e2, sc.item).await.unwrap());
  assert_eq!(kind_of(s.cast_approval(sc.e2, sc.item).await), ErrorKind::Forbidden);
}

#[tokio::test]
async fn approval_survives_roster_removal() {
  let sc = scenario().await;
  let s = &sc.store;
  for voter in [sc.e1, sc.e2, sc.e3] {
    s.cast_approval(voter, sc.item).await.unwrap();
  }
  s.replace_expertise(sc.e1, BTreeSet::new()).await.unwrap();
  s.replace_expertise(sc.e2, BTreeSet::new()).await.unwrap();
  s.replace_expertise(sc.e3, BTreeSet::new()).await.unwrap();

  assert_eq!(s.item_status(sc.item).await.unwrap(), ItemStatus::Approved);
  assert_eq!(s.approval_count(sc.item).await.unwrap(), 3);
}

#[tokio::test]
async fn approvals_are_listed_in_vote_order() {
  let sc = scenario().await;
  let s = &sc.store;
  s.cast_approval(sc.e3, sc.item).await.unwrap();
  s.cast_approval(sc.e1, sc.item).await.unwrap();
  let voters: Vec<_> =
    s.approvals(sc.item).await.unwrap().into_iter().map(|v| v.voter_id).collect();
  assert_eq!(voters, vec![sc.e3, sc.e1]);
}

#[tokio::test]
async fn category_without_experts_never_reaches_quorum() {
  let s = store().await;
  let owner = user(&s, "owner").await;
  let lonely = category(&s, "Lonely").await;
  let item = post(&s, owner, &[lonely]).await;
  for name in ["x", "y", "z"] {
    let u = user(&s, name).await;
    assert_eq!(kind_of(s.cast_approval(u, item).await), ErrorKind::Forbidden);
  }
  assert_eq!(s.item_status(item).await.unwrap(), ItemStatus::Pending);
}

#[tokio::test]
async fn admin_override_gate_lets_admins_vote() {
  // Ids are assigned from 1, so the first user registered is the admin.
  let s = SqliteStore::open_in_memory_with_gate(AdminOverride::new(
    [UserId(1)],
    ExpertRoster,
  ))
  .await
  .unwrap();
  let admin = s.add_user("admin".into()).await.unwrap().user_id;
  assert_eq!(admin, UserId(1));
  let other = s.add_user("other".into()).await.unwrap().user_id;
  let c = s.add_category("C".into()).await.unwrap().category_id;
  let item = s
    .create_item(other, NewItem::post("t", "b", [c]))
    .await
    .unwrap()
    .item_id;

  assert!(s.can_approve(admin, item).await.unwrap());
  assert_eq!(s.cast_approval(admin, item).await.unwrap().approval_count, 1);
  assert!(matches!(
    s.cast_approval(other, item).await,
    Err(Error::Core(lifskill_core::Error::NotAnExpert { .. }))
  ));
}

// ─── Achievement ledger ──────────────────────────────────────────────────────

#[tokio::test]
async fn bookmark_toggle_scenario() {
  let sc = scenario().await;
  let s = &sc.store;
  let u = user(s, "reader").await;

  let on = s.toggle_bookmark(u, sc.item).await.unwrap();
  assert!(on.bookmarked);
  assert_eq!((s.score(u, sc.a).await.unwrap(), s.score(u, sc.b).await.unwrap()), (1, 1));
  assert!(s.is_bookmarked(u, sc.item).await.unwrap());

  let off = s.toggle_bookmark(u, sc.item).await.unwrap();
  assert!(!off.bookmarked);
  assert_eq!((s.score(u, sc.a).await.unwrap(), s.score(u, sc.b).await.unwrap()), (0, 0));
  assert!(!s.is_bookmarked(u, sc.item).await.unwrap());

  let again = s.toggle_bookmark(u, sc.item).await.unwrap();
  assert!(again.bookmarked);
  assert_eq!((s.score(u, sc.a).await.unwrap(), s.score(u, sc.b).await.unwrap()), (1, 1));
  assert_eq!(s.bookmarks(u).await.unwrap(), vec![sc.item]);
}

#[tokio::test]
async fn toggle_returns_entries_after_adjustment() {
  let sc = scenario().await;
  let s = &sc.store;
  let u = user(s, "reader").await;
  s.claim_achievement(u, sc.item).await.unwrap();

  let on = s.toggle_bookmark(u, sc.item).await.unwrap();
  let scores: Vec<_> = on.entries.iter().map(|e| (e.category_id, e.score)).collect();
  assert_eq!(scores, vec![(sc.a, 2), (sc.b, 2)]);
}

#[tokio::test]
async fn overlapping_bookmarks_unwind_to_zero() {
  let sc = scenario().await;
  let s = &sc.store;
  let u = user(s, "reader").await;
  let owner = user(s, "owner2").await;
  let only_a = post(s, owner, &[sc.a]).await;

  s.toggle_bookmark(u, sc.item).await.unwrap();
  s.toggle_bookmark(u, only_a).await.unwrap();
  assert_eq!(s.score(u, sc.a).await.unwrap(), 2);

  s.toggle_bookmark(u, sc.item).await.unwrap();
  s.toggle_bookmark(u, only_a).await.unwrap();
  assert_eq!(s.score(u, sc.a).await.unwrap(), 0);
  assert_eq!(s.score(u, sc.b).await.unwrap(), 0);
}

#[tokio::test]
async fn score_reads_never_create_rows() {
  let sc = scenario().await;
  let s = &sc.store;
  let u = user(s, "reader").await;
  assert_eq!(s.score(u, sc.a).await.unwrap(), 0);
  assert_eq!(s.score(UserId(999), CategoryId(999)).await.unwrap(), 0);
  assert!(s.achievements(u).await.unwrap().is_empty());
}

#[tokio::test]
async fn claim_achievement_adds_each_time() {
  let sc = scenario().await;
  let s = &sc.store;
  let u = user(s, "learner").await;

  const N: u32 = 4;
  for _ in 0..N {
    s.claim_achievement(u, sc.item).await.unwrap();
  }
  assert_eq!(s.score(u, sc.a).await.unwrap(), N);
  assert_eq!(s.score(u, sc.b).await.unwrap(), N);

  let rows = s.achievements(u).await.unwrap();
  assert_eq!(rows.len(), 2);
  assert!(rows.iter().all(|e| e.score == N));
  assert_eq!(rows[0].category_id, sc.a);
  assert_eq!(rows[0].category_name, "Cooking");
}

#[tokio::test]
async fn achievement_ops_require_known_user_and_item() {
  let sc = scenario().await;
  let s = &sc.store;
  assert_eq!(kind_of(s.claim_achievement(sc.e1, ItemId(999)).await), ErrorKind::NotFound);
  assert_eq!(kind_of(s.toggle_bookmark(sc.e1, ItemId(999)).await), ErrorKind::NotFound);
  assert_eq!(kind_of(s.claim_achievement(UserId(999), sc.item).await), ErrorKind::NotFound);
  assert_eq!(kind_of(s.toggle_bookmark(UserId(999), sc.item).await), ErrorKind::NotFound);
}

#[tokio::test]
async fn achieved_items_share_a_scored_category() {
  let sc = scenario().await;
  let s = &sc.store;
  let u = user(s, "learner").await;
  let owner = user(s, "owner2").await;
  let other_a = post(s, owner, &[sc.a]).await;
  let gardening = post(s, owner, &[sc.b]).await;

  assert!(s.achieved_items(u).await.unwrap().is_empty());

  s.claim_achievement(u, other_a).await.unwrap();
  let ids: Vec<_> =
    s.achieved_items(u).await.unwrap().into_iter().map(|i| i.item_id).collect();
  assert_eq!(ids, vec![other_a, sc.item]);
  assert!(!ids.contains(&gardening));
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_votes_have_one_winner() {
  let sc = scenario().await;

  let handles: Vec<_> = (0..16)
    .map(|_| {
      let s = sc.store.clone();
      let (voter, item) = (sc.e1, sc.item);
      tokio::spawn(async move { s.cast_approval(voter, item).await })
    })
    .collect();

  let mut ok = 0;
  let mut conflicts = 0;
  for h in handles {
    match h.await.unwrap() {
      Ok(_) => ok += 1,
      Err(e) if e.kind() == ErrorKind::Conflict => conflicts += 1,
      Err(e) => panic!("unexpected error: {e}"),
    }
  }
  assert_eq!((ok, conflicts), (1, 15));
  assert_eq!(sc.store.approval_count(sc.item).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_quorum_transitions_exactly_once() {
  let s = store().await;
  let owner = user(&s, "owner").await;
  let c = category(&s, "C").await;
  let item = post(&s, owner, &[c]).await;

  let mut experts = Vec::new();
  for i in 0..8 {
    let e = user(&s, &format!("expert{i}")).await;
    s.assign_expert(e, c).await.unwrap();
    experts.push(e);
  }

  let handles: Vec<_> = experts
    .into_iter()
    .map(|e| {
      let s = s.clone();
      tokio::spawn(async move { s.cast_approval(e, item).await })
    })
    .collect();

  let mut transitions = 0;
  for h in handles {
    let outcome = h.await.unwrap().unwrap();
    if outcome.transitioned {
      transitions += 1;
      assert_eq!(outcome.approval_count, QUORUM);
    }
    assert_eq!(outcome.status.is_approved(), outcome.approval_count >= QUORUM);
  }
  assert_eq!(transitions, 1);
  assert_eq!(s.approval_count(item).await.unwrap(), 8);
  assert_eq!(s.item_status(item).await.unwrap(), ItemStatus::Approved);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_toggles_serialise() {
  let sc = scenario().await;
  let u = user(&sc.store, "reader").await;

  let handles: Vec<_> = (0..2)
    .map(|_| {
      let s = sc.store.clone();
      let item = sc.item;
      tokio::spawn(async move { s.toggle_bookmark(u, item).await })
    })
    .collect();

  let mut states = Vec::new();
  for h in handles {
    states.push(h.await.unwrap().unwrap().bookmarked);
  }
  states.sort();
  assert_eq!(states, vec![false, true]);
  assert!(!sc.store.is_bookmarked(u, sc.item).await.unwrap());
  assert_eq!(sc.store.score(u, sc.a).await.unwrap(), 0);
  assert_eq!(sc.store.score(u, sc.b).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_connections_on_one_file_serialise_writes() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("lifskill.db");

  let left = SqliteStore::open(&path).await.unwrap();
  let owner = user(&left, "owner").await;
  let c = category(&left, "C").await;
  let item = post(&left, owner, &[c]).await;
  let reader = user(&left, "reader").await;
  let mut experts = Vec::new();
  for i in 0..6 {
    let e = user(&left, &format!("expert{i}")).await;
    left.assign_expert(e, c).await.unwrap();
    experts.push(e);
  }
  let right = SqliteStore::open(&path).await.unwrap();

  // Every expert votes once through each connection.
  let mut handles = Vec::new();
  for &e in &experts {
    for s in [left.clone(), right.clone()] {
      handles.push(tokio::spawn(async move { s.cast_approval(e, item).await }));
    }
  }

  let (mut ok, mut conflicts, mut transitions) = (0, 0, 0);
  for h in handles {
    match h.await.unwrap() {
      Ok(outcome) => {
        ok += 1;
        if outcome.transitioned {
          transitions += 1;
        }
      }
      Err(e) if e.kind() == ErrorKind::Conflict => conflicts += 1,
      Err(e) => panic!("unexpected error: {e}"),
    }
  }
  assert_eq!((ok, conflicts, transitions), (6, 6, 1));
  assert_eq!(right.approval_count(item).await.unwrap(), 6);
  assert_eq!(left.item_status(item).await.unwrap(), ItemStatus::Approved);

  let toggles: Vec<_> = [left.clone(), right.clone()]
    .into_iter()
    .map(|s| tokio::spawn(async move { s.toggle_bookmark(reader, item).await }))
    .collect();
  let mut states = Vec::new();
  for h in toggles {
    states.push(h.await.unwrap().unwrap().bookmarked);
  }
  states.sort();
  assert_eq!(states, vec![false, true]);
  assert_eq!(left.score(reader, c).await.unwrap(), 0);
  assert!(!right.is_bookmarked(reader, item).await.unwrap());
}
