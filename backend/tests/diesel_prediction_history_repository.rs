//! Integration tests for `DieselPredictionHistoryRepository` against a
//! temporary SQLite database.

use chrono::{DateTime, TimeZone, Utc};
use placement_backend::domain::ports::PredictionHistoryRepository;
use placement_backend::domain::{
    Confidence, DataHash, LabelCount, NewPredictionRecord, PlacementLabel, RawForm,
    TransactionId, Username,
};
use placement_backend::outbound::persistence::DieselPredictionHistoryRepository;
use rstest::{fixture, rstest};

mod support;

use support::{TempDatabase, complete_form, username};

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_760_000_000 + seconds, 0)
        .single()
        .expect("valid timestamp")
}

fn new_record(
    owner: &Username,
    form: RawForm,
    label: PlacementLabel,
    created_at: DateTime<Utc>,
) -> NewPredictionRecord {
    let data_hash = DataHash::compute(owner, &form);
    let transaction_id =
        TransactionId::parse(&format!("0x{data_hash}")).expect("hash-shaped transaction id");
    NewPredictionRecord {
        username: owner.clone(),
        form,
        data_hash,
        transaction_id,
        label,
        confidence: Confidence::new(0.75).expect("valid confidence"),
        created_at,
    }
}

#[fixture]
fn repository() -> (TempDatabase, DieselPredictionHistoryRepository) {
    let database = TempDatabase::migrated();
    let repo = DieselPredictionHistoryRepository::new(database.connector.clone());
    (database, repo)
}

#[rstest]
#[tokio::test]
async fn inserted_record_round_trips_snapshot(
    repository: (TempDatabase, DieselPredictionHistoryRepository),
) {
    let (_db, repo) = repository;
    let alice = username("alice");
    let new = new_record(&alice, complete_form(), PlacementLabel::Placed, at(0));

    let stored = repo.insert(&new).await.expect("insert succeeds");
    assert_eq!(stored.username, alice);
    assert_eq!(stored.user_input, new.form);
    assert_eq!(stored.data_hash, new.data_hash);
    assert_eq!(stored.prediction, PlacementLabel::Placed);
    assert_eq!(stored.timestamp, at(0));
    assert!(stored.verify().matches);

    let found = repo
        .find_for_user(&alice, stored.id)
        .await
        .expect("lookup succeeds");
    assert_eq!(found, Some(stored));
}

#[rstest]
#[tokio::test]
async fn list_is_newest_first_and_scoped_to_owner(
    repository: (TempDatabase, DieselPredictionHistoryRepository),
) {
    let (_db, repo) = repository;
    let alice = username("alice");
    let bob = username("bob");
    let form = complete_form();

    let first = repo
        .insert(&new_record(&alice, form.clone(), PlacementLabel::Placed, at(0)))
        .await
        .expect("insert");
    let tied = repo
        .insert(&new_record(&alice, form.clone(), PlacementLabel::NotPlaced, at(10)))
        .await
        .expect("insert");
    let latest_tie = repo
        .insert(&new_record(&alice, form.clone(), PlacementLabel::Placed, at(10)))
        .await
        .expect("insert");
    repo.insert(&new_record(&bob, form, PlacementLabel::Placed, at(20)))
        .await
        .expect("insert");

    let ids: Vec<i32> = repo
        .list_for_user(&alice)
        .await
        .expect("list succeeds")
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec![latest_tie.id, tied.id, first.id]);
}

#[rstest]
#[tokio::test]
async fn records_of_other_users_are_not_found(
    repository: (TempDatabase, DieselPredictionHistoryRepository),
) {
    let (_db, repo) = repository;
    let stored = repo
        .insert(&new_record(
            &username("alice"),
            complete_form(),
            PlacementLabel::Placed,
            at(0),
        ))
        .await
        .expect("insert");

    let found = repo
        .find_for_user(&username("mallory"), stored.id)
        .await
        .expect("lookup succeeds");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
async fn counts_are_grouped_by_label(
    repository: (TempDatabase, DieselPredictionHistoryRepository),
) {
    let (_db, repo) = repository;
    let alice = username("alice");
    for (offset, label) in [
        PlacementLabel::Placed,
        PlacementLabel::NotPlaced,
        PlacementLabel::Placed,
    ]
    .into_iter()
    .enumerate()
    {
        let seconds = i64::try_from(offset).expect("small offset");
        repo.insert(&new_record(&alice, complete_form(), label, at(seconds)))
            .await
            .expect("insert");
    }

    let mut counts = repo.count_by_label(&alice).await.expect("count succeeds");
    counts.sort_by_key(|count| count.label.as_str());
    assert_eq!(
        counts,
        vec![
            LabelCount {
                label: PlacementLabel::NotPlaced,
                count: 1,
            },
            LabelCount {
                label: PlacementLabel::Placed,
                count: 2,
            },
        ]
    );

    let empty = repo
        .count_by_label(&username("bob"))
        .await
        .expect("count succeeds");
    assert!(empty.is_empty());
}
