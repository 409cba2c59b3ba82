//! Unit tests for user enrichment orchestration.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::{UserEnrichmentConfig, UserEnrichmentService, UserOutcome, fold_outcome};
use crate::domain::ports::{
    FixtureRecordSource, MockRecordSource, RecordKind, RecordSource, RecordSourceError,
    UserEnrichmentQuery,
};
use crate::domain::{
    Address, AddressSlot, ErrorDraft, ErrorKind, ErrorCode, ResponseAggregator, ResponseDto,
    User,
};

fn user_record(id: i64, name: &str, address_ids: &[i64]) -> Value {
    json!({
        "id": id,
        "name": name,
        "username": format!("user{id}"),
        "email": format!("user{id}@example.test"),
        "addressIds": address_ids,
        "phone": "555-0100",
        "website": "example.test",
        "company": { "name": "Acme" }
    })
}

fn address_record(street: &str) -> Value {
    json!({ "street": street, "suite": "Apt. 1", "city": "Gwenborough", "zipcode": "92998", "geo": {} })
}

/// Users 1..=3 with addresses 10, 11, 12; address 13 is missing upstream.
#[fixture]
fn directory() -> FixtureRecordSource {
    FixtureRecordSource::new()
        .with_record(RecordKind::User, 1, user_record(1, "Leanne", &[10, 11]))
        .with_record(RecordKind::User, 2, user_record(2, "Ervin", &[12, 13, 10]))
        .with_record(RecordKind::User, 3, user_record(3, "Clementine", &[]))
        .with_record(RecordKind::Address, 10, address_record("Kulas Light"))
        .with_record(RecordKind::Address, 11, address_record("Victor Plains"))
        .with_record(RecordKind::Address, 12, address_record("Douglas Extension"))
}

fn service(source: FixtureRecordSource) -> UserEnrichmentService {
    UserEnrichmentService::new(Arc::new(source), UserEnrichmentConfig::default())
}

fn street(response: &ResponseDto, user: usize, address: usize) -> Option<&str> {
    response.data[user].address[address]
        .as_address()
        .map(|resolved| resolved.street.as_str())
}

#[rstest]
#[tokio::test]
async fn empty_request_yields_empty_response(directory: FixtureRecordSource) {
    let response = service(directory).enrich(&[]).await;

    assert_eq!(response, ResponseDto::default());
}

#[rstest]
#[tokio::test]
async fn resolves_users_and_addresses_in_request_order(directory: FixtureRecordSource) {
    let response = service(directory).enrich(&[3, 1]).await;

    assert_eq!(response.data.len(), 2);
    assert!(response.error.is_empty());
    assert_eq!(response.data[0].name, "Clementine");
    assert_eq!(response.data[1].name, "Leanne");
    assert_eq!(street(&response, 1, 0), Some("Kulas Light"));
    assert_eq!(street(&response, 1, 1), Some("Victor Plains"));
    assert_eq!(response.data[1].address[1].as_address().map(|a| a.id), Some(11));
}

#[rstest]
#[tokio::test]
async fn missing_user_is_replaced_by_placeholder(directory: FixtureRecordSource) {
    let response = service(directory).enrich(&[1, 3, 7]).await;

    assert_eq!(response.data.len(), 3);
    assert!(response.data[2].is_placeholder());
    let matching: Vec<_> = response
        .error
        .iter()
        .filter(|record| record.path.segments() == ["2"])
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].kind, ErrorKind::NotFound);
    assert_eq!(matching[0].message, "user not found: 7");
    assert_eq!(
        response.error.len(),
        1,
        "placeholders are not validated for empty names"
    );
}

#[rstest]
#[tokio::test]
async fn missing_address_is_replaced_by_placeholder(directory: FixtureRecordSource) {
    let response = service(directory).enrich(&[2]).await;

    let slot = &response.data[0].address[1];
    assert!(slot.as_address().is_some_and(Address::is_placeholder));
    assert_eq!(street(&response, 0, 0), Some("Douglas Extension"));
    assert_eq!(street(&response, 0, 2), Some("Kulas Light"));
    assert_eq!(response.error.len(), 1);
    assert_eq!(response.error[0].path.segments(), ["0", "address", "1"]);
    assert_eq!(response.error[0].message, "user address not found: 13");
}

#[rstest]
#[tokio::test]
async fn malformed_address_reference_is_reported_not_dropped(directory: FixtureRecordSource) {
    let source = directory.with_record(
        RecordKind::User,
        8,
        json!({ "id": 8, "name": "Kurtis", "address": [10, "x", 11] }),
    );

    let response = service(source).enrich(&[1, 8]).await;

    assert_eq!(response.data.len(), 2);
    assert!(response.data[1].is_placeholder());
    assert_eq!(response.error.len(), 1);
    assert_eq!(response.error[0].path.segments(), ["1"]);
    assert_eq!(response.error[0].message, "user not found: 8");
}

#[rstest]
#[tokio::test]
async fn null_contact_fields_do_not_fail_the_lookup() {
    let source = FixtureRecordSource::new()
        .with_record(
            RecordKind::User,
            1,
            json!({ "id": 1, "name": "Leanne", "phone": null, "email": null, "addressIds": [10] }),
        )
        .with_record(RecordKind::Address, 10, address_record("Kulas Light"));

    let response = service(source).enrich(&[1]).await;

    assert!(response.error.is_empty());
    assert_eq!(response.data[0].name, "Leanne");
    assert_eq!(response.data[0].phone, "");
    assert_eq!(street(&response, 0, 0), Some("Kulas Light"));
}

#[rstest]
#[tokio::test]
async fn empty_name_is_reported_but_user_is_kept() {
    let source = FixtureRecordSource::new()
        .with_record(RecordKind::User, 4, user_record(4, "", &[20]))
        .with_record(RecordKind::Address, 20, address_record("Hoeger Mall"));

    let response = service(source).enrich(&[4]).await;

    assert_eq!(response.data[0].id, 4);
    assert_eq!(response.data[0].email, "user4@example.test");
    assert_eq!(street(&response, 0, 0), Some("Hoeger Mall"));
    assert_eq!(response.error.len(), 1);
    assert_eq!(response.error[0].kind, ErrorKind::Error);
    assert_eq!(response.error[0].message, "name not found");
    assert_eq!(response.error[0].path.segments(), ["0", "user"]);
}

#[rstest]
#[tokio::test]
async fn error_ids_follow_discovery_order(directory: FixtureRecordSource) {
    let source = directory
        .with_record(RecordKind::User, 5, user_record(5, "", &[13, 14]))
        .with_failure(
            RecordKind::User,
            6,
            RecordSourceError::transport("connection reset"),
        );

    let response = service(source).enrich(&[6, 2, 5, 9]).await;

    let summary: Vec<(usize, Vec<String>)> = response
        .error
        .iter()
        .map(|record| (record.id, record.path.segments().to_vec()))
        .collect();
    let expected: Vec<(usize, Vec<String>)> = vec![
        (0, vec!["0".into()]),
        (1, vec!["1".into(), "address".into(), "1".into()]),
        (2, vec!["2".into(), "address".into(), "0".into()]),
        (3, vec!["2".into(), "address".into(), "1".into()]),
        (4, vec!["2".into(), "user".into()]),
        (5, vec!["3".into()]),
    ];
    assert_eq!(summary, expected);
    assert!(response.has_sequential_error_ids());
    assert_eq!(response.data.len(), 4);
}

#[rstest]
#[tokio::test]
async fn repeated_runs_are_identical(directory: FixtureRecordSource) {
    let service = service(directory);

    let first = service.enrich(&[2, 8, 1]).await;
    let second = service.enrich(&[2, 8, 1]).await;

    assert_eq!(first, second);
}

#[rstest]
#[case::sequential(1, 1)]
#[case::wide(8, 8)]
#[tokio::test]
async fn concurrency_limits_do_not_change_the_result(
    directory: FixtureRecordSource,
    #[case] max_concurrent_users: usize,
    #[case] max_concurrent_addresses: usize,
) {
    let baseline = service(directory.clone()).enrich(&[1, 2, 7, 3]).await;
    let tuned = UserEnrichmentService::new(
        Arc::new(directory),
        UserEnrichmentConfig {
            max_concurrent_users,
            max_concurrent_addresses,
        },
    )
    .enrich(&[1, 2, 7, 3])
    .await;

    assert_eq!(tuned, baseline);
}

/// Answers later ids first by sleeping longer for smaller ids.
struct SkewedLatencySource {
    inner: FixtureRecordSource,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[async_trait]
impl RecordSource for SkewedLatencySource {
    async fn fetch(&self, kind: RecordKind, id: i64) -> Result<Value, RecordSourceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = u64::try_from(50 - id.min(50)).unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.fetch(kind, id).await
    }

    async fn list_ids(&self, kind: RecordKind) -> Result<Vec<i64>, RecordSourceError> {
        self.inner.list_ids(kind).await
    }
}

#[rstest]
#[tokio::test]
async fn out_of_order_completion_keeps_request_order(directory: FixtureRecordSource) {
    let source = Arc::new(SkewedLatencySource {
        inner: directory,
        in_flight: AtomicUsize::new(0),
        max_in_flight: AtomicUsize::new(0),
    });
    let service = UserEnrichmentService::new(
        Arc::clone(&source) as Arc<dyn RecordSource>,
        UserEnrichmentConfig {
            max_concurrent_users: 3,
            max_concurrent_addresses: 3,
        },
    );

    let response = service.enrich(&[1, 2, 3]).await;

    let names: Vec<&str> = response.data.iter().map(|user| user.name.as_str()).collect();
    assert_eq!(names, ["Leanne", "Ervin", "Clementine"]);
    assert_eq!(response.error[0].path.segments(), ["1", "address", "1"]);
    assert!(source.max_in_flight.load(Ordering::SeqCst) > 1);
}

#[rstest]
#[tokio::test]
async fn listed_users_are_enriched_in_directory_order(directory: FixtureRecordSource) {
    let response = service(directory)
        .enrich_listed_users()
        .await
        .expect("listing succeeds");

    let ids: Vec<i64> = response.data.iter().map(|user| user.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(response.error.len(), 1);
}

#[rstest]
#[tokio::test]
async fn listing_failure_is_fatal() {
    let mut source = MockRecordSource::new();
    source
        .expect_list_ids()
        .times(1)
        .returning(|_| Err(RecordSourceError::timeout("directory slow")));
    source.expect_fetch().times(0);
    let service = UserEnrichmentService::new(Arc::new(source), UserEnrichmentConfig::default());

    let error = service
        .enrich_listed_users()
        .await
        .expect_err("listing fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert!(error.message().contains("directory slow"));
}

#[rstest]
#[tokio::test]
async fn transport_failures_are_recovered_like_missing_records() {
    let mut source = MockRecordSource::new();
    source
        .expect_fetch()
        .returning(|kind, id| match (kind, id) {
            (RecordKind::User, 1) => Ok(user_record(1, "Leanne", &[10])),
            _ => Err(RecordSourceError::decode("truncated body")),
        });
    let service = UserEnrichmentService::new(Arc::new(source), UserEnrichmentConfig::default());

    let response = service.enrich_users(&[1, 2]).await;

    assert_eq!(response.data.len(), 2);
    assert_eq!(response.error.len(), 2);
    assert_eq!(response.error[0].message, "user address not found: 10");
    assert_eq!(response.error[1].message, "user not found: 2");
}

#[test]
fn carried_slot_errors_are_reparented_after_name_check() {
    let mut user = User::placeholder();
    user.id = 9;
    user.address = vec![
        AddressSlot::Resolved(Address::placeholder()),
        AddressSlot::Failed(ErrorDraft::address_not_found(4, 0, 13).into_record(12)),
    ];
    let mut aggregator = ResponseAggregator::default();
    aggregator.record(ErrorDraft::user_not_found(0, 2));

    fold_outcome(
        &mut aggregator,
        UserOutcome {
            index: 1,
            user,
            resolved: true,
            errors: Vec::new(),
        },
    );

    let response = aggregator.finish();
    assert_eq!(response.error.len(), 3);
    assert_eq!(response.error[1].path.segments(), ["1", "user"]);
    assert_eq!(response.error[2].id, 2);
    assert_eq!(response.error[2].path.segments(), ["1", "user", "1", "4"]);
    assert!(
        response.data[0].address[1]
            .as_address()
            .is_some_and(Address::is_placeholder)
    );
}
