use super::*;
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

fn record(store: &str) -> PriceRecord {
    PriceRecord {
        store: store.to_owned(),
        address: "RUA UM, 10".to_owned(),
        date: "01/08/2026".to_owned(),
        price: "R$ 5,99".to_owned(),
    }
}

#[test]
fn classify_non_empty_records_as_success() {
    let outcome = classify(Ok(vec![record("MERCADO A"), record("MERCADO B")]));
    match outcome {
        ExtractionOutcome::Success { records } => {
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].store, "MERCADO A");
        }
        other => panic!("expected Success, got: {other:?}"),
    }
}

#[test]
fn classify_zero_records_as_empty_result_never_success() {
    let outcome = classify(Ok(Vec::new()));
    assert_eq!(outcome, ExtractionOutcome::EmptyResult);
}

#[test]
fn classify_fault_as_failure_with_its_description() {
    let fault = FetchError::Navigation {
        url: "https://example.invalid".to_owned(),
        reason: "net::ERR_NAME_NOT_RESOLVED".to_owned(),
    };
    let expected = fault.to_string();
    let outcome = classify(Err(fault));
    assert_eq!(outcome, ExtractionOutcome::Failure { message: expected });
}

// ---------------------------------------------------------------------------
// drive
// ---------------------------------------------------------------------------

/// Fake session returning a fixed set of harvested rows.
struct StaticSession {
    rows: Vec<Vec<String>>,
}

#[async_trait]
impl PortalSession for StaticSession {
    async fn navigate(&self, _url: &str) -> Result<(), FetchError> {
        Ok(())
    }

    async fn harvest(&self) -> Result<Vec<Vec<String>>, FetchError> {
        Ok(self.rows.clone())
    }

    async fn close(self) -> Result<(), FetchError> {
        Ok(())
    }
}

fn raw_row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| (*c).to_owned()).collect()
}

#[tokio::test]
async fn drive_maps_harvested_rows_past_the_header() {
    let session = StaticSession {
        rows: vec![
            raw_row(&["Estabelecimento", "Endereço", "Data", "Preço"]),
            raw_row(&["MERCADO A", "RUA UM, 10", "01/08/2026", "R$ 5,99"]),
        ],
    };

    let records = drive(&session, "7898080641699", &FetchOptions::default())
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].store, "MERCADO A");
}

#[tokio::test]
async fn drive_rejects_empty_barcode_before_navigating() {
    let session = StaticSession { rows: Vec::new() };
    let result = drive(&session, "", &FetchOptions::default()).await;
    assert!(
        matches!(result, Err(FetchError::EmptyBarcode)),
        "expected EmptyBarcode, got: {result:?}"
    );
}

/// Fake session whose navigation never completes.
struct HangingSession;

#[async_trait]
impl PortalSession for HangingSession {
    async fn navigate(&self, _url: &str) -> Result<(), FetchError> {
        std::future::pending::<()>().await;
        Ok(())
    }

    async fn harvest(&self) -> Result<Vec<Vec<String>>, FetchError> {
        Ok(Vec::new())
    }

    async fn close(self) -> Result<(), FetchError> {
        Ok(())
    }
}

#[tokio::test]
async fn drive_times_out_a_navigation_that_never_settles() {
    let options = FetchOptions {
        navigation_timeout: Duration::from_millis(20),
        ..FetchOptions::default()
    };

    let result = drive(&HangingSession, "7898080641699", &options).await;
    match result {
        Err(FetchError::NavigationTimeout { timeout }) => {
            assert_eq!(timeout, Duration::from_millis(20));
        }
        other => panic!("expected NavigationTimeout, got: {other:?}"),
    }
}
