mod test_utils;

use komawari_error::OracleErrorKind;
use komawari_pipeline::{FALLBACK_NOTE, PADDING_NOTE, plot_variants};
use serde_json::json;
use test_utils::MockOracle;

const PASSAGE: &str = "The lamp flickered. She did not move.";

#[tokio::test]
async fn short_answers_are_padded() {
    let oracle = MockOracle::new_success(
        json!([
            {"variant": "The lamp guttered; she stayed still.", "note": "concise"},
            {"note": "missing variant"}
        ])
        .to_string(),
    );
    let variants = plot_variants(&oracle, PASSAGE, "noir", 3).await.unwrap();

    assert_eq!(variants.len(), 3);
    assert_eq!(variants[0].variant, "The lamp guttered; she stayed still.");
    assert_eq!(variants[0].note, "concise");
    assert_eq!(variants[1].variant, PASSAGE);
    assert_eq!(variants[2].variant, PASSAGE);
    assert_eq!(variants[2].note, PADDING_NOTE);

    let request = &oracle.requests()[0];
    assert!(request.messages()[1].content().contains("noir"));
    assert!(request.messages()[1].content().contains("Write 3"));
}

#[tokio::test]
async fn long_answers_are_truncated() {
    let records: Vec<_> = (0..5)
        .map(|i| json!({"variant": format!("v{}", i), "note": "n"}))
        .collect();
    let oracle = MockOracle::new_success(serde_json::Value::from(records).to_string());
    let variants = plot_variants(&oracle, PASSAGE, "", 2).await.unwrap();
    let texts: Vec<_> = variants.iter().map(|v| v.variant.as_str()).collect();
    assert_eq!(texts, vec!["v0", "v1"]);
}

#[tokio::test]
async fn unusable_answers_return_the_original() {
    for oracle in [
        MockOracle::new_success("I would rather not."),
        MockOracle::new_error(OracleErrorKind::Timeout(60)),
    ] {
        let variants = plot_variants(&oracle, PASSAGE, "", 3).await.unwrap();
        assert_eq!(variants.len(), 3);
        assert!(variants.iter().all(|v| v.variant == PASSAGE));
        assert!(variants.iter().all(|v| v.note == FALLBACK_NOTE));
    }
}

#[tokio::test]
async fn credential_rejection_is_propagated() {
    let oracle = MockOracle::new_error(OracleErrorKind::Unauthorized {
        status_code: 401,
        message: "bad key".to_string(),
    });
    let err = plot_variants(&oracle, PASSAGE, "", 3).await.unwrap_err();
    assert!(err.is_fatal());
}

#[tokio::test]
async fn zero_count_yields_nothing() {
    let oracle = MockOracle::new_success("[]");
    assert!(plot_variants(&oracle, PASSAGE, "", 0).await.unwrap().is_empty());
}
