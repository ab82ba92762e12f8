//! Integration tests for the full classification run.
//!
//! These tests drive the public API end to end:
//! 1. Parse the export text
//! 2. Classify each record (sport, grounded technologies)
//! 3. Extract PICO population and outcomes
//! 4. Serialize the output rows

use std::time::Duration;

use article_extraction::{
    testing::MockModel, ExtractionError, OutputRow, Pipeline, PipelineConfig, ReplyFormat,
    Vocabularies,
};
use futures::StreamExt;

const GPS_EXPORT: &str = "TI Effects of GPS tracking on soccer performance\nAB This study examines GPS technology in elite soccer players.\nPY 2021\nUT WOS:000123456789012\nER\n\n";

/// Helper to build one export record.
fn export_record(title: &str, abstract_text: &str, year: &str, accession: &str) -> String {
    format!("TI {title}\nAB {abstract_text}\nPY {year}\nUT {accession}\nER\n\n")
}

/// Helper to set up a pipeline with scripted replies for the GPS article.
fn gps_pipeline(config: PipelineConfig) -> Pipeline<MockModel> {
    let model = MockModel::new()
        .with_classification_reply(
            "Effects of GPS tracking",
            r#"Here is my answer: {"sport": "Soccer", "technology": "GPS, Drones"} Hope it helps."#,
        )
        .with_pico_reply(
            "Effects of GPS tracking",
            r#"{"population": "Elite", "outcome": ["Performance", "Workload"]}"#,
        );

    Pipeline::with_config(model, Vocabularies::builtin(), config)
}

#[tokio::test]
async fn test_end_to_end_gps_article() {
    let pipeline = gps_pipeline(PipelineConfig::default());

    let rows = pipeline.run(GPS_EXPORT).await.unwrap();

    assert_eq!(
        rows,
        vec![OutputRow {
            identifier: "WOS:000123456789012".into(),
            title: "Effects of GPS tracking on soccer performance".into(),
            year: "2021".into(),
            sport: "Soccer".into(),
            population: "Elite".into(),
            technology: vec!["GPS".into()],
            outcome: vec!["Performance".into(), "Workload".into()],
        }]
    );

    let serialized = rows[0].to_serialized();
    assert_eq!(
        serialized.values(),
        [
            "WOS:000123456789012",
            "Effects of GPS tracking on soccer performance",
            "2021",
            "Soccer",
            "Elite",
            r#"["GPS"]"#,
            r#"["Performance","Workload"]"#,
        ]
    );
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let first = gps_pipeline(PipelineConfig::default())
        .run(GPS_EXPORT)
        .await
        .unwrap();
    let second = gps_pipeline(PipelineConfig::default())
        .run(GPS_EXPORT)
        .await
        .unwrap();

    let encode = |rows: &[OutputRow]| {
        rows.iter()
            .map(|r| serde_json::to_string(&r.to_serialized()).unwrap())
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(encode(&first), encode(&second));
}

#[tokio::test]
async fn test_mixed_export_keeps_order_and_defaults() {
    let mut export = String::from("FN Clarivate Analytics Web of Science\nVR 1.0\n");
    export.push_str(&export_record(
        "Rowing ergometer pacing",
        "Accelerometer data from club rowers.",
        "2019",
        "WOS:000000000000101",
    ));
    // No title: contributes no row
    export.push_str("AB Orphan abstract\nPY 2018\nER\n\n");
    export.push_str(&export_record(
        "Chess and cognition",
        "Grandmasters were observed.",
        "19x",
        "no accession here",
    ));
    export.push_str("EF\n");

    let model = MockModel::new()
        .with_classification_reply(
            "Rowing ergometer",
            r#"{"sport": "Rowing", "technology": ["Accelerometer", "GPS"]}"#,
        )
        .with_classification_reply(
            "Chess and cognition",
            r#"{"sport": "Chess", "technology": "None"}"#,
        )
        .with_pico_reply(
            "Rowing ergometer",
            r#"{"population": "Amateur", "outcome": "Performance"}"#,
        );
    let pipeline = Pipeline::with_config(
        model,
        Vocabularies::builtin(),
        PipelineConfig::new().with_concurrency(2),
    );

    let rows = pipeline.run(&export).await.unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].title, "Rowing ergometer pacing");
    assert_eq!(rows[0].sport, "Rowing");
    assert_eq!(rows[0].technology, vec!["Accelerometer"]);
    assert_eq!(rows[0].population, "Amateur");

    assert_eq!(rows[1].title, "Chess and cognition");
    assert_eq!(rows[1].identifier, "Unknown");
    assert_eq!(rows[1].year, "Unknown");
    assert_eq!(rows[1].sport, "None");
    assert_eq!(rows[1].technology, vec!["None"]);
    assert_eq!(rows[1].population, "None");
    assert_eq!(rows[1].outcome, vec!["None"]);
}

#[tokio::test]
async fn test_order_preserved_when_later_records_finish_first() {
    let titles: Vec<String> = (0..8).map(|i| format!("Study number {i} on cycling")).collect();
    let export: String = titles
        .iter()
        .enumerate()
        .map(|(i, t)| export_record(t, "Cyclists rode.", "2020", &format!("WOS:{:015}", i)))
        .collect();

    // Earlier records are slower than later ones
    let mut model = MockModel::new();
    for i in 0..8u64 {
        model = model.with_delay(
            format!("Study number {i} "),
            Duration::from_millis((8 - i) * 15),
        );
    }
    let pipeline = Pipeline::with_config(
        model,
        Vocabularies::builtin(),
        PipelineConfig::new().with_concurrency(4),
    );

    let rows = pipeline.run(&export).await.unwrap();

    let got: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(got, titles.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(pipeline.model().peak_in_flight() <= 4);
    assert_eq!(pipeline.model().calls().len(), 16);
}

#[tokio::test]
async fn test_model_failure_aborts_whole_batch() {
    let export = [
        export_record("Golf putting", "Putting study.", "2017", "WOS:000000000000001"),
        export_record("Tennis serve", "Serve study.", "2018", "WOS:000000000000002"),
        export_record("Judo throws", "Throw study.", "2019", "WOS:000000000000003"),
    ]
    .concat();

    let model = MockModel::new().failing_on("Tennis serve");
    let pipeline = Pipeline::new(model, Vocabularies::builtin());

    let result = pipeline.run(&export).await;
    assert!(matches!(result, Err(ExtractionError::Model(_))));
}

#[tokio::test]
async fn test_stream_yields_rows_before_failure() {
    let export = [
        export_record("Golf putting", "Putting study.", "2017", "WOS:000000000000001"),
        export_record("Tennis serve", "Serve study.", "2018", "WOS:000000000000002"),
    ]
    .concat();

    let model = MockModel::new().failing_on("Tennis serve");
    let pipeline = Pipeline::new(model, Vocabularies::builtin());

    let mut stream = pipeline.run_stream(&export);
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.title, "Golf putting");
    assert!(stream.next().await.unwrap().is_err());
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_legacy_reply_format_end_to_end() {
    let model = MockModel::new()
        .with_classification_reply(
            "Effects of GPS tracking",
            "| Short Title | Sport | Year | Technology |\n| --- | --- | --- | --- |\n| GPS in soccer | {Soccer} | 2021 | {GPS} |",
        )
        .with_pico_reply(
            "Effects of GPS tracking",
            "**P:** Elite soccer players\n**I:** GPS tracking\n**C:** None\n**O:** Performance",
        );
    let pipeline = Pipeline::with_config(
        model,
        Vocabularies::builtin(),
        PipelineConfig::new().with_reply_format(ReplyFormat::Legacy),
    );

    let rows = pipeline.run(GPS_EXPORT).await.unwrap();
    assert_eq!(rows[0].sport, "Soccer");
    assert_eq!(rows[0].technology, vec!["GPS"]);
    assert_eq!(rows[0].population, "Elite soccer players");
    assert_eq!(rows[0].outcome, vec!["Performance"]);
}

#[tokio::test]
async fn test_custom_vocabularies() {
    let vocabularies = Vocabularies::from_json(
        r#"{"sports": ["Association Football"], "technologies": ["GPS"], "populations": [], "outcomes": []}"#,
    )
    .unwrap();

    let model = MockModel::new().with_classification_reply(
        "GPS",
        r#"{"sport": "Association Football", "technology": "GPS"}"#,
    );
    let pipeline = Pipeline::new(model, vocabularies);

    let rows = pipeline.run(GPS_EXPORT).await.unwrap();
    assert_eq!(rows[0].sport, "Association Football");

    let prompt = &pipeline.model().calls()[0].prompt;
    assert!(prompt.contains("Association Football"));
}
