//! End-to-end tests running full batches through the pipeline.

use rowsift::config::PipelineConfig;
use rowsift::core::{RawRow, RawValue};
use rowsift::pipeline::Pipeline;
use rowsift::report::{accepted_rows, rejection_rows, summary_rows};
use rowsift::schema::{FieldConstraint, FieldSpec, FieldType};
use rowsift::transform::{BandingConfig, TransformConfig, Transformer};
use chrono::NaiveDate;

/// Schema modelled on a feeding log: timestamp, volume, feed kind, free note.
fn feeding_log_config() -> PipelineConfig {
    PipelineConfig::new(
        vec![
            FieldSpec::required("logged_at", FieldType::Timestamp).with_constraint(
                FieldConstraint::DateRange {
                    min: NaiveDate::from_ymd_opt(2024, 1, 1)
                        .unwrap()
                        .and_hms_opt(0, 0, 0),
                    max: NaiveDate::from_ymd_opt(2024, 12, 31)
                        .unwrap()
                        .and_hms_opt(23, 59, 59),
                },
            ),
            FieldSpec::required("volume_ml", FieldType::Number).with_constraint(
                FieldConstraint::Range {
                    min: Some(0.0),
                    max: Some(500.0),
                },
            ),
            FieldSpec::required("kind", FieldType::Text).with_constraint(FieldConstraint::OneOf {
                values: vec!["Bottle".to_string(), "Breast".to_string()],
                case_insensitive: true,
            }),
            FieldSpec::optional("note", FieldType::Text)
                .with_constraint(FieldConstraint::NonEmpty),
        ],
        TransformConfig::new("logged_at")
            .with_metric("volume_ml")
            .with_banding(BandingConfig {
                field: "volume_ml".to_string(),
                edges: vec![60.0, 120.0],
                labels: vec![
                    "small".to_string(),
                    "medium".to_string(),
                    "large".to_string(),
                ],
            }),
    )
}

fn row(timestamp: &str, volume: &str, kind: &str) -> RawRow {
    RawRow::new()
        .with("logged_at", RawValue::text(timestamp))
        .with("volume_ml", RawValue::text(volume))
        .with("kind", RawValue::text(kind))
}

#[test]
fn test_mixed_batch_partitions_with_full_explanations() {
    let pipeline = Pipeline::new(feeding_log_config()).unwrap();
    let result = pipeline
        .run(vec![
            row("2024-03-05 09:00:00", "100", "bottle"),
            row("2024-03-05 12:30:00", "nine hundred", "snack"), // two violations
            row("2024-03-06 08:15:00", "80", "Breast"),
            row("not a date", "", "Bottle"), // bad timestamp, missing volume
        ])
        .unwrap();

    assert_eq!(result.accepted().len(), 2);
    assert_eq!(result.rejected().len(), 2);

    let accepted: Vec<usize> = result.accepted().iter().map(|r| r.index()).collect();
    assert_eq!(accepted, vec![0, 2]);

    let first = &result.rejected()[0];
    assert_eq!(first.index(), 1);
    assert_eq!(first.violations().len(), 2);
    let fields: Vec<&str> = first.violations().iter().map(|v| v.field.as_str()).collect();
    assert!(fields.contains(&"volume_ml"));
    assert!(fields.contains(&"kind"));

    let second = &result.rejected()[1];
    assert_eq!(second.index(), 3);
    assert_eq!(second.violations().len(), 2);

    let metrics = result.metrics();
    assert_eq!(metrics.input_rows, 4);
    assert_eq!(metrics.violations, 4);
    assert_eq!(metrics.acceptance_rate(), 50.0);
}

#[test]
fn test_case_insensitive_set_values_are_canonicalized() {
    let pipeline = Pipeline::new(feeding_log_config()).unwrap();
    let result = pipeline
        .run(vec![row("2024-03-05 09:00:00", "100", "BOTTLE")])
        .unwrap();

    assert_eq!(result.accepted()[0].text("kind"), Some("Bottle"));
}

#[test]
fn test_timestamp_formats_normalize_to_one_representation() {
    let pipeline = Pipeline::new(feeding_log_config()).unwrap();
    let result = pipeline
        .run(vec![
            row("2024-03-05", "100", "Bottle"),
            row("05/03/2024", "100", "Bottle"),
            row("2024-03-05 00:00:00", "100", "Bottle"),
        ])
        .unwrap();

    assert_eq!(result.accepted().len(), 3);
    let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    for record in result.accepted() {
        assert_eq!(record.timestamp("logged_at"), Some(expected));
    }
    // All three land in the same daily group.
    assert_eq!(result.summary().daily.len(), 1);
    assert_eq!(result.summary().daily[0].count, 3);
}

#[test]
fn test_unknown_column_is_a_violation_not_a_crash() {
    let pipeline = Pipeline::new(feeding_log_config()).unwrap();
    let result = pipeline
        .run(vec![
            row("2024-03-05 09:00:00", "100", "Bottle").with("mood", RawValue::text("sleepy")),
        ])
        .unwrap();

    assert_eq!(result.rejected().len(), 1);
    assert_eq!(result.rejected()[0].violations()[0].field, "mood");
}

#[test]
fn test_date_range_bound_is_enforced() {
    let pipeline = Pipeline::new(feeding_log_config()).unwrap();
    let result = pipeline
        .run(vec![row("2023-12-31 09:00:00", "100", "Bottle")])
        .unwrap();

    assert_eq!(result.rejected().len(), 1);
    assert_eq!(result.rejected()[0].violations()[0].field, "logged_at");
}

#[test]
fn test_summary_tables_cover_days_and_weeks() {
    let pipeline = Pipeline::new(feeding_log_config()).unwrap();
    let result = pipeline
        .run(vec![
            row("2024-03-05 09:00:00", "100", "Bottle"),
            row("2024-03-05 15:00:00", "60", "Breast"),
            row("2024-03-06 09:00:00", "90", "Bottle"),
            row("2024-03-25 09:00:00", "110", "Bottle"),
        ])
        .unwrap();

    let summary = result.summary();
    let days: Vec<&str> = summary.daily.iter().map(|d| d.period.as_str()).collect();
    assert_eq!(days, vec!["2024-03-05", "2024-03-06", "2024-03-25"]);

    let march_5 = &summary.daily[0];
    assert_eq!(march_5.count, 2);
    let stats = &march_5.metrics["volume_ml"];
    assert_eq!(stats.sum, 160.0);
    assert_eq!(stats.mean, 80.0);
    assert_eq!(stats.min, 60.0);
    assert_eq!(stats.max, 100.0);

    let weeks: Vec<&str> = summary.weekly.iter().map(|w| w.period.as_str()).collect();
    assert_eq!(weeks, vec!["2024-W10", "2024-W13"]);
    assert_eq!(summary.weekly[0].count, 3);
}

#[test]
fn test_banding_labels_on_transformed_records() {
    let config = feeding_log_config();
    let transform = config.transform.clone();
    let pipeline = Pipeline::new(config).unwrap();
    let result = pipeline
        .run(vec![
            row("2024-03-05 09:00:00", "40", "Bottle"),
            row("2024-03-05 10:00:00", "100", "Bottle"),
            row("2024-03-05 11:00:00", "300", "Bottle"),
        ])
        .unwrap();
    assert_eq!(result.accepted().len(), 3);

    let transformer = Transformer::new(transform, pipeline.schema()).unwrap();
    let analytical = transformer.transform_all(result.accepted()).unwrap();
    let bands: Vec<Option<&str>> = analytical.iter().map(|r| r.band.as_deref()).collect();
    assert_eq!(
        bands,
        vec![Some("small"), Some("medium"), Some("large")]
    );
    assert_eq!(analytical[0].week_label, "2024-W10");
}

#[test]
fn test_export_rows_mirror_the_result() {
    let pipeline = Pipeline::new(feeding_log_config()).unwrap();
    let result = pipeline
        .run(vec![
            row("2024-03-05 09:00:00", "100", "Bottle"),
            row("2024-03-05 10:00:00", "900", "Bottle"),
        ])
        .unwrap();

    let accepted = accepted_rows(&result);
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0]["volume_ml"], "100");
    assert_eq!(accepted[0]["note"], "");

    let rejections = rejection_rows(&result);
    assert_eq!(rejections.len(), 1);
    assert_eq!(rejections[0].total_errors, 1);
    assert_eq!(rejections[0].values["volume_ml"], "900");
    assert!(rejections[0].error_details.contains("volume_ml"));

    let flattened = summary_rows(&result.summary().daily);
    assert!(flattened
        .iter()
        .any(|r| r.metric == "records" && r.statistic == "count" && r.value == 1.0));
}

#[test]
fn test_result_serializes_and_round_trips() {
    let pipeline = Pipeline::new(feeding_log_config()).unwrap();
    let result = pipeline
        .run(vec![row("2024-03-05 09:00:00", "100", "Bottle")])
        .unwrap();

    let json = result.to_json_pretty().unwrap();
    let parsed: rowsift::core::PipelineResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);

    let human = result.to_human().unwrap();
    assert!(human.contains("all 1 rows passed validation"));
}

#[test]
fn test_config_from_json_builds_a_working_pipeline() {
    let config = PipelineConfig::from_json(
        r#"{
            "schema": [
                {"name": "logged_at", "type": "timestamp"},
                {"name": "volume_ml", "type": "number",
                 "constraints": [{"rule": "range", "min": 0.0, "max": 500.0}]}
            ],
            "transform": {
                "timestamp_field": "logged_at",
                "metric_fields": ["volume_ml"]
            }
        }"#,
    )
    .unwrap();
    let pipeline = Pipeline::new(config).unwrap();

    let result = pipeline
        .run(vec![RawRow::new()
            .with("logged_at", RawValue::text("2024-03-05 09:00:00"))
            .with("volume_ml", RawValue::number(120.0))])
        .unwrap();
    assert!(result.is_fully_accepted());
}

#[test]
fn test_duplicate_rows_are_both_accepted() {
    let pipeline = Pipeline::new(feeding_log_config()).unwrap();
    let result = pipeline
        .run(vec![
            row("2024-03-05 09:00:00", "100", "Bottle"),
            row("2024-03-05 09:00:00", "100", "Bottle"),
        ])
        .unwrap();

    assert_eq!(result.accepted().len(), 2);
    assert_eq!(result.summary().daily[0].count, 2);
}
