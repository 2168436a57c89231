use rugpull_risk::application::ml::scorer::run_scoring;
use rugpull_risk::application::ml::trainer::{TrainingOptions, run_training};
use rugpull_risk::application::ml::{BoostingParams, RiskPredictor, ScoredRecord};
use rugpull_risk::domain::ml::FEATURE_COLUMNS;
use rugpull_risk::infrastructure::persistence::load_model;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;

fn write_dataset(path: &Path, n: usize) {
    let mut lines = Vec::with_capacity(n);
    for i in 0..n {
        let rugged = i % 4 == 0;
        let record = if rugged {
            json!({
                "t": 1_700_000_000 + i,
                "address": format!("RUG{i}"),
                "name": format!("Rugged {i}"),
                "score": 0.2,
                "priceImpactPct": 12.5,
                "rugRisk": {"score": 85, "holdersPct": 92.0, "liquidityUsd": 900.0},
                "volatility": {"rangePct": 40.0},
                "rug_label": 1
            })
        } else {
            // Every third safe token has no rugRisk block at all.
            let mut record = json!({
                "t": 1_700_000_000 + i,
                "address": format!("OK{i}"),
                "name": format!("Solid {i}"),
                "score": 0.8,
                "priceImpactPct": 0.4,
                "volatility": {"rangePct": 5.0, "chopPct": 0.2},
                "signal": {"score": 0.6},
                "momentum": {"score": 0.5, "pctShort": 1.0, "pctLong": 3.0},
                "rug_label": 0
            });
            if i % 3 != 0 {
                record["rugRisk"] =
                    json!({"score": 15, "holdersPct": 30.0, "liquidityUsd": 250000.0});
            }
            record
        };
        lines.push(record.to_string());
    }
    fs::write(path, lines.join("\n") + "\n").unwrap();
}

fn options() -> TrainingOptions {
    TrainingOptions {
        params: BoostingParams {
            n_estimators: 25,
            learning_rate: 0.2,
            max_depth: 3,
            min_samples_leaf: 3,
        },
        ..TrainingOptions::default()
    }
}

#[test]
fn test_persisted_model_reproduces_test_partition_scores() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("rugpull_samples.jsonl");
    let model_out = dir.path().join("artifacts/rugpull_model.joblib");
    let metrics_out = dir.path().join("metrics.json");
    write_dataset(&data, 80);

    let outcome = run_training(&data, &model_out, &metrics_out, &options()).unwrap();
    assert_eq!(outcome.metrics.train_rows, 64);
    assert_eq!(outcome.metrics.test_rows, 16);

    let restored = load_model(&model_out).unwrap();
    restored.ensure_compatible().unwrap();
    let reloaded = restored.predict_proba(&outcome.test_rows).unwrap();

    assert_eq!(reloaded.len(), outcome.test_probabilities.len());
    for (a, b) in reloaded.iter().zip(outcome.test_probabilities.iter()) {
        assert!((a - b).abs() < 1e-9, "reloaded {a} vs trained {b}");
    }
}

#[test]
fn test_metrics_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("samples.jsonl");
    let model_out = dir.path().join("model.joblib");
    let metrics_out = dir.path().join("metrics.json");
    write_dataset(&data, 40);

    run_training(&data, &model_out, &metrics_out, &options()).unwrap();

    let metrics: Value = serde_json::from_str(&fs::read_to_string(&metrics_out).unwrap()).unwrap();
    assert!(metrics["auc"].is_f64());
    assert_eq!(metrics["train_rows"], 32);
    assert_eq!(metrics["test_rows"], 8);

    let features: Vec<&str> = metrics["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(features, FEATURE_COLUMNS.to_vec());

    let report = &metrics["report"];
    for key in ["0", "1", "macro avg", "weighted avg"] {
        assert!(report[key]["precision"].is_number(), "missing {key}");
        assert!(report[key]["f1-score"].is_number(), "missing {key}");
    }
    assert_eq!(report["1"]["support"], 2);
    assert!(report["accuracy"].is_number());
}

#[test]
fn test_scoring_emits_one_line_per_record_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let train_data = dir.path().join("train.jsonl");
    let model_out = dir.path().join("model.joblib");
    let metrics_out = dir.path().join("metrics.json");
    write_dataset(&train_data, 60);
    run_training(&train_data, &model_out, &metrics_out, &options()).unwrap();

    let score_data = dir.path().join("unlabeled.jsonl");
    fs::write(
        &score_data,
        [
            json!({
                "t": 1,
                "address": "A",
                "name": "first",
                "score": 0.2,
                "rugRisk": {"score": 85}
            }),
            json!({"address": "B"}),
            json!({"t": 3, "name": "third", "score": 0.8, "signal": {"score": 0.6}}),
        ]
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n"),
    )
    .unwrap();

    let out = dir.path().join("scores/out.jsonl");
    let scored = run_scoring(&score_data, &model_out, &out).unwrap();
    assert_eq!(scored.len(), 3);

    let written: Vec<ScoredRecord> = fs::read_to_string(&out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(written, scored);

    assert_eq!(written[0].address, json!("A"));
    assert_eq!(written[1].t, Value::Null);
    assert_eq!(written[1].name, Value::Null);
    assert_eq!(written[2].name, json!("third"));
    for record in &written {
        assert!((0.0..=1.0).contains(&record.model_score));
    }
}
