use crate::analyzer::test::fixture::{png_bytes, Fixture};
use crate::analyzer::{assemble_result, softmax, to_confidence, SUGGESTION};
use crate::catalog::{IncidentType, Severity};
use crate::error::AnalyzeError;

fn scores_with_max_at(index: usize) -> Vec<f32> {
    let mut scores = vec![0.0; IncidentType::ALL.len()];
    scores[index] = 5.0;
    scores
}

#[test]
fn returns_primary_and_two_alternatives_in_descending_order() {
    let f = Fixture::with_image_scores(vec![
        5.0, 1.0, 0.5, 0.0, -0.5, -1.0, -1.5, -2.0, -2.5, -3.0,
    ]);

    let result = f.analyzer.analyze_image(&png_bytes()).unwrap();

    assert_eq!(result.incident_type, IncidentType::Pothole);
    assert_eq!(result.alternatives.len(), 2);
    assert_eq!(result.alternatives[0].incident_type, IncidentType::Garbage);
    assert_eq!(
        result.alternatives[1].incident_type,
        IncidentType::Streetlight
    );
    assert!(result.confidence > result.alternatives[0].confidence);
    assert!(result.alternatives[0].confidence > result.alternatives[1].confidence);
    assert_eq!(result.suggestion, SUGGESTION);
}

#[test]
fn probabilities_sum_to_one_across_the_full_catalog() {
    let probabilities = softmax(&[5.0, 1.0, 0.5, 0.0, -0.5, -1.0, -1.5, -2.0, -2.5, -3.0]);
    let sum: f64 = probabilities.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(probabilities.iter().all(|&p| p >= 0.0));
}

#[test]
fn softmax_subtracts_row_max_before_exponentiating() {
    let probabilities = softmax(&[1000.0, 999.0, 998.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert!(probabilities.iter().all(|p| p.is_finite()));
    let sum: f64 = probabilities.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

#[test]
fn identical_bytes_yield_identical_results() {
    let f = Fixture::with_image_scores(scores_with_max_at(2));
    let bytes = png_bytes();

    let first = f.analyzer.analyze_image(&bytes).unwrap();
    let second = f.analyzer.analyze_image(&bytes).unwrap();

    assert_eq!(first, second);
}

#[test]
fn non_image_bytes_are_a_decode_error_not_a_panic() {
    let f = Fixture::with_image_scores(scores_with_max_at(0));

    for bytes in [Vec::new(), vec![0xFF, 0xD8, 0xFF], b"not an image".to_vec()] {
        let result = f.analyzer.analyze_image(&bytes);
        assert!(matches!(result, Err(AnalyzeError::ImageDecode(_))));
    }
}

#[test]
fn reported_type_follows_the_score_index() {
    let f = Fixture::with_image_scores(scores_with_max_at(4));

    let result = f.analyzer.analyze_image(&png_bytes()).unwrap();

    assert_eq!(result.incident_type, IncidentType::ALL[4]);
    assert_eq!(result.incident_type, IncidentType::Flooding);
}

#[test]
fn confidence_rounds_half_up_to_two_decimals() {
    assert_eq!(to_confidence(0.123456), 12.35);
    assert_eq!(to_confidence(0.125), 12.50);
    assert_eq!(to_confidence(0.0), 0.0);
    assert_eq!(to_confidence(1.0), 100.0);
}

#[test]
fn end_to_end_with_stub_scores() {
    let mut scores = vec![0.0; IncidentType::ALL.len()];
    scores[0] = 5.0;
    scores[1] = 1.0;
    let f = Fixture::with_image_scores(scores.clone());

    let result = f.analyzer.analyze_image(&png_bytes()).unwrap();

    let probabilities = softmax(&scores);
    assert_eq!(result.incident_type, IncidentType::Pothole);
    assert_eq!(result.confidence, to_confidence(probabilities[0]));
    assert_eq!(result.alternatives[0].incident_type, IncidentType::Garbage);
    assert_eq!(
        result.alternatives[0].confidence,
        to_confidence(probabilities[1])
    );
    // The remaining eight scores tie at zero, so index 2 wins the second slot.
    assert_eq!(
        result.alternatives[1].incident_type,
        IncidentType::Streetlight
    );
}

#[test]
fn ties_resolve_to_the_lower_catalog_index() {
    let f = Fixture::with_image_scores(vec![1.0; IncidentType::ALL.len()]);

    let result = f.analyzer.analyze_image(&png_bytes()).unwrap();

    assert_eq!(result.incident_type, IncidentType::Pothole);
    assert_eq!(result.alternatives[0].incident_type, IncidentType::Garbage);
    assert_eq!(
        result.alternatives[1].incident_type,
        IncidentType::Streetlight
    );
}

#[test]
fn a_single_candidate_yields_no_alternatives() {
    let result = assemble_result(&[(IncidentType::Flooding, 1.0)]);

    assert_eq!(result.incident_type, IncidentType::Flooding);
    assert_eq!(result.confidence, 100.0);
    assert!(result.alternatives.is_empty());
    assert_eq!(result.suggestion, SUGGESTION);
}

#[test]
fn two_candidates_yield_one_alternative() {
    let result = assemble_result(&[
        (IncidentType::Garbage, 0.75),
        (IncidentType::Pothole, 0.25),
    ]);

    assert_eq!(result.incident_type, IncidentType::Garbage);
    assert_eq!(result.alternatives.len(), 1);
    assert_eq!(result.alternatives[0].incident_type, IncidentType::Pothole);
    assert_eq!(result.alternatives[0].confidence, 25.0);
}

#[test]
fn alternatives_are_capped_at_two() {
    let result = assemble_result(&[
        (IncidentType::Pothole, 0.4),
        (IncidentType::Garbage, 0.3),
        (IncidentType::Streetlight, 0.2),
        (IncidentType::Flooding, 0.1),
    ]);

    assert_eq!(result.alternatives.len(), 2);
    assert_eq!(result.alternatives[0].incident_type, IncidentType::Garbage);
    assert_eq!(
        result.alternatives[1].incident_type,
        IncidentType::Streetlight
    );
}

#[test]
fn score_count_mismatch_is_a_consistency_error() {
    let f = Fixture::with_image_scores(vec![0.0; 9]);

    let result = f.analyzer.analyze_image(&png_bytes());

    assert!(matches!(
        result,
        Err(AnalyzeError::CatalogConsistency {
            expected: 10,
            got: 9
        })
    ));
}

#[test]
fn model_failure_is_propagated_as_inference_error() {
    let f = Fixture::failing("device fault");

    let result = f.analyzer.analyze_image(&png_bytes());

    assert!(matches!(result, Err(AnalyzeError::ModelInference(_))));
}

#[test]
fn non_finite_scores_are_an_inference_error() {
    let mut scores = vec![0.0; IncidentType::ALL.len()];
    scores[3] = f32::NAN;
    let f = Fixture::with_image_scores(scores);

    let result = f.analyzer.analyze_image(&png_bytes());

    assert!(matches!(result, Err(AnalyzeError::ModelInference(_))));
}

#[test]
fn result_serializes_with_the_exact_field_layout() {
    let f = Fixture::with_image_scores(scores_with_max_at(0));

    let result = f.analyzer.analyze_image(&png_bytes()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["incident_type"], "pothole");
    assert!(json["confidence"].is_number());
    assert_eq!(json["alternatives"].as_array().unwrap().len(), 2);
    assert!(json["alternatives"][0]["type"].is_string());
    assert!(json["alternatives"][0]["confidence"].is_number());
    assert_eq!(json["suggestion"], SUGGESTION);
}

#[test]
fn text_analysis_reports_category_and_severity() {
    let mut category_scores = vec![0.0; IncidentType::ALL.len()];
    category_scores[3] = 4.0;
    let severity_scores = vec![0.0, 1.0, 3.0];
    let f = Fixture::with_text_responses(vec![category_scores.clone(), severity_scores]);

    let result = f.analyzer.analyze_text("the road surface is cracked open").unwrap();

    assert_eq!(result.issue_type, IncidentType::RoadDamage);
    assert_eq!(result.severity, Severity::High);
    let probabilities = softmax(&category_scores);
    assert_eq!(result.confidence, to_confidence(probabilities[3]));
}

#[test]
fn blank_text_is_rejected() {
    let f = Fixture::with_text_responses(vec![]);

    for text in ["", "   ", "\n\t"] {
        let result = f.analyzer.analyze_text(text);
        assert!(matches!(result, Err(AnalyzeError::ModelInference(_))));
    }
}
