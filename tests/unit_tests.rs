// Unit tests for Zodiac Match

use zodiac_match::core::{
    distance::affinity_distance,
    matcher::{AffinityMatcher, MatcherError},
    scoring::{ScoringError, ScoringModel, WeightedScoringModel},
    zodiac::{classify, date_range, ZodiacError},
};
use zodiac_match::models::{
    AffinityScore, Answers, Identity, SelfMatchPolicy, Submission, ZodiacSign,
};
use chrono::Utc;

fn create_submission(id: i64, alq: f64) -> Submission {
    Submission {
        id,
        identity: Identity {
            name: format!("User {}", id),
            phone: format!("555-{:04}", id),
            insta: format!("@user{}", id),
        },
        answers: Answers {
            month: 11,
            day: 25,
            sex: "F".to_string(),
            sexorient: "S".to_string(),
            degree: "5".to_string(),
            sociability: "3".to_string(),
            acqmark: "1".to_string(),
        },
        zodiac_sign: ZodiacSign::Sagittarius,
        affinity_score: AffinityScore::new(alq).unwrap(),
        created_at: Utc::now(),
    }
}

fn score(v: f64) -> AffinityScore {
    AffinityScore::new(v).unwrap()
}

#[test]
fn test_every_sign_reachable_from_its_own_range() {
    for sign in ZodiacSign::ALL {
        let range = date_range(sign);
        assert_eq!(classify(range.start_month, range.start_day).unwrap(), sign);
        assert_eq!(classify(range.end_month, range.end_day).unwrap(), sign);
    }
}

#[test]
fn test_classify_rejects_out_of_table_dates() {
    assert_eq!(
        classify(13, 1),
        Err(ZodiacError::InvalidDate { month: 13, day: 1 })
    );
    assert!(classify(6, 31).is_err());
}

#[test]
fn test_distance_zero_for_equal_scores() {
    assert_eq!(affinity_distance(score(1.3), score(1.3)), 0.0);
}

#[test]
fn test_find_closest_prefers_earlier_on_tie() {
    let matcher = AffinityMatcher::default();
    let candidates = vec![
        create_submission(10, 1.0),
        create_submission(11, 3.0),
        create_submission(12, 1.0),
    ];

    let found = matcher.find_closest(score(2.0), &candidates).unwrap();
    assert_eq!(found.id, 10);
}

#[test]
fn test_find_closest_empty_store() {
    let matcher = AffinityMatcher::new(SelfMatchPolicy::Include);
    assert_eq!(
        matcher.find_closest(score(0.0), &[]).unwrap_err(),
        MatcherError::NoCandidates
    );
}

#[test]
fn test_self_match_property() {
    let matcher = AffinityMatcher::new(SelfMatchPolicy::Include);
    let mut candidates: Vec<Submission> =
        (1..=5).map(|i| create_submission(i, i as f64)).collect();
    let newcomer = create_submission(6, 2.5);
    candidates.push(newcomer.clone());

    let found = matcher.find_match(&newcomer, &candidates).unwrap();
    assert_eq!(found.id, newcomer.id);
}

#[test]
fn test_weighted_model_rejects_bad_shape() {
    let model = WeightedScoringModel::default();
    let answers = Answers {
        month: 11,
        day: 25,
        sex: "F".to_string(),
        sexorient: "S".to_string(),
        degree: "".to_string(),
        sociability: "3".to_string(),
        acqmark: "1".to_string(),
    };

    let result = model.evaluate(&answers.with_zodiac(ZodiacSign::Sagittarius));
    assert!(matches!(
        result,
        Err(ScoringError::InvalidField { field: "degree", .. })
    ));
}

#[test]
fn test_weighted_model_async_and_sync_agree() {
    let model = WeightedScoringModel::default();
    let answers = Answers {
        month: 3,
        day: 21,
        sex: "M".to_string(),
        sexorient: "G".to_string(),
        degree: "2".to_string(),
        sociability: "4".to_string(),
        acqmark: "0".to_string(),
    };
    let questionnaire = answers.with_zodiac(ZodiacSign::Aries);

    let via_trait = tokio_test::block_on(model.score(&questionnaire)).unwrap();
    assert_eq!(via_trait, model.evaluate(&questionnaire).unwrap());
}
