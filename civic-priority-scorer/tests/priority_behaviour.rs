#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for end-to-end priority calculation.
//!
//! Scenarios run the engine against an in-memory directory so the whole
//! pipeline is exercised without network access.

use std::cell::RefCell;

use civic_priority_core::test_support::{
    QueryCall, RecordingSleeper, StaticPlacesClient, place_north_of,
};
use civic_priority_core::{
    AreaType, Coordinate, FacilityCatalog, LocationMeta, PlaceQueryError, PriorityLevel,
    PriorityRequest, PriorityResult, PrivacyLevel, RawPlace,
};
use civic_priority_scorer::{EngineConfig, PriorityEngine, PriorityError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const NEW_DELHI: (f64, f64) = (28.6139, 77.209);

/// What one scoring run produced.
#[derive(Debug)]
struct Outcome {
    scored: Result<PriorityResult, PriorityError>,
    lenient: PriorityResult,
    calls: Vec<QueryCall>,
}

type OutcomeCell = RefCell<Option<Outcome>>;

#[fixture]
fn directory() -> RefCell<StaticPlacesClient> {
    RefCell::new(StaticPlacesClient::default())
}

#[fixture]
fn request() -> RefCell<PriorityRequest> {
    RefCell::new(PriorityRequest {
        latitude: NEW_DELHI.0,
        longitude: NEW_DELHI.1,
        complaint_type: "pothole".to_owned(),
        location_meta: LocationMeta::with_privacy(PrivacyLevel::Street),
    })
}

#[fixture]
fn outcome() -> OutcomeCell {
    RefCell::new(None)
}

fn origin() -> Coordinate {
    Coordinate::new(NEW_DELHI.0, NEW_DELHI.1).expect("valid coordinate")
}

fn stock(directory: &RefCell<StaticPlacesClient>, keyword: &str, places: Vec<RawPlace>) {
    let client = directory.take().with_places(keyword, places);
    directory.replace(client);
}

fn with_outcome<T>(outcome: &OutcomeCell, check: impl FnOnce(&Outcome) -> T) -> T {
    let borrowed = outcome.borrow();
    check(borrowed.as_ref().expect("the complaint must be scored first"))
}

fn scored(outcome: &Outcome) -> &PriorityResult {
    outcome.scored.as_ref().expect("expected a scored result")
}

// --- Given steps ---

#[given("a busy street in New Delhi")]
fn busy_street(#[from(directory)] directory: &RefCell<StaticPlacesClient>) {
    let origin = origin();
    let shops = (0..45)
        .map(|i| {
            place_north_of(&origin, 100.0, &format!("Shop {i}"), &format!("s-{i}"))
                .with_types(&["store"])
        })
        .collect();
    stock(directory, "establishment", shops);
}

#[given("a hospital 600 metres away")]
fn hospital_nearby(#[from(directory)] directory: &RefCell<StaticPlacesClient>) {
    let hospital = place_north_of(&origin(), 600.0, "Lady Hardinge Hospital", "h-1")
        .with_types(&["hospital", "health"]);
    stock(directory, "hospital", vec![hospital]);
}

#[given("a transport company listed as a hospital 300 metres away")]
fn transport_as_hospital(#[from(directory)] directory: &RefCell<StaticPlacesClient>) {
    let transport = place_north_of(&origin(), 300.0, "Datta Krupa Transport", "t-1")
        .with_types(&["hospital", "point_of_interest"]);
    stock(directory, "hospital", vec![transport]);
}

#[given("a bank 200 metres away")]
fn bank_nearby(#[from(directory)] directory: &RefCell<StaticPlacesClient>) {
    let bank = place_north_of(&origin(), 200.0, "State Bank of India", "b-1").with_types(&["bank"]);
    stock(directory, "bank", vec![bank]);
}

#[given("a complaint reported at latitude 45 and longitude 10")]
fn outside_india(#[from(request)] request: &RefCell<PriorityRequest>) {
    let mut borrowed = request.borrow_mut();
    borrowed.latitude = 45.0;
    borrowed.longitude = 10.0;
}

#[given("an offline directory")]
fn offline(#[from(directory)] directory: &RefCell<StaticPlacesClient>) {
    let client = StaticPlacesClient::default()
        .failing_everything(PlaceQueryError::transient("connection refused"));
    directory.replace(client);
}

#[given("a directory without credentials")]
fn unconfigured(#[from(directory)] directory: &RefCell<StaticPlacesClient>) {
    let client = directory.take().unconfigured();
    directory.replace(client);
}

// --- When steps ---

#[when("the complaint is scored")]
fn score(
    #[from(directory)] directory: &RefCell<StaticPlacesClient>,
    #[from(request)] request: &RefCell<PriorityRequest>,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    let engine = PriorityEngine::with_sleeper(
        directory.take(),
        FacilityCatalog::default(),
        EngineConfig::default(),
        RecordingSleeper::default(),
    );
    let request = request.borrow();
    let scored = engine.try_calculate(&request);
    let calls = engine.client().calls();
    let lenient = engine.calculate(&request);
    *outcome.borrow_mut() = Some(Outcome {
        scored,
        lenient,
        calls,
    });
}

// --- Then steps ---

#[then("the area is classified as urban")]
fn urban(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        let result = scored(o);
        assert_eq!(result.area_type, AreaType::Urban);
        assert_eq!(result.search_radius, 1200);
    });
}

#[then("the hospital type scores above zero")]
fn hospital_scores(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        let hospital = &scored(o).per_type["hospital"];
        assert_eq!(hospital.count, 1);
        assert!(hospital.score > 0.0, "hospital scored {}", hospital.score);
    });
}

#[then("the reasoning mentions the hospital")]
fn reasoning_mentions_hospital(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        let result = scored(o);
        assert!(
            result.reasoning.contains("Lady Hardinge Hospital (hospital)"),
            "unexpected reasoning: {}",
            result.reasoning
        );
        assert!(result.recommendation_reason.contains("hospital within 600 m"));
    });
}

#[then("the priority score is banded consistently")]
fn banded(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        let result = scored(o);
        assert!((0.0..=1.0).contains(&result.priority_score));
        assert_eq!(
            result.priority_level,
            PriorityLevel::from_score(result.priority_score)
        );
        assert!(result.error.is_none());
    });
}

#[then("no hospital is counted")]
fn no_hospital(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        let hospital = &scored(o).per_type["hospital"];
        assert_eq!(hospital.count, 0);
        assert_eq!(hospital.score, 0.0);
        assert!(hospital.top_candidates.is_empty());
    });
}

#[then("the coordinate is rejected")]
fn coordinate_rejected(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        assert!(
            matches!(o.scored, Err(PriorityError::InvalidCoordinate(_))),
            "expected an invalid coordinate, got {:?}",
            o.scored
        );
    });
}

#[then("no directory queries are issued")]
fn no_queries(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| assert!(o.calls.is_empty(), "calls: {:?}", o.calls));
}

#[then("every facility query is reported as failed")]
fn all_failed(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        assert!(
            matches!(
                &o.scored,
                Err(PriorityError::AllQueriesFailed {
                    last: PlaceQueryError::TransientNetwork { .. }
                })
            ),
            "expected every query to fail, got {:?}",
            o.scored
        );
    });
}

#[then("the default medium priority is returned")]
fn default_medium(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        assert_eq!(o.lenient.priority_score, 0.5);
        assert_eq!(o.lenient.priority_level, PriorityLevel::Medium);
        assert!(o.lenient.is_fallback());
        assert_eq!(o.lenient.area_type, AreaType::Unknown);
    });
}

#[then("the hospital type scores zero")]
fn hospital_zero(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        let hospital = &scored(o).per_type["hospital"];
        assert_eq!(hospital.score, 0.0);
        assert!(hospital.error.is_none());
    });
}

#[then("the bank type scores above zero")]
fn bank_scores(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        let result = scored(o);
        assert!(result.per_type["bank"].score > 0.0);
        assert_eq!(result.critical_facilities.len(), 1);
        assert_eq!(result.critical_facilities[0].facility_type, "bank");
    });
}

#[then("a configuration error is reported")]
fn configuration_error(#[from(outcome)] outcome: &OutcomeCell) {
    with_outcome(outcome, |o| {
        let err = o.scored.as_ref().expect_err("expected a configuration error");
        assert_eq!(err.kind(), "configuration");
        let info = o.lenient.error.as_ref().expect("fallback info");
        assert_eq!(info.kind, "configuration");
    });
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/priority.feature", name = $title)]
        fn $fn_name(
            directory: RefCell<StaticPlacesClient>,
            request: RefCell<PriorityRequest>,
            outcome: OutcomeCell,
        ) {
            let _ = (directory, request, outcome);
        }
    };
}

register_scenario!(scoring_near_hospital, "scoring a pothole near a hospital");
register_scenario!(
    ignoring_transport_companies,
    "ignoring transport companies listed as hospitals"
);
register_scenario!(
    rejecting_out_of_area,
    "rejecting a location outside the service area"
);
register_scenario!(falling_back_when_offline, "falling back when every query fails");
register_scenario!(
    isolating_empty_type,
    "isolating a facility type with no results"
);
register_scenario!(
    falling_back_when_unconfigured,
    "falling back when the directory is unconfigured"
);
