mod common;

use std::{fs, sync::Arc};

use districtscope::{
    AppConfig, CensusPoints, Command, DistrictType, Error, HttpClient, Outcome, Result, Session, ShapefileLoader,
};

fn read_view(dir: &std::path::Path) -> String {
    fs::read_to_string(dir.join("view.svg")).unwrap()
}

/// Canned responses for both geocoding endpoints.
struct CannedHttp;

impl HttpClient for CannedHttp {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        let body = if url.contains("civicinfo") {
            r#"{"divisions": {
                "ocd-division/country:us": {},
                "ocd-division/country:us/state:tx": {},
                "ocd-division/country:us/state:tx/cd:10": {},
                "ocd-division/country:us/state:tx/sldl:47": {},
                "ocd-division/country:us/state:tx/sldu:14": {}
            }}"#
        } else {
            r#"{"results": [{"geometry": {"location": {"lat": 30.25, "lng": -97.75}}}], "status": "OK"}"#
        };
        Ok(body.as_bytes().to_vec())
    }
}

fn open(dir: &std::path::Path, api_key: Option<&str>) -> Session {
    common::write_all(dir);
    let mut config = AppConfig::default();
    config.data_dir = dir.to_path_buf();
    config.geocode.api_key = api_key.map(str::to_string);
    config.shade.width = 120;
    config.shade.height = 68;

    let points = CensusPoints::new(
        vec![-10_880_000.0, -10_881_000.0, -10_870_000.0],
        vec![3_537_000.0, 3_538_000.0, 3_536_000.0],
        vec![0, 3, 1],
    ).unwrap();
    Session::new(
        &config,
        Arc::new(ShapefileLoader::new(dir)),
        Arc::new(points),
        Arc::new(CannedHttp),
        dir.join("view.svg"),
    ).unwrap()
}

#[test]
fn render_writes_the_initial_view() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), None);

    let outcome = session.handle(Command::Render).unwrap();
    assert_eq!(outcome, Outcome::Rendered(dir.path().join("view.svg")));

    let svg = read_view(dir.path());
    assert!(svg.contains(r#"data-type="us_house""#));
    assert!(svg.contains("World_Imagery/MapServer/tile/"));
    assert_eq!(svg.matches(r#"class="dist""#).count(), 4);
    assert!(svg.contains(r#"data-district="CA-10""#));
}

#[test]
fn selecting_a_type_rerenders_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), None);

    assert_eq!(session.handle(Command::SelectType(DistrictType::StateHouse)).unwrap(), Outcome::Updated);
    assert!(read_view(dir.path()).contains(r#"data-type="state_house""#));

    assert_eq!(session.handle(Command::SelectType(DistrictType::StateHouse)).unwrap(), Outcome::Unchanged);
}

#[test]
fn submitted_address_focuses_its_district() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), Some("test-key"));
    session.handle(Command::SelectType(DistrictType::StateHouse)).unwrap();

    match session.handle(Command::SubmitAddress("1100 Congress Ave, Austin TX".into())).unwrap() {
        Outcome::Located { district, location, .. } => {
            assert_eq!(district.to_string(), "TX-47");
            assert_eq!((location.lat, location.lon), (30.25, -97.75));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(session.explorer().focus(), Some("TX-047"));

    let svg = read_view(dir.path());
    assert!(svg.contains(r#"class="focus" data-district="TX-047""#));
}

#[test]
fn nationwide_address_lookup_stays_in_its_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), Some("test-key"));
    assert_eq!(session.explorer().district_type(), DistrictType::UsHouse);

    let display = match session.handle(Command::SubmitAddress("1100 Congress Ave, Austin TX".into())).unwrap() {
        Outcome::Located { district, display, .. } => {
            assert_eq!(district.to_string(), "TX-10");
            display
        }
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(session.explorer().focus(), Some("TX-10"));
    assert!(session.explorer().extent().contains(&display), "focused extent misses the geocoded address");

    let svg = read_view(dir.path());
    assert!(svg.contains(r#"class="focus" data-district="TX-10""#));
    assert!(svg.contains(r#"class="dist" data-district="CA-10""#));
}

#[test]
fn repeated_district_numbers_need_a_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), None);

    assert!(matches!(
        session.handle(Command::FocusDistrict("10".into())),
        Err(Error::AmbiguousDistrict { count: 2, .. })
    ));
    assert!(matches!(session.handle(Command::FocusDistrict("".into())), Err(Error::InvalidDistrict(_))));
    assert_eq!(session.explorer().focus(), None);

    assert_eq!(session.handle(Command::FocusDistrict("CA-10".into())).unwrap(), Outcome::Updated);
    assert_eq!(session.explorer().focus(), Some("CA-10"));
}

#[test]
fn focusing_writes_the_view_without_an_explicit_render() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), None);
    assert!(!dir.path().join("view.svg").exists());

    assert_eq!(session.handle(Command::FocusDistrict("TX-10".into())).unwrap(), Outcome::Updated);
    assert!(read_view(dir.path()).contains(r#"class="focus" data-district="TX-10""#));
}

#[test]
fn commands_wait_for_a_pending_type_switch() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), Some("test-key"));

    session.request_type(DistrictType::StateSenate);
    match session.handle(Command::SubmitAddress("1100 Congress Ave, Austin TX".into())).unwrap() {
        Outcome::Located { district, .. } => assert_eq!(district.to_string(), "TX-14"),
        other => panic!("unexpected outcome {other:?}"),
    }

    assert!(!session.is_loading());
    assert_eq!(session.explorer().district_type(), DistrictType::StateSenate);
    assert_eq!(session.explorer().focus(), Some("TX-14"));
    // Nothing left to land that could clear the focus.
    assert!(!session.poll().unwrap());
    assert_eq!(session.explorer().focus(), Some("TX-14"));
}

#[test]
fn reset_after_a_pending_switch_frames_the_new_type() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), None);
    session.handle(Command::FocusDistrict("TX-25".into())).unwrap();

    session.request_type(DistrictType::StateHouse);
    session.handle(Command::Reset).unwrap();

    assert_eq!(session.explorer().district_type(), DistrictType::StateHouse);
    assert_eq!(session.explorer().focus(), None);
    assert!(read_view(dir.path()).contains(r#"data-type="state_house""#));
}

#[test]
fn address_lookup_needs_an_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), None);

    let result = session.handle(Command::SubmitAddress("somewhere".into()));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn errors_keep_the_session_usable() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path(), None);
    let before = session.explorer().state().clone();

    assert!(matches!(
        session.handle(Command::SelectType(DistrictType::County)),
        Err(Error::UnknownDistrictType(_))
    ));
    assert!(matches!(
        session.handle(Command::FocusDistrict("99".into())),
        Err(Error::DistrictNotFound { .. })
    ));
    assert_eq!(*session.explorer().state(), before);

    assert_eq!(session.handle(Command::FocusDistrict("25".into())).unwrap(), Outcome::Updated);
    assert_eq!(session.handle(Command::Reset).unwrap(), Outcome::Updated);
    assert_eq!(session.handle(Command::Reset).unwrap(), Outcome::Unchanged);
}
