use citizen_connect::capabilities::{
    CameraOutput, CapturedPhoto, Coordinates, GeolocationOperation, LocationError, TimerKind,
    TimerOperation, TimerOutput,
};
use citizen_connect::clock::{ManualClock, SharedClock, UnixTimeMs};
use citizen_connect::model::{ComplaintStatus, Screen, Tab};
use citizen_connect::view::ScreenView;
use citizen_connect::{App, Effect, Event, Model};
use crux_core::testing::AppTester;
use crux_core::Request;
use std::sync::Arc;

type Tester = AppTester<App, Effect>;

fn signed_in(app: &Tester) -> Model {
    sign_in(app, Model::default())
}

fn sign_in(app: &Tester, mut model: Model) -> Model {
    app.update(Event::PhoneChanged { value: "9876543210".into() }, &mut model);
    let update = app.update(Event::PhoneSubmitted, &mut model);
    let send = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Timer(r) => match r.operation {
                TimerOperation::Start { id, .. } => Some(id),
                TimerOperation::Cancel { .. } => None,
            },
            _ => None,
        })
        .unwrap();
    app.update(Event::TimerFired { id: send, output: TimerOutput::Elapsed }, &mut model);
    let code = model.login.generated_otp().unwrap().expose().to_string();
    app.update(Event::OtpChanged { value: code }, &mut model);
    assert_eq!(model.nav.screen(), Screen::Home);
    model
}

fn geolocation(effects: Vec<Effect>) -> Request<GeolocationOperation> {
    effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Geolocation(r) => Some(r),
            _ => None,
        })
        .expect("position requested")
}

fn is_start(operation: &TimerOperation, kind: TimerKind) -> bool {
    matches!(operation, TimerOperation::Start { id, .. } if id.kind == kind)
}

fn started_timer(effects: Vec<Effect>, kind: TimerKind) -> Option<Request<TimerOperation>> {
    effects.into_iter().find_map(|e| match e {
        Effect::Timer(r) if is_start(&r.operation, kind) => Some(r),
        _ => None,
    })
}

/// Opens the form for `category`, resolves a position fix and returns the
/// pending reverse-lookup delay.
fn pending_fix(
    app: &Tester,
    model: &mut Model,
    category: &str,
    position: Coordinates,
) -> Request<TimerOperation> {
    app.update(Event::CategorySelected { category_id: category.into() }, model);
    let mut request = geolocation(app.update(Event::DetectLocationRequested, model).effects);
    let update = app.resolve(&mut request, Ok(position)).unwrap();
    update
        .events
        .into_iter()
        .find_map(|event| {
            started_timer(app.update(event, model).effects, TimerKind::LocationDetect)
        })
        .expect("lookup delay started")
}

#[test]
fn filed_complaint_leads_status_tracking() {
    let app = Tester::default();
    let mut model = signed_in(&app);

    app.update(Event::CategorySelected { category_id: "water".into() }, &mut model);
    assert_eq!(model.nav.screen(), Screen::RaiseComplaint);
    assert_eq!(model.form.complaint_type, "Water Supply");

    app.update(
        Event::DescriptionChanged { value: "No water since 3 days".into() },
        &mut model,
    );
    app.update(Event::LocationChanged { value: "Ward 12".into() }, &mut model);
    app.update(Event::ComplaintSubmitted, &mut model);

    assert_eq!(model.nav.screen(), Screen::StatusTracking);
    let filed = &model.nav.complaints().all()[0];
    assert_eq!(filed.id().as_str(), "CMP-0001");
    assert_eq!(filed.complaint_type, "Water Supply");
    assert_eq!(filed.status, ComplaintStatus::Received);
    assert_eq!(model.nav.expanded(), Some(filed.id()));
    assert!(model.form.description.is_empty(), "form is cleared after filing");

    match app.view(&model).screen {
        ScreenView::StatusTracking { complaints } => {
            assert_eq!(complaints.len(), 1);
            assert!(complaints[0].is_expanded);
            assert_eq!(complaints[0].stages[0].note.as_deref(), Some("Active Stage"));
        }
        other => panic!("unexpected screen {other:?}"),
    }

    app.update(Event::TabSelected { tab: Tab::Home }, &mut model);
    match app.view(&model).screen {
        ScreenView::Home { recent, .. } => {
            assert_eq!(recent[0].id, "CMP-0001");
            assert_eq!(recent[0].status, "Received");
        }
        other => panic!("unexpected screen {other:?}"),
    }
}

#[test]
fn complaint_is_stamped_with_submission_time() {
    let app = Tester::default();
    let clock = Arc::new(ManualClock::at(UnixTimeMs(1_767_225_600_000)));
    let mut model = sign_in(&app, Model::with_clock(SharedClock::new(Arc::clone(&clock))));

    app.update(Event::TabSelected { tab: Tab::Report }, &mut model);
    app.update(Event::TypeChanged { value: "Garbage".into() }, &mut model);
    app.update(Event::DescriptionChanged { value: "Bin overflowing".into() }, &mut model);
    app.update(Event::LocationChanged { value: "Ward 12".into() }, &mut model);

    clock.advance_ms(90_000);
    app.update(Event::ComplaintSubmitted, &mut model);

    let filed = &model.nav.complaints().all()[0];
    assert_eq!(filed.timestamp(), UnixTimeMs(1_767_225_690_000));
    assert_eq!(filed.complaint_type, "Garbage");
}

#[test]
fn incomplete_complaint_is_not_filed() {
    let app = Tester::default();
    let mut model = signed_in(&app);

    app.update(Event::TabSelected { tab: Tab::Report }, &mut model);
    app.update(Event::TypeChanged { value: "Roads".into() }, &mut model);
    app.update(Event::DescriptionChanged { value: "   ".into() }, &mut model);
    app.update(Event::LocationChanged { value: "Ward 12".into() }, &mut model);
    app.update(Event::ComplaintSubmitted, &mut model);

    assert_eq!(model.nav.screen(), Screen::RaiseComplaint);
    assert!(model.nav.complaints().is_empty());
}

#[test]
fn detected_location_fills_after_delay() {
    let app = Tester::default();
    let mut model = signed_in(&app);
    app.update(Event::CategorySelected { category_id: "roads".into() }, &mut model);

    let update = app.update(Event::DetectLocationRequested, &mut model);
    assert!(model.form.is_locating());
    let mut request = geolocation(update.effects);

    let position = Coordinates::new(20.937_41, 77.779_64).unwrap();
    let update = app.resolve(&mut request, Ok(position)).unwrap();
    let mut delay = None;
    for event in update.events {
        delay = started_timer(app.update(event, &mut model).effects, TimerKind::LocationDetect);
    }
    assert!(model.form.is_locating());

    let update = app.resolve(&mut delay.unwrap(), TimerOutput::Elapsed).unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }
    assert!(!model.form.is_locating());
    assert_eq!(
        model.form.location,
        "Lat: 20.9374, Lng: 77.7796 (Ward 12, Market Area)"
    );
}

#[test]
fn denied_location_uses_ward_fallback() {
    let app = Tester::default();
    let mut model = signed_in(&app);
    app.update(Event::CategorySelected { category_id: "garbage".into() }, &mut model);

    let mut request = geolocation(app.update(Event::DetectLocationRequested, &mut model).effects);
    let update = app
        .resolve(&mut request, Err(LocationError::PermissionDenied))
        .unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }
    assert!(!model.form.is_locating());
    assert_eq!(model.form.location, "Ward 12, Market Area");
}

#[test]
fn delay_from_abandoned_form_does_not_finish_new_lookup() {
    let app = Tester::default();
    let mut model = signed_in(&app);

    let old = pending_fix(&app, &mut model, "garbage", Coordinates::new(10.0, 2.0).unwrap());
    let TimerOperation::Start { id: old_id, .. } = old.operation else {
        panic!("expected a timer start");
    };

    let update = app.update(Event::ComplaintCancelled, &mut model);
    let cancelled = update.effects.iter().any(|e| {
        matches!(e, Effect::Timer(r) if r.operation == TimerOperation::Cancel { id: old_id })
    });
    assert!(cancelled, "leaving the form cancels its pending delay");

    let mut live = pending_fix(&app, &mut model, "roads", Coordinates::new(20.0, 1.0).unwrap());
    assert!(!matches!(live.operation, TimerOperation::Start { id, .. } if id == old_id));

    app.update(Event::TimerFired { id: old_id, output: TimerOutput::Elapsed }, &mut model);
    assert!(model.form.is_locating());
    assert!(model.form.location.is_empty());

    let update = app.resolve(&mut live, TimerOutput::Elapsed).unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }
    assert!(!model.form.is_locating());
    assert_eq!(model.form.location, "Lat: 20.0000, Lng: 1.0000 (Ward 12, Market Area)");
}

#[test]
fn reply_for_abandoned_form_is_dropped() {
    let app = Tester::default();
    let mut model = signed_in(&app);
    app.update(Event::CategorySelected { category_id: "garbage".into() }, &mut model);
    let mut request = geolocation(app.update(Event::DetectLocationRequested, &mut model).effects);

    app.update(Event::ComplaintCancelled, &mut model);
    app.update(Event::CategorySelected { category_id: "roads".into() }, &mut model);

    let update = app
        .resolve(&mut request, Err(LocationError::Unavailable))
        .unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }
    assert_eq!(model.form.complaint_type, "Roads");
    assert!(model.form.location.is_empty());
}

#[test]
fn photo_is_attached_to_filed_complaint() {
    let app = Tester::default();
    let mut model = signed_in(&app);
    app.update(Event::CategorySelected { category_id: "streetlights".into() }, &mut model);

    let update = app.update(Event::PhotoRequested, &mut model);
    let mut request = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Camera(r) => Some(r),
            _ => None,
        })
        .expect("photo requested");

    let photo = CapturedPhoto {
        data_url: "data:image/png;base64,iVBORw0KGgo=".into(),
        mime_type: "image/png".into(),
        file_size: 8,
    };
    let update = app.resolve(&mut request, Ok(CameraOutput::Photo(photo))).unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }
    assert!(model.form.photo().is_some());

    app.update(Event::DescriptionChanged { value: "Lamp out".into() }, &mut model);
    app.update(Event::LocationChanged { value: "Main road".into() }, &mut model);
    app.update(Event::ComplaintSubmitted, &mut model);

    assert!(model.nav.complaints().all()[0].photo.is_some());
}

#[test]
fn status_cards_toggle_one_at_a_time() {
    let app = Tester::default();
    let mut model = signed_in(&app);

    for (category, text) in [("garbage", "Bin overflowing"), ("roads", "Pothole")] {
        app.update(Event::CategorySelected { category_id: category.into() }, &mut model);
        app.update(Event::DescriptionChanged { value: text.into() }, &mut model);
        app.update(Event::LocationChanged { value: "Ward 12".into() }, &mut model);
        app.update(Event::ComplaintSubmitted, &mut model);
        app.update(Event::BackRequested, &mut model);
    }

    app.update(Event::ViewAllRequested, &mut model);
    let newest = model.nav.complaints().all()[0].id().clone();
    let oldest = model.nav.complaints().all()[1].id().clone();
    assert_eq!(model.nav.expanded(), Some(&newest));

    app.update(Event::ComplaintToggled { id: oldest.clone() }, &mut model);
    assert_eq!(model.nav.expanded(), Some(&oldest));

    app.update(Event::ComplaintToggled { id: oldest }, &mut model);
    assert_eq!(model.nav.expanded(), None);
}

#[test]
fn form_input_is_ignored_elsewhere() {
    let app = Tester::default();
    let mut model = signed_in(&app);

    let update = app.update(Event::DetectLocationRequested, &mut model);
    assert!(!update
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Geolocation(_))));
    assert!(!model.form.is_locating());
}
