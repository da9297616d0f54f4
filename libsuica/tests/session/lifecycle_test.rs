#[path = "../common/mod.rs"]
mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use libsuica::card::DetectedTag;
use libsuica::session::{
    EventKind, ScanConfig, ScanState, SessionController, SessionEvent, SessionId, Transition,
};
use libsuica::test_support::{HardwareCall, RecordingHardware, history_read, suica_tag};
use libsuica::{Error, HardwareError, KeyVersion, ReadResponse};
use proptest::prelude::*;

type Controller = SessionController<RecordingHardware>;

fn counting_start(ctl: &mut Controller, hits: &Arc<Mutex<usize>>) -> Option<SessionId> {
    let hits = hits.clone();
    ctl.start_scan(move |_| *hits.lock().unwrap() += 1).ok()
}

#[test]
fn full_attempt_then_fresh_attempt() {
    common::helpers::init_logger();
    let hw = RecordingHardware::new();
    let mut ctl = SessionController::new(hw.clone(), ScanConfig::default());
    let hits = Arc::new(Mutex::new(0));

    for _ in 0..2 {
        let id = counting_start(&mut ctl, &hits).unwrap();
        let steps = [
            EventKind::TagsDetected(vec![DetectedTag::felica(suica_tag(1))]),
            EventKind::Connected(Ok(())),
            EventKind::ServiceResponded(Ok(vec![KeyVersion::new(1)])),
            EventKind::ReadCompleted(Ok(history_read())),
        ];
        let mut last = Transition::Ignored;
        for kind in steps {
            last = ctl.handle(SessionEvent::new(id, kind));
        }
        assert!(matches!(last, Transition::Terminated(Ok(_))));
        assert_eq!(ctl.state(), ScanState::Idle);
    }

    assert_eq!(*hits.lock().unwrap(), 2);
    let begins: Vec<_> = hw
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            HardwareCall::Begin { session, .. } => Some(session),
            _ => None,
        })
        .collect();
    assert_eq!(begins, vec![SessionId::new(1), SessionId::new(2)]);
}

#[test]
fn status_flag_failure_is_never_decoded() {
    let hw = RecordingHardware::new();
    let mut ctl = SessionController::new(hw.clone(), ScanConfig::default());
    let hits = Arc::new(Mutex::new(0));
    let id = counting_start(&mut ctl, &hits).unwrap();

    ctl.handle(SessionEvent::new(
        id,
        EventKind::TagsDetected(vec![DetectedTag::felica(suica_tag(1))]),
    ));
    ctl.handle(SessionEvent::new(id, EventKind::Connected(Ok(()))));
    ctl.handle(SessionEvent::new(
        id,
        EventKind::ServiceResponded(Ok(vec![KeyVersion::new(1)])),
    ));
    // Blocks present but status1 set: the blocks must not be decoded.
    let mut read = history_read();
    read.status1 = 0x01;
    let t = ctl.handle(SessionEvent::new(id, EventKind::ReadCompleted(Ok(read))));

    assert_eq!(
        t,
        Transition::Terminated(Err(Error::StatusFlagsAbnormal {
            status1: 0x01,
            status2: 0x00
        }))
    );
    assert_eq!(*hits.lock().unwrap(), 0);
}

#[test]
fn hardware_refusal_reports_reader_unavailable() {
    let mut ctl = SessionController::new(RecordingHardware::refusing(), ScanConfig::default());
    assert_eq!(
        ctl.start_scan(|_| {}),
        Err(Error::ReaderUnavailable(HardwareError::new(
            "NFC not available"
        )))
    );
    assert_eq!(ctl.active_session(), None);
}

#[test]
fn custom_config_flows_to_hardware() {
    let hw = RecordingHardware::new();
    let config = ScanConfig::builder()
        .alert_message("Hold your card near the reader")
        .history_blocks(1)
        .build()
        .unwrap();
    let mut ctl = SessionController::new(hw.clone(), config);
    let id = ctl.start_scan(|_| {}).unwrap();
    ctl.handle(SessionEvent::new(
        id,
        EventKind::TagsDetected(vec![DetectedTag::felica(suica_tag(4))]),
    ));
    ctl.handle(SessionEvent::new(id, EventKind::Connected(Ok(()))));
    ctl.handle(SessionEvent::new(
        id,
        EventKind::ServiceResponded(Ok(vec![KeyVersion::new(1)])),
    ));

    let calls = hw.calls();
    assert!(matches!(
        &calls[0],
        HardwareCall::Begin { alert_message, .. } if alert_message == "Hold your card near the reader"
    ));
    assert!(matches!(
        calls.last(),
        Some(HardwareCall::Read { blocks, .. }) if blocks.len() == 1
    ));
}

/// Inputs a reader or a user could produce, in any order.
#[derive(Debug, Clone)]
enum Input {
    Event(u64, u8),
    Start,
    Stop,
    Expire,
}

fn event_kind(code: u8) -> EventKind {
    match code {
        0 => EventKind::TagsDetected(vec![DetectedTag::felica(suica_tag(1))]),
        1 => EventKind::TagsDetected(vec![]),
        2 => EventKind::Connected(Ok(())),
        3 => EventKind::Connected(Err(HardwareError::new("lost"))),
        4 => EventKind::ServiceResponded(Ok(vec![KeyVersion::new(1)])),
        5 => EventKind::ServiceResponded(Ok(vec![KeyVersion::ABSENT])),
        6 => EventKind::ReadCompleted(Ok(history_read())),
        7 => EventKind::ReadCompleted(Ok(ReadResponse::new(0xFF, 0xA1, vec![]))),
        _ => EventKind::Invalidated(None),
    }
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        6 => (1u64..4, 0u8..9).prop_map(|(s, k)| Input::Event(s, k)),
        1 => Just(Input::Start),
        1 => Just(Input::Stop),
        1 => Just(Input::Expire),
    ]
}

proptest! {
    #[test]
    fn sessions_end_at_most_once(inputs in prop::collection::vec(input(), 1..60)) {
        let hw = RecordingHardware::new();
        let mut ctl = SessionController::new(hw.clone(), ScanConfig::default());
        let hits = Arc::new(Mutex::new(0usize));
        let mut successes = 0usize;
        let mut terminations: HashMap<SessionId, usize> = HashMap::new();

        counting_start(&mut ctl, &hits);
        for input in inputs {
            let current = ctl.active_session();
            let transition = match input {
                Input::Event(s, k) => ctl.handle(SessionEvent::new(SessionId::new(s), event_kind(k))),
                Input::Start => {
                    counting_start(&mut ctl, &hits);
                    Transition::Ignored
                }
                Input::Stop => ctl.stop_scan(),
                Input::Expire => ctl.expire(),
            };
            if let Transition::Terminated(outcome) = transition {
                let id = current.expect("termination without a session");
                *terminations.entry(id).or_default() += 1;
                if outcome.is_ok() {
                    successes += 1;
                }
            }
        }

        prop_assert_eq!(*hits.lock().unwrap(), successes);
        prop_assert!(terminations.values().all(|&n| n == 1));

        let mut invalidated: HashMap<SessionId, usize> = HashMap::new();
        for (id, _) in hw.invalidations() {
            *invalidated.entry(id).or_default() += 1;
        }
        prop_assert!(invalidated.values().all(|&n| n == 1));
    }
}
