use super::*;
use crossbeam_channel::unbounded;
use std::cell::RefCell;

#[derive(Default)]
struct CollectingSink {
    sent: RefCell<Vec<String>>,
}

impl CommandSink for &CollectingSink {
    fn send_command(&self, command: String) -> Result<()> {
        self.sent.borrow_mut().push(command);
        Ok(())
    }
}

fn snapshot_with(ids: &[usize]) -> ButtonSnapshot {
    ButtonSnapshot::from_bits(ids.iter().fold(0u128, |acc, id| acc | (1u128 << id)))
}

fn pressed_ids(presses: &[ButtonPress]) -> Vec<u8> {
    presses.iter().map(|press| press.id).collect()
}

#[test]
fn snapshot_shifts_each_byte_by_its_index() {
    let mut bytes = [0u8; BUTTON_BYTES];
    bytes[0] = 0b0000_0001;
    bytes[1] = 0b0000_0010;
    bytes[11] = 0b1000_0000;
    let snapshot = ButtonSnapshot::from_bytes(&bytes);
    assert!(snapshot.is_pressed(0));
    assert!(snapshot.is_pressed(9));
    assert!(snapshot.is_pressed(95));
    assert!(!snapshot.is_pressed(1));
    assert_eq!(snapshot.bits().count_ones(), 3);
}

#[test]
fn rising_edges_are_exactly_new_bits() {
    let mut detector = ButtonEventDetector::new();
    assert_eq!(pressed_ids(&detector.detect(snapshot_with(&[0, 44]))), vec![0, 44]);

    let presses = detector.detect(snapshot_with(&[44, 70, 95]));
    assert_eq!(pressed_ids(&presses), vec![70, 95]);
    assert_eq!(detector.baseline(), snapshot_with(&[44, 70, 95]));
}

#[test]
fn repeated_snapshot_emits_nothing() {
    let mut detector = ButtonEventDetector::new();
    let held = snapshot_with(&[3, 12]);
    assert_eq!(detector.detect(held).len(), 2);
    assert!(detector.detect(held).is_empty());
    assert!(detector.detect(held).is_empty());
}

#[test]
fn releases_emit_nothing_but_rearm_the_button() {
    let mut detector = ButtonEventDetector::new();
    detector.detect(snapshot_with(&[5]));
    assert!(detector.detect(ButtonSnapshot::default()).is_empty());
    assert_eq!(pressed_ids(&detector.detect(snapshot_with(&[5]))), vec![5]);
}

#[test]
fn binding_table_has_unique_command_ids() {
    let command_ids: Vec<u8> = MCDU_BINDINGS
        .iter()
        .filter(|binding| binding.target_kind == TargetKind::Command)
        .map(|binding| binding.id)
        .collect();
    let mut deduped = command_ids.clone();
    deduped.dedup();
    assert_eq!(command_ids, deduped);
    assert!(!command_ids.contains(&17));
    assert!(!command_ids.contains(&27));
    assert!(MCDU_BINDINGS
        .iter()
        .all(|binding| usize::from(binding.id) < BUTTON_SLOTS));
}

#[test]
fn captain_command_is_sent_verbatim() {
    let sink = CollectingSink::default();
    let mut dispatcher = ButtonDispatcher::new(&MCDU_BINDINGS, DeviceVariant::Captain, &sink);
    let outcomes = dispatcher.dispatch(ButtonPress { id: 35 });
    assert_eq!(
        outcomes,
        vec![DispatchOutcome::CommandSent("event:left:4".to_string())]
    );
    assert_eq!(*sink.sent.borrow(), vec!["event:left:4".to_string()]);
}

#[test]
fn first_officer_commands_are_remapped() {
    let sink = CollectingSink::default();
    let mut dispatcher =
        ButtonDispatcher::new(&MCDU_BINDINGS, DeviceVariant::FirstOfficer, &sink);
    dispatcher.dispatch(ButtonPress { id: 73 });
    assert_eq!(*sink.sent.borrow(), vec!["event:right:CLR".to_string()]);
}

#[test]
fn unbound_id_dispatches_nothing() {
    let sink = CollectingSink::default();
    let mut dispatcher = ButtonDispatcher::new(&MCDU_BINDINGS, DeviceVariant::Captain, &sink);
    assert!(dispatcher.dispatch(ButtonPress { id: 17 }).is_empty());
    assert!(dispatcher.dispatch(ButtonPress { id: 97 }).is_empty());
    assert!(sink.sent.borrow().is_empty());
}

#[test]
fn shared_id_runs_every_binding_and_stays_inert() {
    let sink = CollectingSink::default();
    let mut dispatcher = ButtonDispatcher::new(&MCDU_BINDINGS, DeviceVariant::Captain, &sink);
    let outcomes = dispatcher.dispatch(ButtonPress { id: 75 });
    assert_eq!(
        outcomes,
        vec![
            DispatchOutcome::Unhandled("LCDBright"),
            DispatchOutcome::Unhandled("Backlight"),
        ]
    );
    assert!(sink.sent.borrow().is_empty());
}

static DATA_BINDINGS: [ButtonBinding; 2] = [
    ButtonBinding {
        id: 1,
        name: "LIGHT",
        target: "ckpt/light",
        target_kind: TargetKind::Data,
        action: ActionKind::Toggle,
        led: None,
    },
    ButtonBinding {
        id: 2,
        name: "TEST",
        target: "event:left:TEST",
        target_kind: TargetKind::Command,
        action: ActionKind::Switch,
        led: None,
    },
];

#[test]
fn data_toggle_flips_cached_value() {
    let sink = CollectingSink::default();
    let mut dispatcher = ButtonDispatcher::new(&DATA_BINDINGS, DeviceVariant::Captain, &sink);
    assert_eq!(dispatcher.data_value("ckpt/light"), None);
    assert_eq!(
        dispatcher.dispatch(ButtonPress { id: 1 }),
        vec![DispatchOutcome::DataToggled {
            target: "ckpt/light".to_string(),
            value: true
        }]
    );
    dispatcher.dispatch(ButtonPress { id: 1 });
    assert_eq!(dispatcher.data_value("ckpt/light"), Some(false));
    assert!(sink.sent.borrow().is_empty());
}

#[test]
fn switch_is_diagnostic_only() {
    let sink = CollectingSink::default();
    let mut dispatcher = ButtonDispatcher::new(&DATA_BINDINGS, DeviceVariant::Captain, &sink);
    assert_eq!(
        dispatcher.dispatch(ButtonPress { id: 2 }),
        vec![DispatchOutcome::Diagnostic("event:left:TEST".to_string())]
    );
    assert!(sink.sent.borrow().is_empty());
}

#[test]
fn channel_sink_queues_and_reports_closed_queue() {
    let (tx, rx) = unbounded::<String>();
    let mut dispatcher = ButtonDispatcher::new(&MCDU_BINDINGS, DeviceVariant::Captain, tx);
    dispatcher.dispatch(ButtonPress { id: 0 });
    assert_eq!(rx.try_recv().unwrap(), "event:left:L1");

    drop(rx);
    assert_eq!(
        dispatcher.dispatch(ButtonPress { id: 1 }),
        vec![DispatchOutcome::CommandFailed("event:left:L2".to_string())]
    );
}
