use super::*;
use crate::error::SlmError;
use crate::frame::PhaseMask;
use crate::test_utils::{ScriptedSlm, ShownFrame};

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn mask_frames(count: usize) -> Vec<Frame> {
    (0..count)
        .map(|i| Frame::from(PhaseMask::filled(4, 4, i as u8).unwrap()))
        .collect()
}

fn fast_options() -> PresentOptions {
    PresentOptions::new().settle(Duration::from_millis(1))
}

#[test]
fn shows_every_frame_in_order_then_signals_done() {
    let device = ScriptedSlm::new();
    let log = device.log();
    let harness = SyncHarness::new();

    let worker = PresentWorker::spawn(device, mask_frames(3), harness.clone(), fast_options());

    // Nothing happens until the start gate opens.
    thread::sleep(Duration::from_millis(30));
    assert!(log.lock().unwrap().is_empty(), "no show before start gate");
    assert!(!harness.done.is_open());

    harness.start.open();
    let report = worker.join().expect("run should succeed");

    assert_eq!(report.frames_shown, 3);
    assert!(harness.done.is_open());

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 3, "exactly N show operations");
    for shown in log.iter() {
        assert_eq!(
            *shown,
            ShownFrame::Mask {
                height: 4,
                width: 4
            }
        );
    }
}

#[test]
fn empty_sequence_still_signals_done() {
    let mut device = ScriptedSlm::new();
    let harness = SyncHarness::new();
    harness.start.open();

    let report = run(&mut device, Vec::<Frame>::new(), &harness, fast_options()).unwrap();

    assert_eq!(report.frames_shown, 0);
    assert_eq!(report.mean_frame_time(), None);
    assert!(harness.done.is_open());
}

#[test]
fn default_namer_publishes_index_jpg() {
    let device = ScriptedSlm::new();
    let harness = SyncHarness::with_handoff();
    let slot = harness.handoff.clone().unwrap();

    harness.start.open();
    let worker = PresentWorker::spawn(device, mask_frames(3), harness.clone(), fast_options());

    for expected in ["0.jpg", "1.jpg", "2.jpg"] {
        let path = slot
            .take_timeout(Duration::from_secs(2))
            .expect("worker should publish a path per frame");
        assert_eq!(path, PathBuf::from(expected));
    }

    worker.join().unwrap();
    assert!(harness.done.is_open());
}

#[test]
fn handoff_backpressure_blocks_next_show() {
    let device = ScriptedSlm::new();
    let log = device.log();
    let harness = SyncHarness::with_handoff();
    let slot = harness.handoff.clone().unwrap();

    let frames = vec![
        Frame::File(PathBuf::from("a.png")),
        Frame::File(PathBuf::from("b.png")),
    ];

    harness.start.open();
    let worker = PresentWorker::spawn(device, frames, harness.clone(), fast_options());

    // Frame 0 shows and its path is published; frame 1 must not show while
    // the entry sits unconsumed.
    thread::sleep(Duration::from_millis(80));
    assert_eq!(log.lock().unwrap().len(), 1, "frame 1 shown too early");
    assert_eq!(slot.take(), PathBuf::from("0.jpg"));

    thread::sleep(Duration::from_millis(80));
    assert_eq!(log.lock().unwrap().len(), 2, "frame 1 should show after drain");
    assert_eq!(slot.take(), PathBuf::from("1.jpg"));

    let report = worker.join().unwrap();
    assert_eq!(report.frames_shown, 2);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            ShownFrame::File(PathBuf::from("a.png")),
            ShownFrame::File(PathBuf::from("b.png")),
        ]
    );
}

#[test]
fn custom_namer_sees_each_index_once_in_order() {
    let device = ScriptedSlm::new();
    let harness = SyncHarness::with_handoff();
    let slot = harness.handoff.clone().unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_namer = Arc::clone(&seen);
    let options = fast_options().namer(move |i| {
        seen_by_namer.lock().unwrap().push(i);
        PathBuf::from(format!("cap_{i:03}.png"))
    });

    harness.start.open();
    let worker = PresentWorker::spawn(device, mask_frames(4), harness.clone(), options);

    for i in 0..4 {
        let path = slot.take_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(path, PathBuf::from(format!("cap_{i:03}.png")));
    }

    worker.join().unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn free_run_time_tracks_settle_plus_pacing() {
    let mut device = ScriptedSlm::new();
    let harness = SyncHarness::new();
    harness.start.open();

    let options = PresentOptions::new()
        .settle(Duration::from_millis(10))
        .pacing(Duration::from_millis(30));

    let start = Instant::now();
    let report = run(&mut device, mask_frames(3), &harness, options).unwrap();
    let elapsed = start.elapsed();

    // 3 frames x (10 ms settle + 30 ms pacing), plus scheduling slack.
    assert!(
        elapsed >= Duration::from_millis(115),
        "run finished too quickly: {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_secs(2),
        "run took implausibly long: {elapsed:?}"
    );
    assert!(report.mean_frame_time().unwrap() >= Duration::from_millis(38));
}

#[test]
fn invalid_frame_is_rejected_before_any_device_call() {
    let mut device = ScriptedSlm::new();
    let log = device.log();
    let harness = SyncHarness::new();
    harness.start.open();

    let frames = vec![Frame::File(PathBuf::new())];
    let err = run(&mut device, frames, &harness, fast_options()).unwrap_err();

    assert!(matches!(err, SlmError::UnsupportedFrame(_)));
    assert!(log.lock().unwrap().is_empty(), "device must not be touched");
    assert!(!harness.done.is_open());
}

#[test]
fn device_error_aborts_run_and_done_stays_closed() {
    let mut device = ScriptedSlm::failing_at(1);
    let log = device.log();
    let harness = SyncHarness::new();
    harness.start.open();

    let err = run(&mut device, mask_frames(3), &harness, fast_options()).unwrap_err();

    assert!(matches!(err, SlmError::Device { .. }));
    // The failing call was issued; nothing after it was.
    assert_eq!(log.lock().unwrap().len(), 2);
    assert!(!harness.done.is_open());
}

#[test]
fn transform_runs_before_show() {
    let mut device = ScriptedSlm::new();
    let log = device.log();
    let harness = SyncHarness::new();
    harness.start.open();

    let frames = vec![Frame::File(PathBuf::from("raw.png"))];
    let options = fast_options().transform(|frame| match frame {
        Frame::File(path) => Frame::File(PathBuf::from("corrected").join(path)),
        other => other,
    });

    run(&mut device, frames, &harness, options).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![ShownFrame::File(PathBuf::from("corrected/raw.png"))]
    );
}

#[test]
fn acknowledged_mode_opens_start_and_waits_per_frame() {
    let device = ScriptedSlm::new();
    let log = device.log();
    let harness = AckHarness::new();

    let worker =
        PresentWorker::spawn_acknowledged(device, mask_frames(2), harness.clone(), fast_options());

    // The loop opens the start gate itself.
    assert!(
        harness.start.wait_timeout(Duration::from_secs(2)),
        "acknowledged mode should open the start gate"
    );

    // Frame 0 needs no acknowledgment; its path arrives on the slot.
    assert_eq!(
        harness.handoff.take_timeout(Duration::from_secs(2)),
        Some(PathBuf::from("0.jpg"))
    );

    // The acknowledgment gate was closed after the show, so frame 1 waits.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(log.lock().unwrap().len(), 1, "frame 1 shown without ack");

    harness.frame_ack.open();
    assert_eq!(
        harness.handoff.take_timeout(Duration::from_secs(2)),
        Some(PathBuf::from("1.jpg"))
    );

    let report = worker.join().unwrap();
    assert_eq!(report.frames_shown, 2);
    assert!(harness.done.is_open());
}

#[test]
fn consumer_captures_to_every_published_path() {
    // End-to-end shape of a real session: a camera thread takes each
    // published path, writes its capture there, and only then lets the
    // next frame through.
    let capture_dir = tempfile::tempdir().unwrap();
    let harness = SyncHarness::with_handoff();
    let slot = harness.handoff.clone().unwrap();

    let dir = capture_dir.path().to_path_buf();
    let options = fast_options().namer(move |i| dir.join(format!("{i}.jpg")));

    harness.start.open();
    let done = harness.done.clone();
    let worker = PresentWorker::spawn(ScriptedSlm::new(), mask_frames(3), harness, options);

    let camera = thread::spawn(move || {
        while !done.is_open() || !slot.is_empty() {
            if let Some(path) = slot.take_timeout(Duration::from_millis(100)) {
                std::fs::write(&path, b"capture").unwrap();
            }
        }
    });

    worker.join().unwrap();
    camera.join().unwrap();

    for i in 0..3 {
        let path = capture_dir.path().join(format!("{i}.jpg"));
        assert!(path.exists(), "missing capture for frame {i}");
    }
}

#[test]
fn worker_drop_joins_without_hanging() {
    // Dropping the handle must join the thread, not deadlock.
    let harness = SyncHarness::new();
    harness.start.open();
    let worker = PresentWorker::spawn(
        ScriptedSlm::new(),
        mask_frames(1),
        harness.clone(),
        fast_options(),
    );

    let (tx, rx) = std::sync::mpsc::channel();
    let dropper = thread::spawn(move || {
        drop(worker);
        let _ = tx.send(());
    });

    match rx.recv_timeout(Duration::from_secs(2)) {
        Ok(()) => dropper.join().unwrap(),
        Err(_) => panic!("PresentWorker::drop() deadlocked"),
    }
    assert!(harness.done.is_open());
}
