use super::*;

type Loop = EventLoop<&'static str, u32>;

fn drain(lp: &mut Loop, until: u64) -> Vec<String> {
    let mut out = Vec::new();
    while let Some(due) = lp.pop_due(Millis(until)) {
        match due {
            Due::Timer(name) => out.push(format!("{}@{}", name, lp.now().0)),
            Due::Frame(cbs) => {
                for (_, id) in cbs {
                    out.push(format!("frame{}@{}", id, lp.now().0));
                }
            }
        }
    }
    out
}

#[test]
fn zero_frame_interval_is_rejected() {
    assert!(Loop::new(0).is_err());
}

#[test]
fn timers_fire_in_due_order_with_stable_ties() {
    let mut lp = Loop::new(16).unwrap();
    lp.schedule_at(Millis(30), "c");
    lp.schedule_at(Millis(10), "a");
    lp.schedule_at(Millis(30), "d");
    lp.schedule_at(Millis(20), "b");
    assert_eq!(drain(&mut lp, 100), vec!["a@10", "b@20", "c@30", "d@30"]);
    assert_eq!(lp.now(), Millis(100));
}

#[test]
fn timers_past_the_horizon_stay_pending() {
    let mut lp = Loop::new(16).unwrap();
    lp.schedule_at(Millis(50), "late");
    assert!(drain(&mut lp, 40).is_empty());
    assert_eq!(lp.now(), Millis(40));
    assert_eq!(lp.pending_timers(), 1);
    assert_eq!(drain(&mut lp, 50), vec!["late@50"]);
}

#[test]
fn frames_land_on_interval_boundaries() {
    let mut lp = Loop::new(16).unwrap();
    lp.schedule_at(Millis(5), "t");
    assert_eq!(drain(&mut lp, 5), vec!["t@5"]);
    lp.request_frame(1);
    lp.request_frame(2);
    assert_eq!(drain(&mut lp, 40), vec!["frame1@16", "frame2@16"]);
}

#[test]
fn timer_at_frame_boundary_runs_first() {
    let mut lp = Loop::new(16).unwrap();
    lp.request_frame(7);
    lp.schedule_at(Millis(0), "t");
    assert_eq!(drain(&mut lp, 0), vec!["t@0", "frame7@0"]);
}

#[test]
fn frame_requested_during_dispatch_waits_for_next_frame() {
    let mut lp = Loop::new(16).unwrap();
    lp.request_frame(1);
    let Some(Due::Frame(cbs)) = lp.pop_due(Millis(100)) else {
        panic!("expected a frame");
    };
    assert_eq!(cbs.len(), 1);
    assert_eq!(lp.now(), Millis(0));
    lp.request_frame(2);
    assert_eq!(lp.next_wakeup(), Some(Millis(16)));
    assert_eq!(drain(&mut lp, 100), vec!["frame2@16"]);
}

#[test]
fn handles_are_unique() {
    let mut lp = Loop::new(16).unwrap();
    let a = lp.request_frame(0);
    let b = lp.request_frame(0);
    assert_ne!(a, b);
    assert_eq!(lp.pending_frames(), 2);
}

#[test]
fn past_schedule_fires_now() {
    let mut lp = Loop::new(16).unwrap();
    assert!(drain(&mut lp, 500).is_empty());
    lp.schedule_at(Millis(100), "stale");
    assert_eq!(drain(&mut lp, 500), vec!["stale@500"]);
}

#[test]
fn host_driven_frames_do_not_catch_up() {
    let mut lp = Loop::new(16).unwrap();
    lp.schedule_at(Millis(40), "t");
    lp.request_frame(1);
    assert_eq!(lp.pop_timer(Millis(1000)), Some("t"));
    assert_eq!(lp.pop_timer(Millis(1000)), None);
    let cbs = lp.take_frame(Millis(1000)).unwrap();
    assert_eq!(cbs.len(), 1);
    assert_eq!(lp.now(), Millis(1000));
    assert!(lp.take_frame(Millis(1016)).is_none());
    lp.request_frame(2);
    assert_eq!(lp.next_wakeup(), Some(Millis(1016)));
}

#[test]
fn host_driven_frame_runs_once_per_instant() {
    let mut lp = Loop::new(16).unwrap();
    lp.request_frame(1);
    assert!(lp.take_frame(Millis(500)).is_some());
    lp.request_frame(2);
    assert!(lp.take_frame(Millis(500)).is_none());
    assert!(lp.take_frame(Millis(490)).is_none());
    assert_eq!(lp.pending_frames(), 1);
    let cbs = lp.take_frame(Millis(516)).unwrap();
    assert_eq!(cbs.len(), 1);
}
