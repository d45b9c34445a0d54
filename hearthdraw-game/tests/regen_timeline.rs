use std::cell::RefCell;
use std::rc::Rc;

use hearthdraw_game::{EnergyAccount, EnergyChanged, ManualClock, TICKS_PER_SECOND};

const INTERVAL: i32 = 300;

fn account(clock: &ManualClock, current: i32) -> EnergyAccount {
    EnergyAccount::new(Rc::new(clock.clone()), current, 10, 20, INTERVAL, 0)
}

#[test]
fn offline_days_fill_exactly_to_regen_cap() {
    let clock = ManualClock::at_seconds(1_000_000);
    let mut energy = account(&clock, 0);
    clock.advance_seconds(3 * 24 * 60 * 60);
    energy.apply_regen();
    assert_eq!(energy.current(), 10);
    assert_eq!(energy.extra(), 0);
    assert!(energy.seconds_until_next() <= INTERVAL);
}

#[test]
fn second_regen_pass_without_elapsed_time_is_noop() {
    let clock = ManualClock::at_seconds(50);
    let mut energy = account(&clock, 2);
    clock.advance_seconds(700);
    energy.apply_regen();
    let (current, anchor) = (energy.current(), energy.last_regen_ticks());
    energy.apply_regen();
    assert_eq!(energy.current(), current);
    assert_eq!(energy.last_regen_ticks(), anchor);
    assert_eq!(current, 4);
}

#[test]
fn clamped_regen_keeps_partial_progress() {
    let clock = ManualClock::at_seconds(0);
    clock.set_ticks(1);
    let mut energy = EnergyAccount::new(Rc::new(clock.clone()), 8, 10, 20, INTERVAL, 1);

    // Five intervals and a half elapse; only two units fit under the cap.
    clock.advance_seconds(5 * i64::from(INTERVAL) + 150);
    energy.apply_regen();
    assert_eq!(energy.current(), 10);
    assert_eq!(energy.seconds_until_next(), 150);

    energy.try_spend(3).unwrap();
    clock.advance_seconds(150);
    energy.apply_regen();
    assert_eq!(energy.current(), 8, "the preserved half interval completes a unit");
}

#[test]
fn time_spent_full_is_not_banked() {
    let clock = ManualClock::at_seconds(10);
    let mut energy = account(&clock, 10);
    clock.advance_seconds(10 * i64::from(INTERVAL));
    energy.apply_regen();
    energy.try_spend(4).unwrap();
    energy.apply_regen();
    assert_eq!(energy.current(), 6);

    clock.advance_seconds(i64::from(INTERVAL));
    energy.apply_regen();
    assert_eq!(energy.current(), 7);
}

#[test]
fn grants_above_cap_are_kept_and_not_regenerated() {
    let clock = ManualClock::at_seconds(10);
    let mut energy = account(&clock, 9);
    energy.add(6);
    assert_eq!(energy.current(), 15);
    assert_eq!(energy.extra(), 5);

    clock.advance_seconds(4 * i64::from(INTERVAL));
    energy.apply_regen();
    assert_eq!(energy.current(), 15);

    energy.add(100);
    assert_eq!(energy.current(), energy.storage_max());
    energy.add(-100);
    assert_eq!(energy.current(), 0);
}

#[test]
fn listeners_only_hear_real_changes() {
    let clock = ManualClock::at_seconds(10);
    let mut energy = account(&clock, 3);
    let seen: Rc<RefCell<Vec<EnergyChanged>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let id = energy.subscribe(move |event| sink.borrow_mut().push(*event));

    energy.apply_regen();
    assert!(energy.try_spend(0).is_ok());
    assert!(energy.try_spend(50).is_err());
    clock.advance_ticks(i64::from(INTERVAL) * TICKS_PER_SECOND);
    energy.apply_regen();
    energy.add(2);

    let currents: Vec<i32> = seen.borrow().iter().map(|e| e.current).collect();
    assert_eq!(currents, vec![4, 6]);

    assert!(energy.unsubscribe(id));
    energy.add(1);
    assert_eq!(seen.borrow().len(), 2);
}
