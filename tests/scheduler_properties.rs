//! End-to-end properties of the schedulers over the real platform services.

use core::time::Duration;
use std::{
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
  thread,
  time::Instant,
};

use cadence_rs::{
  std::{concurrency::StdConcurrencyLayer, dispatch::EventLoopContext, timer::ThreadTimerService},
  CancelHandle, DispatchContext, DispatchContextProvider, PeriodicScheduler, PeriodicSchedulerExt, ScheduleError,
  SchedulerExt, TimeoutScheduler,
};

fn timeout_scheduler() -> (TimeoutScheduler, Arc<ThreadTimerService>) {
  let _ = tracing_subscriber::fmt().with_test_writer().try_init();
  let timers = ThreadTimerService::new();
  let scheduler = TimeoutScheduler::new(timers.clone(), Arc::new(StdConcurrencyLayer));
  (scheduler, timers)
}

fn wait_until(deadline: Duration, condition: impl Fn() -> bool) {
  let start = Instant::now();
  while !condition() {
    assert!(start.elapsed() < deadline, "condition not reached within {deadline:?}");
    thread::sleep(Duration::from_millis(1));
  }
}

#[test]
fn shorter_delays_fire_before_longer_ones() {
  let (scheduler, timers) = timeout_scheduler();
  let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

  let late = order.clone();
  let _a = scheduler.schedule_after_with((), Duration::from_millis(90), move |_, ()| {
    late.lock().push("late");
    CancelHandle::empty()
  });
  let early = order.clone();
  let _b = scheduler.schedule_after_with((), Duration::from_millis(20), move |_, ()| {
    early.lock().push("early");
    CancelHandle::empty()
  });

  wait_until(Duration::from_secs(5), || order.lock().len() == 2);
  assert_eq!(*order.lock(), vec!["early", "late"]);
  timers.shutdown();
}

#[test]
fn cancel_before_fire_never_runs_the_action() {
  let (scheduler, timers) = timeout_scheduler();
  let ran = Arc::new(AtomicU64::new(0));

  for _ in 0..20 {
    let ran = ran.clone();
    let handle = scheduler.schedule_after_with((), Duration::from_millis(10), move |_, ()| {
      ran.fetch_add(1, Ordering::SeqCst);
      CancelHandle::empty()
    });
    handle.cancel();
  }

  thread::sleep(Duration::from_millis(60));
  assert_eq!(ran.load(Ordering::SeqCst), 0);
  timers.shutdown();
}

#[test]
fn double_cancel_has_the_same_observable_effect_as_one() {
  let (scheduler, timers) = timeout_scheduler();
  let ran = Arc::new(AtomicU64::new(0));
  let sink = ran.clone();

  let handle = scheduler.schedule_after_with((), Duration::from_millis(10), move |_, ()| {
    sink.fetch_add(1, Ordering::SeqCst);
    CancelHandle::empty()
  });
  handle.cancel();
  handle.cancel();

  thread::sleep(Duration::from_millis(50));
  assert_eq!(ran.load(Ordering::SeqCst), 0);
  assert!(handle.is_cancelled());
  timers.shutdown();
}

#[test]
fn delayed_action_observes_its_delay_and_state() {
  let (scheduler, timers) = timeout_scheduler();
  let seen = Arc::new(parking_lot::Mutex::new(None));
  let sink = seen.clone();
  let start = Instant::now();

  let _handle = scheduler.schedule_after_with("x", Duration::from_millis(100), move |_, state| {
    *sink.lock() = Some((state, start.elapsed()));
    CancelHandle::empty()
  });

  wait_until(Duration::from_secs(5), || seen.lock().is_some());
  let (state, elapsed) = seen.lock().take().unwrap();
  assert_eq!(state, "x");
  assert!(elapsed >= Duration::from_millis(100), "fired after only {elapsed:?}");
  timers.shutdown();
}

#[test]
fn periodic_threads_state_between_serialized_ticks() {
  let (scheduler, timers) = timeout_scheduler();
  let outputs = Arc::new(parking_lot::Mutex::new(Vec::new()));
  let sink = outputs.clone();

  let handle = scheduler
    .schedule_periodic_with(0_u64, Duration::from_millis(50), move |n| {
      sink.lock().push(n);
      n + 1
    })
    .unwrap();

  wait_until(Duration::from_secs(5), || outputs.lock().len() >= 4);
  handle.cancel();

  let observed = outputs.lock().clone();
  let expected: Vec<u64> = (0..observed.len() as u64).collect();
  assert_eq!(observed, expected, "each tick must consume the previous tick's output");
  timers.shutdown();
}

#[test]
fn gated_periodic_ticks_never_overlap() {
  let (scheduler, timers) = timeout_scheduler();
  let in_flight = Arc::new(AtomicU64::new(0));
  let ticks = Arc::new(AtomicU64::new(0));

  let gauge = in_flight.clone();
  let counter = ticks.clone();
  let handle = scheduler
    .schedule_periodic(
      Duration::from_millis(5),
      Box::new(move || {
        let concurrent = gauge.fetch_add(1, Ordering::SeqCst);
        assert_eq!(concurrent, 0, "tick started while another was running");
        // Overrun the period on purpose.
        thread::sleep(Duration::from_millis(15));
        gauge.fetch_sub(1, Ordering::SeqCst);
        counter.fetch_add(1, Ordering::SeqCst);
      }),
    )
    .unwrap();

  wait_until(Duration::from_secs(5), || ticks.load(Ordering::SeqCst) >= 5);
  handle.cancel();
  timers.shutdown();
}

#[test]
fn busy_loop_out_ticks_a_timed_interval_and_stops_on_cancel() {
  let (scheduler, timers) = timeout_scheduler();
  let loop_ticks = Arc::new(AtomicU64::new(0));
  let interval_ticks = Arc::new(AtomicU64::new(0));

  let loop_counter = loop_ticks.clone();
  let loop_handle = scheduler
    .schedule_periodic(
      Duration::ZERO,
      Box::new(move || {
        loop_counter.fetch_add(1, Ordering::SeqCst);
      }),
    )
    .unwrap();
  let interval_counter = interval_ticks.clone();
  let interval_handle = scheduler
    .schedule_periodic(
      Duration::from_millis(50),
      Box::new(move || {
        interval_counter.fetch_add(1, Ordering::SeqCst);
      }),
    )
    .unwrap();

  wait_until(Duration::from_secs(10), || interval_ticks.load(Ordering::SeqCst) >= 4);
  assert!(
    loop_ticks.load(Ordering::SeqCst) > interval_ticks.load(Ordering::SeqCst),
    "busy loop must out-tick a 50ms interval"
  );

  loop_handle.cancel();
  interval_handle.cancel();
  thread::sleep(Duration::from_millis(20));
  let settled = loop_ticks.load(Ordering::SeqCst);
  thread::sleep(Duration::from_millis(20));
  assert!(
    loop_ticks.load(Ordering::SeqCst) <= settled + 1,
    "busy loop must stop within one iteration of cancellation"
  );
  timers.shutdown();
}

#[test]
fn dispatch_scheduler_requires_a_context() {
  struct NoProvider;
  impl DispatchContextProvider for NoProvider {
    fn current(&self) -> Option<Arc<dyn DispatchContext>> {
      None
    }
  }

  let timers = ThreadTimerService::new();
  let result = cadence_rs::DispatchScheduler::from_provider(&NoProvider, timers.clone());

  assert!(matches!(result, Err(ScheduleError::NoDispatchContext)));
  timers.shutdown();
}

#[test]
fn dispatch_scheduler_runs_actions_in_post_order_on_the_loop() {
  let context = EventLoopContext::new();
  let timers = ThreadTimerService::new();
  let scheduler = cadence_rs::DispatchScheduler::from_provider(&*context, timers.clone()).unwrap();
  let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

  for n in 0..50_u64 {
    let order = order.clone();
    let _handle = scheduler.schedule_with(n, move |_, n| {
      order.lock().push(n);
      CancelHandle::empty()
    });
  }

  wait_until(Duration::from_secs(5), || order.lock().len() == 50);
  assert_eq!(*order.lock(), (0..50).collect::<Vec<u64>>());
  timers.shutdown();
  context.shutdown();
}

#[test]
fn dispatch_scheduler_delayed_action_marshals_back_to_the_loop() {
  let context = EventLoopContext::new();
  let timers = ThreadTimerService::new();
  let scheduler = cadence_rs::DispatchScheduler::from_provider(&*context, timers.clone()).unwrap();
  let seen = Arc::new(parking_lot::Mutex::new(None));
  let sink = seen.clone();
  let start = Instant::now();

  let _handle = scheduler.schedule_after_with("x", Duration::from_millis(60), move |_, state| {
    *sink.lock() = Some((state, start.elapsed(), std::thread::current().name().map(String::from)));
    CancelHandle::empty()
  });

  wait_until(Duration::from_secs(5), || seen.lock().is_some());
  let (state, elapsed, thread_name) = seen.lock().take().unwrap();
  assert_eq!(state, "x");
  assert!(elapsed >= Duration::from_millis(60));
  assert_eq!(thread_name.as_deref(), Some("cadence-event-loop"));
  timers.shutdown();
  context.shutdown();
}
