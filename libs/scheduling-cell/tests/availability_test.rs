mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use proptest::prelude::*;

use scheduling_cell::{
    generate_slots, Appointment, AppointmentStatus, AvailabilityFilter, AvailabilityService,
    BookedInterval, BookingError, MinuteOfDay, OperatingWindow, ScheduleConfig, SlotStep,
};
use shared_config::OverlapPolicy;

use common::{at, day, service, stylist, InMemoryStore};

fn short_day() -> OperatingWindow {
    OperatingWindow::new(at("09:00"), at("18:00")).unwrap()
}

fn booked(time: &str, duration: u32) -> BookedInterval {
    BookedInterval { start: at(time), duration }
}

fn appointment(id: i64, time: &str, service_id: i64, duration: Option<u32>, status: AppointmentStatus) -> Appointment {
    Appointment {
        id,
        stylist_id: 1,
        service_id,
        date: day(),
        time: at(time),
        duration_minutes: duration,
        client_name: "Мария".to_string(),
        client_phone: "+7 900 000-00-00".to_string(),
        client_email: "maria@example.com".to_string(),
        status,
        created_at: None,
    }
}

#[test]
fn scenario_one_hour_booking_at_ten() {
    for policy in [OverlapPolicy::Symmetric, OverlapPolicy::RequestedDurationOnly] {
        let filter = AvailabilityFilter::new(short_day(), policy);
        let available = filter.filter_available(
            generate_slots(&short_day(), SlotStep::new(30).unwrap()),
            60,
            &[booked("10:00", 60)],
        );

        assert!(available.contains(&at("09:00")), "{:?}", policy);
        assert!(available.contains(&at("11:00")), "{:?}", policy);
        assert!(!available.contains(&at("09:30")), "{:?}", policy);
        assert!(!available.contains(&at("10:00")), "{:?}", policy);
        assert!(!available.contains(&at("10:30")), "{:?}", policy);
    }
}

#[test]
fn long_booking_blocks_its_whole_interval_under_symmetric_rule() {
    let slots = || generate_slots(&short_day(), SlotStep::new(30).unwrap());
    let bookings = [booked("10:00", 120)];

    let symmetric = AvailabilityFilter::new(short_day(), OverlapPolicy::Symmetric)
        .filter_available(slots(), 30, &bookings);
    let legacy = AvailabilityFilter::new(short_day(), OverlapPolicy::RequestedDurationOnly)
        .filter_available(slots(), 30, &bookings);

    assert!(!symmetric.contains(&at("11:30")));
    assert!(symmetric.contains(&at("12:00")));
    assert!(legacy.contains(&at("11:30")));
}

fn policy() -> impl Strategy<Value = OverlapPolicy> {
    prop_oneof![Just(OverlapPolicy::Symmetric), Just(OverlapPolicy::RequestedDurationOnly)]
}

fn bookings() -> impl Strategy<Value = Vec<BookedInterval>> {
    prop::collection::vec(
        (0u16..1440, 1u32..=180).prop_map(|(start, duration)| BookedInterval {
            start: MinuteOfDay::new(start).unwrap(),
            duration,
        }),
        0..6,
    )
}

proptest! {
    #[test]
    fn returned_slots_fit_before_closing(
        policy in policy(),
        duration in 1u32..=240,
        step in 5u16..=60,
        booked in bookings(),
    ) {
        let window = ScheduleConfig::default().window;
        let filter = AvailabilityFilter::new(window, policy);
        let available = filter.filter_available(generate_slots(&window, SlotStep::new(step).unwrap()), duration, &booked);

        for slot in available {
            prop_assert!(slot.end_after(duration) <= u32::from(window.end().minutes()));
        }
    }

    #[test]
    fn legacy_rule_keeps_requested_distance(duration in 1u32..=240, booked in bookings()) {
        let window = ScheduleConfig::default().window;
        let filter = AvailabilityFilter::new(window, OverlapPolicy::RequestedDurationOnly);
        let available = filter.filter_available(generate_slots(&window, SlotStep::new(15).unwrap()), duration, &booked);

        for slot in available {
            for b in &booked {
                prop_assert!(u32::from(slot.minutes()).abs_diff(u32::from(b.start.minutes())) >= duration);
            }
        }
    }

    #[test]
    fn symmetric_rule_never_overlaps(duration in 1u32..=240, booked in bookings()) {
        let window = ScheduleConfig::default().window;
        let filter = AvailabilityFilter::new(window, OverlapPolicy::Symmetric);
        let available = filter.filter_available(generate_slots(&window, SlotStep::new(15).unwrap()), duration, &booked);

        for slot in available {
            let a = u32::from(slot.minutes());
            for b in &booked {
                let start = u32::from(b.start.minutes());
                prop_assert!(a + duration <= start || start + b.duration <= a);
            }
        }
    }

    #[test]
    fn filtering_is_idempotent(policy in policy(), duration in 1u32..=240, booked in bookings()) {
        let window = ScheduleConfig::default().window;
        let filter = AvailabilityFilter::new(window, policy);
        let slots = generate_slots(&window, SlotStep::new(30).unwrap());

        let first = filter.filter_available(slots.clone(), duration, &booked);
        let again = filter.filter_available(slots, duration, &booked);
        let refiltered = filter.filter_available(first.clone(), duration, &booked);

        prop_assert_eq!(&first, &again);
        prop_assert_eq!(&first, &refiltered);
    }
}

#[tokio::test]
async fn service_reports_grouped_free_slots() {
    let store = InMemoryStore::new(vec![service(2, 60)], vec![stylist(1)]);
    store.seed(appointment(1, "10:00", 2, Some(60), AppointmentStatus::Confirmed));
    store.seed(appointment(2, "13:00", 2, Some(60), AppointmentStatus::Cancelled));

    let availability = AvailabilityService::new(Arc::new(store), ScheduleConfig::default())
        .available_slots(1, 2, day())
        .await
        .unwrap();

    assert_eq!(availability.duration_minutes, 60);
    assert_eq!(availability.day_parts.morning, vec![at("09:00"), at("11:00"), at("11:30")]);
    assert!(availability.day_parts.afternoon.contains(&at("13:00")));
    assert_eq!(availability.day_parts.evening.last(), Some(&at("20:00")));
}

#[tokio::test]
async fn pending_bookings_hold_their_slot() {
    let store = InMemoryStore::new(vec![service(2, 30)], vec![stylist(1)]);
    store.seed(appointment(1, "15:00", 2, Some(30), AppointmentStatus::Pending));

    let availability = AvailabilityService::new(Arc::new(store), ScheduleConfig::default())
        .available_slots(1, 2, day())
        .await
        .unwrap();

    assert!(!availability.slots.contains(&at("15:00")));
    assert!(availability.slots.contains(&at("15:30")));
}

#[tokio::test]
async fn legacy_rows_use_current_service_duration() {
    // Booked with a 90 minute service before durations were recorded.
    let store = InMemoryStore::new(vec![service(2, 30), service(5, 90)], vec![stylist(1)]);
    store.seed(appointment(1, "12:00", 5, None, AppointmentStatus::Confirmed));

    let availability = AvailabilityService::new(Arc::new(store), ScheduleConfig::default())
        .available_slots(1, 2, day())
        .await
        .unwrap();

    assert!(!availability.slots.contains(&at("13:00")));
    assert!(availability.slots.contains(&at("13:30")));
}

#[tokio::test]
async fn unknown_stylist_is_not_found() {
    let store = InMemoryStore::new(vec![service(2, 30)], vec![]);

    let result = AvailabilityService::new(Arc::new(store), ScheduleConfig::default())
        .available_slots(1, 2, day())
        .await;

    assert_matches!(result, Err(BookingError::NotFound(what)) if what == "Stylist 1");
}
