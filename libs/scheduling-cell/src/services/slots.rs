use std::iter::FusedIterator;

use crate::models::{MinuteOfDay, OperatingWindow, SlotStep};

/// Candidate start times from the window start (inclusive) to the window end
/// (exclusive). Cloning restarts from the clone point.
#[derive(Debug, Clone)]
pub struct Slots {
    next: u16,
    end: u16,
    step: u16,
}

pub fn generate_slots(window: &OperatingWindow, step: SlotStep) -> Slots {
    Slots {
        next: window.start().minutes(),
        end: window.end().minutes(),
        step: step.minutes(),
    }
}

impl Iterator for Slots {
    type Item = MinuteOfDay;

    fn next(&mut self) -> Option<MinuteOfDay> {
        if self.next >= self.end {
            return None;
        }
        let slot = MinuteOfDay::new(self.next).ok()?;
        self.next = self.next.saturating_add(self.step);
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next < self.end {
            usize::from((self.end - self.next).div_ceil(self.step))
        } else {
            0
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Slots {}

impl FusedIterator for Slots {}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> OperatingWindow {
        OperatingWindow::new(MinuteOfDay::parse(start).unwrap(), MinuteOfDay::parse(end).unwrap()).unwrap()
    }

    #[test]
    fn half_hour_grid() {
        let slots: Vec<String> = generate_slots(&window("09:00", "11:00"), SlotStep::new(30).unwrap())
            .map(|s| s.to_string())
            .collect();
        assert_eq!(slots, vec!["09:00", "09:30", "10:00", "10:30"]);
    }

    #[test]
    fn last_partial_step_still_yields_a_start() {
        let slots = generate_slots(&window("09:00", "10:00"), SlotStep::new(45).unwrap());
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.last().map(|s| s.minutes()), Some(585));
    }

    #[test]
    fn restartable_by_clone() {
        let mut slots = generate_slots(&window("09:00", "12:00"), SlotStep::new(60).unwrap());
        let fresh = slots.clone();
        slots.next();
        assert_eq!(fresh.count(), 3);
        assert_eq!(slots.count(), 2);
    }

    #[test]
    fn step_larger_than_the_day() {
        let slots: Vec<_> = generate_slots(&window("00:00", "24:00"), SlotStep::new(u16::MAX).unwrap()).collect();
        assert_eq!(slots, vec![MinuteOfDay::new(0).unwrap()]);
    }
}
