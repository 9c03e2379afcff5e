use std::time::Duration;

/// Never run more than this many fixed ticks for one frame, so a long stall
/// does not turn into a burst of gravity steps.
pub const MAX_FIXED_STEPS_PER_FRAME: u32 = 8;

#[derive(Clone, Copy, Debug, Default)]
pub struct Time {
    pub elapsed: Duration,
    pub total: Duration,
}

impl Time {
    pub fn new(elapsed: Duration, total: Duration) -> Self {
        Time { elapsed, total }
    }

    pub fn delta_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Advance to the next frame
    pub fn tick(&self, elapsed: Duration) -> Time {
        Time {
            elapsed,
            total: self.total + elapsed,
        }
    }
}

/// Accumulates frame time into whole fixed-rate ticks
#[derive(Clone, Debug)]
pub struct FixedStepper {
    step: Duration,
    accumulator: Duration,
}

impl FixedStepper {
    pub fn new(step: Duration) -> Self {
        assert!(!step.is_zero(), "fixed step must be non-zero");
        FixedStepper {
            step,
            accumulator: Duration::ZERO,
        }
    }

    pub fn from_rate(hz: u32) -> Self {
        FixedStepper::new(Duration::from_secs(1) / hz.max(1))
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn step_secs(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Add frame time and return how many fixed ticks are now due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_FIXED_STEPS_PER_FRAME {
            self.accumulator -= self.step;
            steps += 1;
        }

        if steps == MAX_FIXED_STEPS_PER_FRAME && self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
        }

        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_tick_accumulates_total() {
        let time = Time::default()
            .tick(Duration::from_millis(16))
            .tick(Duration::from_millis(20));
        assert_eq!(time.elapsed, Duration::from_millis(20));
        assert_eq!(time.total, Duration::from_millis(36));
    }

    #[test]
    fn test_fixed_stepper_carries_remainder() {
        let mut stepper = FixedStepper::new(Duration::from_millis(20));
        assert_eq!(stepper.advance(Duration::from_millis(15)), 0);
        assert_eq!(stepper.advance(Duration::from_millis(15)), 1);
        assert_eq!(stepper.advance(Duration::from_millis(30)), 2);
    }

    #[test]
    fn test_fixed_stepper_drops_backlog_after_stall() {
        let mut stepper = FixedStepper::new(Duration::from_millis(10));
        assert_eq!(stepper.advance(Duration::from_secs(1)), MAX_FIXED_STEPS_PER_FRAME);
        assert_eq!(stepper.advance(Duration::from_millis(5)), 0);
    }

    #[test]
    fn test_from_rate() {
        let stepper = FixedStepper::from_rate(50);
        assert_eq!(stepper.step(), Duration::from_millis(20));
    }
}
