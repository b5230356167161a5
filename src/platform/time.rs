//! Frame timing
//!
//! The host feeds wall-clock timestamps in; the simulation only ever sees
//! clamped fixed steps.

/// Fixed simulation step
pub const SIM_DT: f32 = 1.0 / 120.0;
/// Cap on steps per frame so a slow frame can't spiral
pub const MAX_SUBSTEPS: u32 = 8;

/// Turns timestamps into fixed simulation steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    accumulator: f32,
    max_frame_dt: f32,
}

impl FrameClock {
    pub fn new(max_frame_dt: f32) -> Self {
        Self {
            last: None,
            accumulator: 0.0,
            max_frame_dt: max_frame_dt.max(SIM_DT),
        }
    }

    /// Frame delta in seconds, clamped to `[0, max_frame_dt]`
    pub fn frame_dt(&mut self, now_seconds: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (now_seconds - last) as f32,
            None => SIM_DT,
        };
        self.last = Some(now_seconds);
        if dt.is_finite() {
            dt.clamp(0.0, self.max_frame_dt)
        } else {
            0.0
        }
    }

    /// Number of fixed steps to run for a frame ending at `now_seconds`
    pub fn advance(&mut self, now_seconds: f64) -> u32 {
        self.accumulator += self.frame_dt(now_seconds);
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }
}
