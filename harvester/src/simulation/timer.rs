// Accumulates frame time and hands it out in whole ticks.

#[derive(Debug, Clone)]
pub struct Timer {
    pub max_value: f64,
    pub value: f64,
}

impl Timer {
    /// `max_value` is the tick length in simulated seconds.
    pub fn new(max_value: f64, initial_value: f64) -> Self {
        Self {
            max_value,
            value: initial_value,
        }
    }

    /// At least one whole tick is pending.
    pub fn is_ready(&self) -> bool {
        self.value >= self.max_value
    }

    pub fn update(&mut self, elapsed: f64) {
        self.value += elapsed;
    }

    /// Consumes one period, keeping any overshoot for the next one.
    pub fn consume(&mut self) {
        self.value -= self.max_value;
    }

    /// Drops accumulated time beyond `periods` pending periods.
    pub fn cap(&mut self, periods: f64) {
        self.value = self.value.min(self.max_value * periods);
    }
}
