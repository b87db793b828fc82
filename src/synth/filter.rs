//! One-pole low-pass filter
//!
//! Exponential smoothing: `y[i] = alpha * x[i] + (1 - alpha) * y[i - 1]`,
//! seeded with the first input so the output starts where the signal does.

/// Smoothing coefficient used when none is configured.
pub const DEFAULT_ALPHA: f64 = 0.1;

/// Single-pole IIR low-pass filter
#[derive(Debug, Clone)]
pub struct OnePole {
    alpha: f64,
    state: Option<f64>,
}

impl OnePole {
    /// Create a filter with the given smoothing coefficient
    ///
    /// `alpha` is clamped to `(0, 1]`; 1.0 passes the input through unchanged.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: clamp_alpha(alpha),
            state: None,
        }
    }

    /// Get the smoothing coefficient
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Reset filter state (clear history)
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Process a single sample through the filter
    pub fn process(&mut self, input: f64) -> f64 {
        let output = match self.state {
            None => input,
            Some(prev) => self.alpha * input + (1.0 - self.alpha) * prev,
        };
        self.state = Some(output);
        output
    }

    /// Process a buffer of samples in place, front to back
    pub fn process_buffer(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

impl Default for OnePole {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

pub(crate) fn clamp_alpha(alpha: f64) -> f64 {
    if alpha.is_finite() && alpha > 0.0 {
        alpha.min(1.0)
    } else {
        DEFAULT_ALPHA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_first_sample_passes_through() {
        let mut filter = OnePole::default();
        assert_eq!(filter.process(0.8), 0.8);
    }

    #[test]
    fn test_recurrence() {
        let mut filter = OnePole::new(0.1);
        let mut buffer = vec![1.0, 0.0, 0.0];
        filter.process_buffer(&mut buffer);

        assert_eq!(buffer[0], 1.0);
        assert!((buffer[1] - 0.9).abs() < 1e-12);
        assert!((buffer[2] - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_alpha_clamping() {
        assert_eq!(OnePole::new(5.0).alpha(), 1.0);
        assert_eq!(OnePole::new(0.0).alpha(), DEFAULT_ALPHA);
        assert_eq!(OnePole::new(f64::NAN).alpha(), DEFAULT_ALPHA);
    }

    #[test]
    fn test_reset() {
        let mut filter = OnePole::new(0.1);
        filter.process(1.0);
        filter.reset();
        assert_eq!(filter.process(-0.5), -0.5);
    }

    #[test]
    fn test_attenuates_high_frequencies() {
        let mut filter = OnePole::new(0.1);

        // Alternating +1/-1 is the Nyquist frequency
        let mut max_output = 0.0f64;
        for i in 0..1000 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            let output = filter.process(input);
            if i > 100 {
                max_output = max_output.max(output.abs());
            }
        }

        assert!(max_output < 0.1, "Expected attenuation, got {}", max_output);
    }

    #[test]
    fn test_passes_low_frequencies() {
        let mut filter = OnePole::new(0.1);

        let freq = 20.0;
        let mut sum_input_sq = 0.0;
        let mut sum_output_sq = 0.0;
        for i in 0..44100 {
            let t = i as f64 / 44100.0;
            let input = (2.0 * PI * freq * t).sin();
            let output = filter.process(input);
            sum_input_sq += input * input;
            sum_output_sq += output * output;
        }

        let ratio = (sum_output_sq / sum_input_sq).sqrt();
        assert!(ratio > 0.9, "Expected passthrough, got ratio={}", ratio);
    }
}
