//! Constant long signal generation.

/// Per-period signal and its first difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSeries {
    pub signal: Vec<i32>,
    /// `signal[i] - signal[i - 1]`; undefined for the first period.
    pub position: Vec<Option<i32>>,
}

impl SignalSeries {
    /// Builds a series from raw signal values, deriving the position change.
    pub fn from_signal(signal: Vec<i32>) -> Self {
        let position = std::iter::once(None)
            .chain(signal.windows(2).map(|w| Some(w[1] - w[0])))
            .take(signal.len())
            .collect();
        Self { signal, position }
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }
}

/// Hold-long signal for `len` periods.
pub fn hold_signals(len: usize) -> SignalSeries {
    SignalSeries::from_signal(vec![1; len])
}
