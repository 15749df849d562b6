use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Quality/availability code attached to every sample by the measurement network.
///
/// Readers map a code outside of this set to `W`, so it only counts in the
/// month denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StateCode {
    A,
    O,
    R,
    P,
    C,
    Z,
    M,
    D,
    N,
    I,
    W,
}

/// Which counted bucket a state code falls into for the rate math.
///
/// The three counted buckets are mutually exclusive; `Ignored` codes only
/// contribute to the month sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateBucket {
    /// Fully operational samples (A, O, R, P).
    Valid,
    /// Instrument present but degraded (C, Z, M).
    DisponibilityOnly,
    /// Instrument unavailable (D, N, I).
    IndisponibilityLost,
    /// Not separately counted (W).
    Ignored,
}

impl StateCode {
    pub const ALL: [StateCode; 11] = [
        StateCode::A,
        StateCode::O,
        StateCode::R,
        StateCode::P,
        StateCode::C,
        StateCode::Z,
        StateCode::M,
        StateCode::D,
        StateCode::N,
        StateCode::I,
        StateCode::W,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(StateCode::A),
            'O' => Some(StateCode::O),
            'R' => Some(StateCode::R),
            'P' => Some(StateCode::P),
            'C' => Some(StateCode::C),
            'Z' => Some(StateCode::Z),
            'M' => Some(StateCode::M),
            'D' => Some(StateCode::D),
            'N' => Some(StateCode::N),
            'I' => Some(StateCode::I),
            'W' => Some(StateCode::W),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            StateCode::A => 'A',
            StateCode::O => 'O',
            StateCode::R => 'R',
            StateCode::P => 'P',
            StateCode::C => 'C',
            StateCode::Z => 'Z',
            StateCode::M => 'M',
            StateCode::D => 'D',
            StateCode::N => 'N',
            StateCode::I => 'I',
            StateCode::W => 'W',
        }
    }

    pub fn bucket(self) -> StateBucket {
        match self {
            StateCode::A | StateCode::O | StateCode::R | StateCode::P => StateBucket::Valid,
            StateCode::C | StateCode::Z | StateCode::M => StateBucket::DisponibilityOnly,
            StateCode::D | StateCode::N | StateCode::I => StateBucket::IndisponibilityLost,
            StateCode::W => StateBucket::Ignored,
        }
    }

    /// Codes whose values are trusted for monthly maxima and outlier scoring.
    ///
    /// Narrower than the valid bucket: P (provisional) is operational but its
    /// value is not scored.
    pub fn is_scored(self) -> bool {
        matches!(self, StateCode::A | StateCode::O | StateCode::R)
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One quarter-hourly observation of a (site, pollutant) series.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub measurement_id: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub state: StateCode,
    /// Informational only, never read by the rate math.
    pub validated: bool,
}

impl Sample {
    /// The value if this sample may be scored (A/O/R state and a finite value).
    pub fn scored_value(&self) -> Option<f64> {
        if !self.state.is_scored() {
            return None;
        }
        self.value.filter(|v| v.is_finite())
    }
}

/// Identity of one measurement series inside a site table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub site: String,
    pub measurement_id: String,
    pub pollutant: String,
}

impl SeriesKey {
    pub fn new(site: impl Into<String>, measurement_id: impl Into<String>) -> Self {
        let site = site.into();
        let measurement_id = measurement_id.into();
        let pollutant = crate::utils::pollutant_from_measurement_id(&measurement_id, &site);
        Self {
            site,
            measurement_id,
            pollutant,
        }
    }
}
