//! Day-level rainfall intensity classification.
//!
//! Buckets use inclusive upper bounds, so a reading sitting exactly on a
//! boundary belongs to the lower bucket (10.0 mm is `Light`, not `Moderate`).

/// Upper bound (inclusive) of the `Light` bucket, in mm.
pub const LIGHT_MAX_MM: f64 = 10.0;
/// Upper bound (inclusive) of the `Moderate` bucket, in mm.
pub const MODERATE_MAX_MM: f64 = 20.0;
/// Upper bound (inclusive) of the `Heavy` bucket, in mm.
pub const HEAVY_MAX_MM: f64 = 50.0;

/// Per-day rainfall severity.
///
/// [`Intensity::label`] is the text stored in the dataset's `Intensitas`
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Intensity {
    NoRain,
    Light,
    Moderate,
    Heavy,
    VeryHeavy,
    /// The reading was missing or not a usable number.
    NotAvailable,
}

impl Intensity {
    /// Every category, in histogram order.
    pub const ALL: [Intensity; 6] = [
        Intensity::NoRain,
        Intensity::Light,
        Intensity::Moderate,
        Intensity::Heavy,
        Intensity::VeryHeavy,
        Intensity::NotAvailable,
    ];

    /// Label used in the dataset artifact.
    pub fn label(self) -> &'static str {
        match self {
            Intensity::NoRain => "Tidak Hujan",
            Intensity::Light => "Ringan",
            Intensity::Moderate => "Sedang",
            Intensity::Heavy => "Lebat",
            Intensity::VeryHeavy => "Sangat Lebat",
            Intensity::NotAvailable => "N/A",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Intensity::ALL.into_iter().find(|i| i.label() == label)
    }

    /// Position in [`Intensity::ALL`].
    pub fn index(self) -> usize {
        match self {
            Intensity::NoRain => 0,
            Intensity::Light => 1,
            Intensity::Moderate => 2,
            Intensity::Heavy => 3,
            Intensity::VeryHeavy => 4,
            Intensity::NotAvailable => 5,
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a numeric rainfall reading in mm.
///
/// Negative and non-finite values are not valid readings and map to
/// `NotAvailable`.
pub fn classify_mm(rainfall_mm: f64) -> Intensity {
    if !rainfall_mm.is_finite() || rainfall_mm < 0.0 {
        return Intensity::NotAvailable;
    }

    if rainfall_mm == 0.0 {
        Intensity::NoRain
    } else if rainfall_mm <= LIGHT_MAX_MM {
        Intensity::Light
    } else if rainfall_mm <= MODERATE_MAX_MM {
        Intensity::Moderate
    } else if rainfall_mm <= HEAVY_MAX_MM {
        Intensity::Heavy
    } else {
        Intensity::VeryHeavy
    }
}

/// Classify an optional reading; an absent reading is `NotAvailable`.
pub fn classify(reading: Option<f64>) -> Intensity {
    reading.map_or(Intensity::NotAvailable, classify_mm)
}

/// Classify a raw text cell. Empty or non-numeric text is `NotAvailable`.
pub fn classify_text(raw: Option<&str>) -> Intensity {
    match raw.map(str::trim) {
        None | Some("") => Intensity::NotAvailable,
        Some(text) => text
            .parse::<f64>()
            .map_or(Intensity::NotAvailable, classify_mm),
    }
}
