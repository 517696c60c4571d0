//! Wireline diameter classes and their fixed annulus geometry.
//!
//! Each class fixes the core-tube inner diameter and the bit outer diameter,
//! which together define the annular gap the drilling fluid flows through.
//! The table is the standard wireline coring series.

/// Wireline diameter classes supported by the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitClass {
    Nq,
    Hq,
    Pq,
}

impl BitClass {
    /// All classes, in ascending diameter order.
    pub const ALL: [BitClass; 3] = [BitClass::Nq, BitClass::Hq, BitClass::Pq];

    /// Parse a configuration code. Unknown codes return `None`; the config
    /// layer turns that into a configuration error.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NQ" => Some(BitClass::Nq),
            "HQ" => Some(BitClass::Hq),
            "PQ" => Some(BitClass::Pq),
            _ => None,
        }
    }

    /// Configuration code for this class.
    #[inline]
    pub const fn code(self) -> &'static str {
        match self {
            BitClass::Nq => "NQ",
            BitClass::Hq => "HQ",
            BitClass::Pq => "PQ",
        }
    }

    /// Core-tube inner diameter (m). This bounds the core itself.
    #[inline]
    pub const fn tube_diameter(self) -> f64 {
        match self {
            BitClass::Nq => 0.045,
            BitClass::Hq => 0.0611,
            BitClass::Pq => 0.083,
        }
    }

    /// Bit outer diameter (m). This bounds the hole.
    #[inline]
    pub const fn bit_diameter(self) -> f64 {
        match self {
            BitClass::Nq => 0.0476,
            BitClass::Hq => 0.0635,
            BitClass::Pq => 0.085,
        }
    }
}
