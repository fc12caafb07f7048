use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Mul, Neg},
};

use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

/// The characteristic of the ground field.
pub const PRIME: i64 = 3;

/// A nonzero scalar in F_3, or a scalar that is known to be nonzero but whose value was not
/// determined by the computation.
///
/// Zero is never represented by a `Coefficient`. Operations that may produce zero return an
/// `Option<Coefficient>`, with `None` standing for zero. `Unknown` is absorbing: any sum or
/// product involving it is again `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coefficient {
    /// Either 1 or 2.
    Known(i8),
    Unknown,
}

impl Coefficient {
    pub const ONE: Self = Self::Known(1);
    pub const MINUS_ONE: Self = Self::Known(2);

    /// Reduce an integer mod 3. Returns `None` if it is divisible by 3.
    pub fn from_int(c: i64) -> Option<Self> {
        match c.rem_euclid(PRIME) {
            0 => None,
            r => Some(Self::Known(r as i8)),
        }
    }

    /// The residue in `{1, 2}`, or `None` if unknown.
    pub fn value(self) -> Option<i8> {
        match self {
            Self::Known(c) => Some(c.rem_euclid(PRIME as i8)),
            Self::Unknown => None,
        }
    }

    /// Reduce a `Known` residue into `{1, 2}`. Returns `None` if it is divisible by 3.
    pub fn normalize(self) -> Option<Self> {
        match self {
            Self::Known(c) => Self::from_int(c as i64),
            Self::Unknown => Some(Self::Unknown),
        }
    }

    pub fn is_unknown(self) -> bool {
        self == Self::Unknown
    }

    /// Multiplicative inverse. Every unit of F_3 is its own inverse.
    pub fn inverse(self) -> Self {
        self
    }

    /// The sum of two coefficients, `None` if it vanishes.
    pub fn sum(self, other: Self) -> Option<Self> {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => Self::from_int(a as i64 + b as i64),
            _ => Some(Self::Unknown),
        }
    }
}

impl Add for Coefficient {
    type Output = Option<Self>;

    fn add(self, other: Self) -> Option<Self> {
        self.sum(other)
    }
}

impl Mul for Coefficient {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        match (self, other) {
            // This is only zero if one of the factors is an unreduced zero
            (Self::Known(a), Self::Known(b)) => {
                Self::Known(((a as i64 * b as i64).rem_euclid(PRIME)) as i8)
            }
            _ => Self::Unknown,
        }
    }
}

impl Neg for Coefficient {
    type Output = Self;

    fn neg(self) -> Self {
        self * Self::MINUS_ONE
    }
}

impl Display for Coefficient {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.value() {
            Some(c) => write!(f, "{c}"),
            None => write!(f, "?"),
        }
    }
}

impl Serialize for Coefficient {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value() {
            Some(c) => c.serialize(serializer),
            None => "?".serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Coefficient {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(c) => Self::from_int(c)
                .ok_or_else(|| D::Error::custom(format!("coefficient {c} is zero mod {PRIME}"))),
            Raw::Str(s) if s == "?" => Ok(Self::Unknown),
            Raw::Str(s) => Err(D::Error::custom(format!("invalid coefficient {s:?}"))),
        }
    }
}
