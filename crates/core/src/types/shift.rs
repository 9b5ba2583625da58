//! Work shift codes.

/// One of the three fixed work shifts that partition a day at a gate.
///
/// The backend sends shifts as bare integers. Codes outside `1..=3` do not
/// map to a variant and are ignored by the per-shift statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shift {
    First,
    Second,
    Third,
}

impl Shift {
    /// All shifts in display order.
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    /// Map a wire code to a shift.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    /// The wire code for this shift.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    /// Chart label, e.g. `Shift 2`.
    #[must_use]
    pub fn label(self) -> String {
        format!("Shift {}", self.code())
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_codes_round_trip() {
        for shift in Shift::ALL {
            assert_eq!(Shift::from_code(shift.code()), Some(shift));
        }
        assert_eq!(Shift::from_code(0), None);
        assert_eq!(Shift::from_code(4), None);
    }

    #[test]
    fn test_shift_label() {
        assert_eq!(Shift::Third.label(), "Shift 3");
    }
}
