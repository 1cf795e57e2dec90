//! Call priority (severity) shared by calls, routes and policies.

/// Severity of a call.  `High` is the most urgent.
///
/// The derived `Ord` follows declaration order, so `High < Med < Low`:
/// sorting ascending puts the most urgent first.  Use
/// [`is_more_urgent_than`][Self::is_more_urgent_than] in decision code to
/// avoid reading the comparison backwards.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Priority {
    High,
    #[default]
    Med,
    /// Also used for non-emergency travel (returning, moving up).
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Med, Priority::Low];
    pub const COUNT: usize = 3;

    /// Position in [`Priority::ALL`]; used to index per-priority arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_more_urgent_than(self, other: Priority) -> bool {
        self < other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Med  => "med",
            Priority::Low  => "low",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::EmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "1" => Ok(Priority::High),
            "med" | "medium" | "2" => Ok(Priority::Med),
            "low" | "3" => Ok(Priority::Low),
            other => Err(crate::EmsError::Parse(format!("unknown priority {other:?}"))),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
