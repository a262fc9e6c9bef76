//! The `IncludeArchivedOption` enum exposed to clients.

use std::fmt;
use std::str::FromStr;

use crate::schema::{EnumType, EnumValue};

/// Registered name of the option enum.
pub const INCLUDE_ARCHIVED_OPTION: &str = "IncludeArchivedOption";

const TYPE_DESCRIPTION: &str =
    "Indicates whether archived items should be included in the results or not.";

/// Controls how archived rows are treated by a connection field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncludeArchivedOption {
    /// Exclude archived items.
    No,
    /// Include archived items.
    Yes,
    /// Only include archived items.
    Exclusively,
    /// Follow the parent record: `Yes` when it is archived, `No` otherwise.
    Inherit,
}

impl IncludeArchivedOption {
    /// All options in declaration order.
    pub const ALL: [Self; 4] = [Self::No, Self::Yes, Self::Exclusively, Self::Inherit];

    /// Literal used in the schema.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::No => "NO",
            Self::Yes => "YES",
            Self::Exclusively => "EXCLUSIVELY",
            Self::Inherit => "INHERIT",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::No => "Exclude archived items.",
            Self::Yes => "Include archived items.",
            Self::Exclusively => "Only include archived items (i.e. exclude non-archived items).",
            Self::Inherit => {
                "If there is a parent GraphQL record and it is archived then this is equivalent to YES, in all other cases this is equivalent to NO."
            }
        }
    }
}

impl fmt::Display for IncludeArchivedOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a literal is not one of the four options.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown IncludeArchivedOption value '{0}'")]
pub struct UnknownOption(pub String);

impl FromStr for IncludeArchivedOption {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_owned()))
    }
}

/// Definition of the `IncludeArchivedOption` enum type; every literal resolves to itself.
#[must_use]
pub fn include_archived_option_enum() -> EnumType {
    EnumType {
        name: INCLUDE_ARCHIVED_OPTION.to_owned(),
        description: Some(TYPE_DESCRIPTION.to_owned()),
        values: IncludeArchivedOption::ALL
            .into_iter()
            .map(|o| EnumValue {
                name: o.as_str().to_owned(),
                value: o.as_str().to_owned(),
                description: Some(o.description().to_owned()),
            })
            .collect(),
    }
}
