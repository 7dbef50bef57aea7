use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColourMapKinds {
    #[default]
    Banded,
    Grayscale,
}

impl ColourMapKinds {
    pub const ALL: &'static [Self] = &[Self::Banded, Self::Grayscale];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Banded => "Banded",
            Self::Grayscale => "Grayscale",
        }
    }
}

impl std::fmt::Display for ColourMapKinds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).display_name())
    }
}

impl FromStr for ColourMapKinds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown colour map '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_display_names_case_insensitively() {
        assert_eq!("grayscale".parse(), Ok(ColourMapKinds::Grayscale));
        assert_eq!(" Banded ".parse(), Ok(ColourMapKinds::Banded));
        assert!("rainbow".parse::<ColourMapKinds>().is_err());
    }
}
