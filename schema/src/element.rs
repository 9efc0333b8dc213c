use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Elemental affinity of a species. Only used to look up damage multipliers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Element {
    Water,
    Earth,
    Air,
    Fire,
    Ice,
    Metal,
    #[default]
    None,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_element_names_round_trip_through_display() {
        for element in Element::iter() {
            let name = element.to_string();
            assert_eq!(Element::from_str(&name), Ok(element));
        }
    }

    #[test]
    fn test_unknown_element_name_is_rejected() {
        assert!(Element::from_str("Lightning").is_err());
        assert_eq!(Element::iter().count(), 7);
    }
}
