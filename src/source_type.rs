//! The categories of site found in the grid and their classification.
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use strum::EnumIter;

/// The category of a region.
///
/// For generating sites this selects the physical model used to derive hourly production. The
/// remaining categories are consumers, which are modelled as thermal-like plant if they happen to
/// have any production capacity.
#[derive(
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    Debug,
    EnumIter,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
)]
pub enum SourceType {
    #[string = "solar"]
    Solar,
    #[string = "wind"]
    Wind,
    #[string = "hydro"]
    Hydro,
    #[string = "nuclear"]
    Nuclear,
    #[string = "biomass"]
    Biomass,
    #[string = "geothermal"]
    Geothermal,
    #[string = "coal"]
    Coal,
    #[string = "gas"]
    Gas,
    #[string = "oil"]
    Oil,
    #[string = "hospital"]
    Hospital,
    #[string = "police"]
    Police,
    #[string = "university"]
    University,
    #[string = "bank"]
    Bank,
}

impl SourceType {
    /// Whether this category counts as a renewable source.
    ///
    /// Nuclear is deliberately not part of the renewable set.
    pub fn is_renewable(self) -> bool {
        matches!(
            self,
            Self::Solar | Self::Wind | Self::Hydro | Self::Geothermal | Self::Biomass
        )
    }

    /// The capacity factor applied to thermal-like plant.
    pub fn capacity_factor(self) -> f64 {
        match self {
            Self::Nuclear => 0.9,
            Self::Biomass => 0.6,
            _ => 0.7,
        }
    }
}
