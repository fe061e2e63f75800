//! Reaction product species reported by the simulator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase a product yield is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Gas,
    Solid,
}

/// Product species whose molar yields (mol/kg) are read from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSpecies {
    /// Solid carbon
    C,
    /// Cyanogen radical
    C2N,
    /// Methane (CH₄)
    CH4,
    /// Carbon monoxide (CO)
    CO,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Hydrogen (H₂)
    H2,
    /// Water (H₂O)
    H2O,
    /// Hydrogen cyanide
    HCN,
    /// Formyl radical
    HCO,
    /// Nitrogen (N₂)
    N2,
    /// Ammonia (NH₃)
    NH3,
    /// Nitric oxide
    NO,
    /// Nitrogen dioxide
    NO2,
    /// Nitrous oxide (N₂O)
    N2O,
    /// Oxygen (O₂)
    O2,
}

impl ProductSpecies {
    /// Declared order; also the report column order.
    pub const ALL: [ProductSpecies; 15] = [
        ProductSpecies::C,
        ProductSpecies::C2N,
        ProductSpecies::CH4,
        ProductSpecies::CO,
        ProductSpecies::CO2,
        ProductSpecies::H2,
        ProductSpecies::H2O,
        ProductSpecies::HCN,
        ProductSpecies::HCO,
        ProductSpecies::N2,
        ProductSpecies::NH3,
        ProductSpecies::NO,
        ProductSpecies::NO2,
        ProductSpecies::N2O,
        ProductSpecies::O2,
    ];

    /// Identifier as printed by the simulator.
    pub fn key(&self) -> &'static str {
        match self {
            ProductSpecies::C => "c",
            ProductSpecies::C2N => "c2n",
            ProductSpecies::CH4 => "ch4",
            ProductSpecies::CO => "co",
            ProductSpecies::CO2 => "co2",
            ProductSpecies::H2 => "h2",
            ProductSpecies::H2O => "h2o",
            ProductSpecies::HCN => "hcn",
            ProductSpecies::HCO => "hco",
            ProductSpecies::N2 => "n2",
            ProductSpecies::NH3 => "nh3",
            ProductSpecies::NO => "no",
            ProductSpecies::NO2 => "no2",
            ProductSpecies::N2O => "n2o",
            ProductSpecies::O2 => "o2",
        }
    }

    /// Position in [`ProductSpecies::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Carbon is only reported as a condensed phase.
    pub fn phase(&self) -> Phase {
        match self {
            ProductSpecies::C => Phase::Solid,
            _ => Phase::Gas,
        }
    }

    /// Dataset column name, e.g. `product_co2`.
    pub fn column(&self) -> String {
        format!("product_{}", self.key())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|s| s.key() == key)
    }
}

impl fmt::Display for ProductSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_roundtrip() {
        for species in ProductSpecies::ALL {
            assert_eq!(ProductSpecies::from_key(species.key()), Some(species));
        }
        assert_eq!(ProductSpecies::from_key("CO2"), Some(ProductSpecies::CO2));
        assert_eq!(ProductSpecies::from_key("c2h2"), None);
    }

    #[test]
    fn index_follows_declared_order() {
        for (i, species) in ProductSpecies::ALL.iter().enumerate() {
            assert_eq!(species.index(), i);
        }
    }

    #[test]
    fn only_carbon_is_solid() {
        let solids: Vec<_> = ProductSpecies::ALL
            .iter()
            .filter(|s| s.phase() == Phase::Solid)
            .collect();
        assert_eq!(solids, vec![&ProductSpecies::C]);
    }

    #[test]
    fn column_names() {
        assert_eq!(ProductSpecies::N2O.column(), "product_n2o");
        assert_eq!(ProductSpecies::C.to_string(), "c");
    }
}
