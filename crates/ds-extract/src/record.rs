//! Per-concentration result record.

use ds_core::units::{
    Density, Pressure, SpecEnthalpy, Temperature, Velocity, atm, cal_per_g,
    density_from_cc_per_g, k, mps,
};
use ds_mixture::ProductSpecies;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Results of one concentration point, in the simulator's report units.
///
/// Primary fields are `None` when their pattern did not match. Product yields
/// default to 0.0; `missing` lists every field that had no match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetonationRecord {
    /// Shock velocity [m/s]
    pub velocity: Option<f64>,
    /// C-J pressure [atm]
    pub pressure: Option<f64>,
    /// C-J temperature [K]
    pub temperature: Option<f64>,
    /// Enthalpy [cal/g]
    pub enthalpy: Option<f64>,
    /// Specific volume from the density pass [cc/g]
    pub specific_volume: Option<f64>,
    /// Molar yields [mol/kg], indexed by [`ProductSpecies::index`]
    pub products: [f64; ProductSpecies::ALL.len()],
    /// Total gas yield [mol/kg]
    pub total_gas: f64,
    pub missing: Vec<RecordField>,
}

impl DetonationRecord {
    pub fn product(&self, species: ProductSpecies) -> f64 {
        self.products[species.index()]
    }

    pub fn set_product(&mut self, species: ProductSpecies, value: f64) {
        self.products[species.index()] = value;
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn velocity_si(&self) -> Option<Velocity> {
        self.velocity.map(mps)
    }

    pub fn pressure_si(&self) -> Option<Pressure> {
        self.pressure.map(atm)
    }

    pub fn temperature_si(&self) -> Option<Temperature> {
        self.temperature.map(k)
    }

    pub fn enthalpy_si(&self) -> Option<SpecEnthalpy> {
        self.enthalpy.map(cal_per_g)
    }

    pub fn density_si(&self) -> Option<Density> {
        self.specific_volume
            .filter(|v| *v > 0.0)
            .map(density_from_cc_per_g)
    }
}

/// One dataset column of a [`DetonationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Velocity,
    Pressure,
    Temperature,
    Enthalpy,
    SpecificVolume,
    Product(ProductSpecies),
    TotalGas,
}

impl RecordField {
    /// Every column in declared order.
    pub fn all() -> impl Iterator<Item = RecordField> {
        [
            RecordField::Velocity,
            RecordField::Pressure,
            RecordField::Temperature,
            RecordField::Enthalpy,
            RecordField::SpecificVolume,
        ]
        .into_iter()
        .chain(ProductSpecies::ALL.into_iter().map(RecordField::Product))
        .chain(std::iter::once(RecordField::TotalGas))
    }

    pub fn name(&self) -> String {
        match self {
            RecordField::Velocity => "velocity".to_string(),
            RecordField::Pressure => "pressure".to_string(),
            RecordField::Temperature => "temperature".to_string(),
            RecordField::Enthalpy => "enthalpy".to_string(),
            RecordField::SpecificVolume => "specific_volume".to_string(),
            RecordField::Product(species) => species.column(),
            RecordField::TotalGas => "product_total_gas".to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|f| f.name() == name)
    }

    pub fn unit(&self) -> &'static str {
        match self {
            RecordField::Velocity => "m/s",
            RecordField::Pressure => "atm",
            RecordField::Temperature => "K",
            RecordField::Enthalpy => "cal/g",
            RecordField::SpecificVolume => "cc/g",
            RecordField::Product(_) | RecordField::TotalGas => "mol/kg",
        }
    }

    pub fn get(&self, record: &DetonationRecord) -> Option<f64> {
        match self {
            RecordField::Velocity => record.velocity,
            RecordField::Pressure => record.pressure,
            RecordField::Temperature => record.temperature,
            RecordField::Enthalpy => record.enthalpy,
            RecordField::SpecificVolume => record.specific_volume,
            RecordField::Product(species) => Some(record.product(*species)),
            RecordField::TotalGas => Some(record.total_gas),
        }
    }

    /// Value in SI base units with its unit symbol. Yields have no SI form.
    pub fn si_value(&self, record: &DetonationRecord) -> Option<(f64, &'static str)> {
        match self {
            RecordField::Velocity => record.velocity_si().map(|v| (v.value, "m/s")),
            RecordField::Pressure => record.pressure_si().map(|p| (p.value, "Pa")),
            RecordField::Temperature => record.temperature_si().map(|t| (t.value, "K")),
            RecordField::Enthalpy => record.enthalpy_si().map(|h| (h.value, "J/kg")),
            RecordField::SpecificVolume => record.density_si().map(|d| (d.value, "kg/m3")),
            RecordField::Product(_) | RecordField::TotalGas => None,
        }
    }

    /// Store a value; yields fall back to 0.0 when `value` is `None`.
    pub fn set(&self, record: &mut DetonationRecord, value: Option<f64>) {
        match self {
            RecordField::Velocity => record.velocity = value,
            RecordField::Pressure => record.pressure = value,
            RecordField::Temperature => record.temperature = value,
            RecordField::Enthalpy => record.enthalpy = value,
            RecordField::SpecificVolume => record.specific_volume = value,
            RecordField::Product(species) => record.set_product(*species, value.unwrap_or(0.0)),
            RecordField::TotalGas => record.total_gas = value.unwrap_or(0.0),
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

// Serialized as a flat object keyed by column name; `missing` is diagnostic
// only and stays out of the dataset.
impl Serialize for DetonationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields: Vec<RecordField> = RecordField::all().collect();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in fields {
            map.serialize_entry(&field.name(), &field.get(self))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DetonationRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = DetonationRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of result columns")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut record = DetonationRecord::default();
                while let Some(key) = access.next_key::<String>()? {
                    match RecordField::from_name(&key) {
                        Some(field) => {
                            let value: Option<f64> = access.next_value()?;
                            field.set(&mut record, value);
                        }
                        None => {
                            access.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}
