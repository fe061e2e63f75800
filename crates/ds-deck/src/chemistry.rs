//! Fuel chemistries and their formation tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ideal-gas molar volume at 298.15 K in cc/mol, used by every `for,` card.
pub const MOLAR_VOLUME_CC: f64 = 24465.0;

/// One `for,` directive: a species' heat of formation and atom composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub species: String,
    /// Heat of formation [cal/mol]
    pub heat_of_formation: f64,
    /// Reference molar volume [cc/mol]
    #[serde(default = "default_molar_volume")]
    pub molar_volume: f64,
    #[serde(default)]
    pub entropy: f64,
    /// `(element, count)` pairs
    pub atoms: Vec<(String, u32)>,
}

fn default_molar_volume() -> f64 {
    MOLAR_VOLUME_CC
}

impl Formation {
    pub fn new(species: &str, heat_of_formation: f64, atoms: &[(&str, u32)]) -> Self {
        Self {
            species: species.to_string(),
            heat_of_formation,
            molar_volume: MOLAR_VOLUME_CC,
            entropy: 0.0,
            atoms: atoms.iter().map(|(e, n)| (e.to_string(), *n)).collect(),
        }
    }

    /// Render as `for,<species>,<hf>,<volume>,<entropy>,<el>,<n>,...`.
    pub fn directive(&self) -> String {
        let mut line = format!(
            "for,{},{},{},{}",
            self.species,
            real_literal(self.heat_of_formation),
            real_literal(self.molar_volume),
            real_literal(self.entropy)
        );
        for (element, count) in &self.atoms {
            line.push_str(&format!(",{},{}", element, count));
        }
        line
    }
}

/// Whole numbers are written with a trailing dot (`-17830.`), as the
/// simulator's reader expects reals.
fn real_literal(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.0}.", v)
    } else {
        format!("{}", v)
    }
}

/// Capability of turning a composition line and a density line into a deck.
///
/// Implementors provide their formation table and any equation-of-state
/// settings; the surrounding layout is shared.
pub trait ChemistryTemplate {
    fn name(&self) -> &str;

    /// Formation directives for every species that can appear in the deck.
    fn formations(&self) -> Vec<Formation>;

    /// Extra `set,` directives emitted after the equation of state.
    fn settings(&self) -> Vec<String> {
        Vec::new()
    }

    fn equation_of_state(&self) -> &str {
        "geos, ideal"
    }

    /// Assemble the full deck text.
    fn render(&self, com: &str, density: &str) -> String {
        let mut lines: Vec<String> = vec![self.equation_of_state().to_string(), String::new()];

        let settings = self.settings();
        if !settings.is_empty() {
            lines.extend(settings);
            lines.push(String::new());
        }

        lines.extend(self.formations().iter().map(Formation::directive));
        lines.push(String::new());
        lines.push("reactants reaction".to_string());
        lines.push(String::new());
        lines.push(com.to_string());
        lines.push(String::new());
        lines.push(density.to_string());
        lines.push(String::new());
        lines.push("stop".to_string());
        lines.join("\n")
    }
}

/// Chemistry defined entirely by data, e.g. loaded from a sweep configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomChemistry {
    pub name: String,
    #[serde(default)]
    pub settings: Vec<String>,
    pub formations: Vec<Formation>,
}

impl ChemistryTemplate for CustomChemistry {
    fn name(&self) -> &str {
        &self.name
    }

    fn formations(&self) -> Vec<Formation> {
        self.formations.clone()
    }

    fn settings(&self) -> Vec<String> {
        self.settings.clone()
    }
}

/// Fuel/oxidizer chemistries known to the sweep tool.
#[derive(Debug, Clone, PartialEq)]
pub enum Chemistry {
    /// Methane in air
    Methane,
    /// Acetylene in air, with BKW equation-of-state parameters
    Acetylene,
    /// Ethane in air
    Ethane,
    Custom(CustomChemistry),
}

impl Chemistry {
    pub const BUILTIN_NAMES: [&'static str; 3] = ["methane", "acetylene", "ethane"];

    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "methane" | "ch4" => Some(Chemistry::Methane),
            "acetylene" | "c2h2" => Some(Chemistry::Acetylene),
            "ethane" | "c2h6" => Some(Chemistry::Ethane),
            _ => None,
        }
    }

    fn air_formations() -> [Formation; 2] {
        [
            Formation::new("n2", 0.0, &[("n", 2)]),
            Formation::new("o2", 0.0, &[("o", 2)]),
        ]
    }
}

impl ChemistryTemplate for Chemistry {
    fn name(&self) -> &str {
        match self {
            Chemistry::Methane => "methane",
            Chemistry::Acetylene => "acetylene",
            Chemistry::Ethane => "ethane",
            Chemistry::Custom(custom) => custom.name(),
        }
    }

    fn formations(&self) -> Vec<Formation> {
        let fuel = match self {
            Chemistry::Methane => Formation::new("ch4", -17830.0, &[("c", 1), ("h", 4)]),
            Chemistry::Acetylene => Formation::new("c2h2", 54350.0, &[("c", 2), ("h", 2)]),
            Chemistry::Ethane => Formation::new("c2h6", 20076.0, &[("c", 2), ("h", 6)]),
            Chemistry::Custom(custom) => return custom.formations(),
        };
        let mut formations = Self::air_formations().to_vec();
        formations.push(fuel);
        formations
    }

    fn settings(&self) -> Vec<String> {
        match self {
            Chemistry::Acetylene => vec![
                "set,bkw,alpha,0.50".to_string(),
                "set,bkw,beta,0.403".to_string(),
                "set,bkw,kappa,10.86".to_string(),
                "set,bkw,theta,5441".to_string(),
            ],
            Chemistry::Custom(custom) => custom.settings(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formation_directive_format() {
        let ch4 = Formation::new("ch4", -17830.0, &[("c", 1), ("h", 4)]);
        assert_eq!(ch4.directive(), "for,ch4,-17830.,24465.,0.,c,1,h,4");

        let n2 = Formation::new("n2", 0.0, &[("n", 2)]);
        assert_eq!(n2.directive(), "for,n2,0.,24465.,0.,n,2");

        let odd = Formation::new("x", 12.5, &[("c", 1)]);
        assert_eq!(odd.directive(), "for,x,12.5,24465.,0.,c,1");
    }

    #[test]
    fn methane_deck_layout() {
        let text = Chemistry::Methane.render("com,o2,1.000,mole", "");
        let expected = "geos, ideal\n\n\
            for,n2,0.,24465.,0.,n,2\n\
            for,o2,0.,24465.,0.,o,2\n\
            for,ch4,-17830.,24465.,0.,c,1,h,4\n\n\
            reactants reaction\n\n\
            com,o2,1.000,mole\n\n\n\n\
            stop";
        assert_eq!(text, expected);
    }

    #[test]
    fn acetylene_carries_bkw_settings() {
        let text = Chemistry::Acetylene.render("com,c2h2,1.000,mole", "c-j,p,1.,v,2.5");
        assert!(text.contains("set,bkw,theta,5441"));
        assert!(text.contains("for,c2h2,54350.,24465.,0.,c,2,h,2"));
        assert!(text.contains("c-j,p,1.,v,2.5"));
        assert!(text.ends_with("stop"));
    }

    #[test]
    fn builtin_lookup() {
        for name in Chemistry::BUILTIN_NAMES {
            assert_eq!(Chemistry::builtin(name).unwrap().name(), name);
        }
        assert!(Chemistry::builtin("propane").is_none());
    }

    #[test]
    fn custom_chemistry_uses_its_own_table() {
        let custom = Chemistry::Custom(CustomChemistry {
            name: "hydrogen".to_string(),
            settings: vec!["set,bkw,alpha,0.5".to_string()],
            formations: vec![
                Formation::new("h2", 0.0, &[("h", 2)]),
                Formation::new("o2", 0.0, &[("o", 2)]),
            ],
        });
        let text = custom.render("com,h2,2.000,o2,8.000,mole", "");
        assert_eq!(custom.name(), "hydrogen");
        assert!(text.contains("for,h2,0.,24465.,0.,h,2"));
        assert!(text.contains("set,bkw,alpha,0.5"));
        assert!(!text.contains("for,n2"));
    }
}
