//! Deck compilation and writing.

use crate::chemistry::ChemistryTemplate;
use crate::error::{DeckError, DeckResult};
use ds_mixture::{Mixture, MoleTable};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Specific volume reported for a failed density pass.
pub const DENSITY_SENTINEL: f64 = -1.0;

/// Which of the two passes a deck belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeckVariant {
    /// First pass: the simulator computes the standard volume itself.
    DensityUnknown,
    /// Second pass: Chapman-Jouguet solve at a known specific volume [cc/g].
    DensityKnown { specific_volume: f64 },
}

/// A compiled simulator input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDeck {
    pub variant: DeckVariant,
    pub concentration: f64,
    pub text: String,
}

/// Chapman-Jouguet directive at 1 atm initial pressure and the given
/// specific volume.
pub fn density_directive(specific_volume: f64) -> String {
    format!("c-j,p,1.,v,{}", specific_volume)
}

/// Compile a deck for one concentration point.
///
/// `density` selects the variant. A sentinel, non-finite or non-positive
/// density fails with [`DeckError::DensityInvalid`] before anything is
/// rendered.
pub fn compile_deck(
    base: &Mixture,
    variable: &Mixture,
    template: &dyn ChemistryTemplate,
    concentration: f64,
    density: Option<f64>,
) -> DeckResult<InputDeck> {
    let variant = match density {
        None => DeckVariant::DensityUnknown,
        Some(v) if v == DENSITY_SENTINEL || !v.is_finite() || v <= 0.0 => {
            return Err(DeckError::DensityInvalid { value: v });
        }
        Some(v) => DeckVariant::DensityKnown { specific_volume: v },
    };

    let table = MoleTable::compose(base, variable, concentration)?;
    let density_line = match variant {
        DeckVariant::DensityUnknown => String::new(),
        DeckVariant::DensityKnown { specific_volume } => density_directive(specific_volume),
    };

    Ok(InputDeck {
        variant,
        concentration,
        text: template.render(&table.com_directive(), &density_line),
    })
}

/// Replace the file at `path` with the deck text.
pub fn write_deck(deck: &InputDeck, path: &Path) -> DeckResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(DeckError::MissingDirectory {
                path: path.to_path_buf(),
            });
        }
    }

    fs::write(path, &deck.text).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DeckError::MissingDirectory {
            path: path.to_path_buf(),
        },
        _ => DeckError::Write {
            path: path.to_path_buf(),
            source,
        },
    })?;

    tracing::debug!(
        path = %path.display(),
        concentration = deck.concentration,
        variant = ?deck.variant,
        "deck written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::Chemistry;

    #[test]
    fn density_unknown_deck_has_no_cj_line() {
        let deck = compile_deck(
            &Mixture::air(),
            &Mixture::methane(),
            &Chemistry::Methane,
            0.1,
            None,
        )
        .unwrap();
        assert_eq!(deck.variant, DeckVariant::DensityUnknown);
        assert!(deck.text.contains("com,o2,1.890,n2,7.110,ch4,1.000,mole"));
        assert!(!deck.text.contains("c-j"));
    }

    #[test]
    fn density_known_deck_has_cj_line() {
        let deck = compile_deck(
            &Mixture::air(),
            &Mixture::ethane(),
            &Chemistry::Ethane,
            0.05,
            Some(123.456),
        )
        .unwrap();
        assert_eq!(
            deck.variant,
            DeckVariant::DensityKnown {
                specific_volume: 123.456
            }
        );
        assert!(deck.text.contains("c-j,p,1.,v,123.456"));
    }

    #[test]
    fn sentinel_density_is_rejected() {
        for bad in [DENSITY_SENTINEL, 0.0, -3.0, f64::NAN, f64::INFINITY] {
            let result = compile_deck(
                &Mixture::air(),
                &Mixture::acetylene(),
                &Chemistry::Acetylene,
                0.2,
                Some(bad),
            );
            assert!(matches!(result, Err(DeckError::DensityInvalid { .. })));
        }
    }

    #[test]
    fn invalid_concentration_is_a_mixture_error() {
        let result = compile_deck(
            &Mixture::air(),
            &Mixture::methane(),
            &Chemistry::Methane,
            1.0,
            None,
        );
        assert!(matches!(result, Err(DeckError::Mixture(_))));
    }
}
