//! ds-deck: input deck compiler for the detonation simulator.
//!
//! A deck is plain text in the simulator's directive language. Each fuel
//! chemistry supplies its formation table through [`ChemistryTemplate`];
//! [`compile_deck`] blends the mixtures and assembles the text, and
//! [`write_deck`] replaces the simulator's input file with it.
//!
//! Two variants exist: the density-unknown deck asks the simulator for a
//! standard volume, the density-known deck adds a Chapman-Jouguet directive at
//! that specific volume.

pub mod chemistry;
pub mod deck;
pub mod error;

pub use chemistry::{Chemistry, ChemistryTemplate, CustomChemistry, Formation};
pub use deck::{
    DENSITY_SENTINEL, DeckVariant, InputDeck, compile_deck, density_directive, write_deck,
};
pub use error::{DeckError, DeckResult};
