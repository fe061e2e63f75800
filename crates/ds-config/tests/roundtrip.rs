use ds_config::*;
use ds_deck::{CustomChemistry, Formation};
use ds_results::ResultFormat;
use std::path::PathBuf;

fn unique_temp_path(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("ds_config_{}_{}.yaml", name, nanos))
}

#[test]
fn roundtrip_yaml_reference_sweep() {
    let config = SweepConfig::reference();
    let path = unique_temp_path("reference");

    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn roundtrip_yaml_inline_mixture_and_custom_chemistry() {
    let mut config = SweepConfig::reference();
    config.base = MixtureDef::Inline {
        name: "oxygen-enriched air".to_string(),
        parts: vec![("o2".to_string(), 0.3), ("n2".to_string(), 0.7)],
    };
    config.variable = MixtureDef::standard("methane");
    config.chemistry = ChemistryDef::Custom(CustomChemistry {
        name: "methane-tuned".to_string(),
        settings: vec!["set,bkw,alpha,0.50".to_string()],
        formations: vec![
            Formation::new("ch4", -17830.0, &[("c", 1), ("h", 4)]),
            Formation::new("n2", 0.0, &[("n", 2)]),
            Formation::new("o2", 0.0, &[("o", 2)]),
        ],
    });
    config.output.format = ResultFormat::Json;
    config.concentrations = ConcentrationPlan::from_points(vec![0.05, 0.095, 0.15]);
    config.simulator.divergence_markers = vec!["singular matrix".to_string()];

    let path = unique_temp_path("inline");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(config, loaded);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn minimal_yaml_uses_defaults() {
    let yaml = r#"
version: 1
simulator:
  working_dir: sim
  executable: tiger
output:
  dir: out
base:
  type: Standard
  name: air
variable:
  type: Standard
  name: CH4
chemistry:
  type: Builtin
  name: methane
concentrations:
  points: [0.05, 0.1]
"#;
    let path = unique_temp_path("minimal");
    std::fs::write(&path, yaml).unwrap();
    let config = load_yaml(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.simulator.timeout_s, 120.0);
    assert_eq!(config.simulator.launcher, None);
    assert_eq!(config.simulator.input_file(), PathBuf::from("sim").join("INPUT"));
    assert_eq!(config.simulator.output_file(), PathBuf::from("sim").join("output"));
    assert_eq!(config.output.format, ResultFormat::Csv);
    assert_eq!(config.concentrations.generate_points(), vec![0.05, 0.1]);
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let yaml = r#"
version: 1
simulator:
  working_dir: sim
  executable: tiger
output:
  dir: out
base:
  type: Standard
  name: air
variable:
  type: Standard
  name: unobtainium
chemistry:
  type: Builtin
  name: methane
concentrations:
  points: [0.05]
"#;
    let path = unique_temp_path("invalid");
    std::fs::write(&path, yaml).unwrap();
    let err = load_yaml(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);

    assert!(matches!(
        err,
        ConfigError::Validation(ValidationError::UnknownMixture { .. })
    ));
}
