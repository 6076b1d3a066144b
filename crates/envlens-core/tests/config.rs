use envlens_core::config::{ConfigError, EnvlensConfig};
use envlens_core::profiles::{reference_profiles, LocationProfile, ProfileError, ProfileRegistry};
use envlens_core::trend::Resolution;

#[test]
fn reference_registry_has_six_locations() {
    let registry = ProfileRegistry::reference();
    let ids: Vec<&str> = registry.ids().collect();
    assert_eq!(
        ids,
        vec!["room1", "room2", "freezer", "incubator", "planer", "weight_n2"]
    );
    assert_eq!(
        registry.get("incubator").unwrap().variables,
        vec!["inc_co2", "inc_temp"]
    );
    assert_eq!(reference_profiles().len(), 6);
}

#[test]
fn registry_rejects_invalid_profiles() {
    let dup = ProfileRegistry::new(vec![
        LocationProfile::new("lab", "lab.json", ["t"]),
        LocationProfile::new("lab", "lab2.json", ["t"]),
    ]);
    assert_eq!(dup.unwrap_err(), ProfileError::DuplicateId("lab".into()));

    let empty = ProfileRegistry::new(vec![LocationProfile::new("lab", "lab.json", Vec::<String>::new())]);
    assert_eq!(empty.unwrap_err(), ProfileError::NoVariables("lab".into()));

    let repeated = ProfileRegistry::new(vec![LocationProfile::new("lab", "lab.json", ["t", "t"])]);
    assert!(matches!(
        repeated.unwrap_err(),
        ProfileError::DuplicateVariable { .. }
    ));

    let blank = ProfileRegistry::new(vec![LocationProfile::new(" ", "lab.json", ["t"])]);
    assert_eq!(blank.unwrap_err(), ProfileError::EmptyId);
}

#[test]
fn empty_document_keeps_defaults() -> anyhow::Result<()> {
    let config = EnvlensConfig::from_toml_str("")?;
    assert_eq!(config.timestamp_field, "time_stamp");
    assert_eq!(config.trend_resolutions, vec![Resolution::Hour, Resolution::Day]);
    assert_eq!(config.profiles.len(), 6);
    assert_eq!(config.timestamp_parser.formats().len(), 2);
    Ok(())
}

#[test]
fn toml_overrides_every_section() -> anyhow::Result<()> {
    let config = EnvlensConfig::from_toml_str(
        r#"
            data_dir = "/srv/exports"
            timestamp_field = "ts"
            timestamp_formats = ["%Y/%m/%d %H:%M"]
            trend_resolutions = ["minute", "month"]

            [[profiles]]
            id = "greenhouse"
            source = "greenhouse.csv"
            variables = ["temperature", "humidity"]
        "#,
    )?;

    assert_eq!(config.data_dir, std::path::PathBuf::from("/srv/exports"));
    assert_eq!(config.timestamp_field, "ts");
    assert!(config.timestamp_parser.parse("2024/02/29 13:15").is_some());
    assert!(config.timestamp_parser.parse("2024-02-29 13:15:00").is_none());
    assert_eq!(config.trend_resolutions, vec![Resolution::Minute, Resolution::Month]);
    assert_eq!(config.profiles.ids().collect::<Vec<_>>(), vec!["greenhouse"]);
    Ok(())
}

#[test]
fn invalid_documents_are_rejected() {
    assert!(matches!(
        EnvlensConfig::from_toml_str("timestamp_formats = []"),
        Err(ConfigError::NoTimestampFormats)
    ));
    assert!(matches!(
        EnvlensConfig::from_toml_str("unknown_key = 1"),
        Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
        EnvlensConfig::from_toml_str("trend_resolutions = [\"fortnight\"]"),
        Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
        EnvlensConfig::from_toml_str(
            "[[profiles]]\nid = \"a\"\nsource = \"a.json\"\nvariables = []\n"
        ),
        Err(ConfigError::Profile(ProfileError::NoVariables(_)))
    ));
}

#[test]
fn load_reports_missing_file() {
    let err = EnvlensConfig::load(std::path::Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
