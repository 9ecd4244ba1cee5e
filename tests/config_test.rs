// ==========================================
// 构建配置测试
// ==========================================
// 测试目标: JSON 配置读取、配置骨架生成、运行参数
// ==========================================


use program_builder::api::WorkbookSession;
use program_builder::config::{settings_keys, AppSettings, BuildConfig, ConfigError};
use program_builder::domain::{IdStrategy, SheetType};
use std::time::Duration;
use test_helpers::{program_table, raw_table, sponsors_table, InMemorySource};

const CONFIG_JSON: &str = r#"{
  "sheets": [
    {
      "name": "Oct 16",
      "key": "oct16",
      "slug": "oct16",
      "date_label": "Thursday, Oct 16",
      "mapping": {"time": "Hora", "title": "Tema", "speaker": "Ponente", "chair": null},
      "options": {"split_speakers_by": ";"}
    },
    {
      "name": "Sponsors",
      "key": "sponsors",
      "slug": "sponsors",
      "sheet_type": "sponsors",
      "id_strategy": "uid-column",
      "uid_column": "ID",
      "mapping": {"name": "Name", "logo": "Logo"}
    }
  ]
}"#;

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, CONFIG_JSON).unwrap();

    let config = BuildConfig::from_path(&path).unwrap();
    assert_eq!(config.sheets.len(), 2);

    let program = &config.sheets[0];
    assert_eq!(program.sheet_type, SheetType::Program);
    assert_eq!(program.date_label.as_deref(), Some("Thursday, Oct 16"));
    assert!(program.options.chair_from_speaker);
    assert_eq!(program.options.split_speakers_by.as_deref(), Some(";"));

    let sponsors = &config.sheets[1];
    assert_eq!(sponsors.id_strategy, IdStrategy::UidColumn);
    assert_eq!(sponsors.effective_uid_column(), Some("ID"));
}

#[test]
fn test_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = BuildConfig::from_path(dir.path().join("none.json"));
    assert!(matches!(missing, Err(ConfigError::Read { .. })));

    let invalid = BuildConfig::from_json_str(r#"{"sheets":[{"name":"x"}]}"#);
    assert!(matches!(invalid, Err(ConfigError::Parse(_))));

    let bad_type = BuildConfig::from_json_str(
        r#"{"sheets":[{"name":"x","key":"x","slug":"x","sheet_type":"agenda"}]}"#,
    );
    assert!(bad_type.is_err());
}

#[tokio::test]
async fn test_config_round_trip_through_preview() {
    let mut session = WorkbookSession::default();
    session
        .load(&InMemorySource::new(vec![program_table(), sponsors_table()]))
        .await
        .unwrap();

    let config = BuildConfig::from_json_str(CONFIG_JSON).unwrap();
    let response = session.preview(&config).unwrap();
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data.keys(), vec!["oct16", "sponsors"]);
}

#[tokio::test]
async fn test_skeleton_config_from_guess() {
    let mut session = WorkbookSession::default();
    let summaries = session
        .load(&InMemorySource::new(vec![
            program_table(),
            sponsors_table(),
            raw_table("Ponentes", &["Nombre", "Bio"], &[&["Dr. X", "..."]]),
        ]))
        .await
        .unwrap();

    let config = BuildConfig::from_guess(&summaries);
    let kinds: Vec<SheetType> = config.sheets.iter().map(|s| s.sheet_type).collect();
    assert_eq!(kinds, vec![SheetType::Program, SheetType::Sponsors, SheetType::Faculty]);

    let program = &config.sheets[0];
    assert_eq!(program.key, "oct_16");
    assert_eq!(program.mapping.get("time"), Some(&Some("Hora".to_string())));

    // 骨架配置可直接预览
    let response = session.preview(&config).unwrap();
    assert!(response.data.get("oct_16").is_some());
    assert_eq!(
        response.data.get("ponentes").unwrap().as_items().unwrap()[0].get("nombre"),
        Some("Dr. X")
    );
}

#[test]
fn test_app_settings_from_lookup() {
    let settings = AppSettings::from_lookup(|key| match key {
        k if k == settings_keys::FETCH_TIMEOUT_SECS => Some("5".to_string()),
        _ => None,
    });
    assert_eq!(settings.fetch_timeout, Duration::from_secs(5));
    assert_eq!(settings.output_file, "program.json");
}
