use hard75_domain::shared::DomainError;
use hard75_infrastructure::config::{ConfigSource, Environment, RemoteConfigLoader};

fn loader(env: Environment, dir: &std::path::Path) -> RemoteConfigLoader {
    RemoteConfigLoader::new(env)
        .with_config_dir(dir)
        .with_hosting_url(None)
}

#[tokio::test]
async fn remote_config_loads_environment_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("firebase-config.staging.json"),
        r#"{ "apiKey": "stage-key", "projectId": "hard75-staging" }"#,
    )
    .expect("write config");

    let (config, source) = loader(Environment::Staging, dir.path())
        .load()
        .await
        .expect("config found");

    assert_eq!(config.project_id, "hard75-staging");
    assert_eq!(config.api_key.as_deref(), Some("stage-key"));
    assert!(matches!(source, ConfigSource::File(_)));
}

#[tokio::test]
async fn remote_config_missing_is_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    // Only a staging file exists; production looks for the prod file
    std::fs::write(
        dir.path().join("firebase-config.staging.json"),
        r#"{ "projectId": "hard75-staging" }"#,
    )
    .expect("write config");

    let err = loader(Environment::Production, dir.path())
        .load()
        .await
        .expect_err("no prod config");

    match err {
        DomainError::Config(msg) => assert!(msg.starts_with("Firebase config not found")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[tokio::test]
async fn remote_config_unreadable_file_falls_through() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("firebase-config.prod.json"), "not json").expect("write");

    let result = loader(Environment::Local, dir.path()).load().await;
    assert!(matches!(result, Err(DomainError::Config(_))));
}
