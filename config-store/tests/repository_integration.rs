use anyhow::Result;
use config_store::{
    codec, name, ConfigRepository, MergeEngine, ObjectStoreAdapter, RepositoryOptions,
    StorageError, StoreConfig,
};
use shared_types::Document;
use std::sync::Arc;
use tempfile::TempDir;

fn create_local_repository() -> Result<(Arc<ConfigRepository>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = StoreConfig::Local {
        path: temp_dir.path().to_path_buf(),
    };
    let adapter = Arc::new(ObjectStoreAdapter::from_config(config)?);
    let repository = Arc::new(ConfigRepository::new(
        adapter,
        RepositoryOptions::default(),
    ));
    Ok((repository, temp_dir))
}

fn document(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!("test document must be an object"),
    }
}

// ============================================================================
// Publish / Fetch Lifecycle
// ============================================================================

#[tokio::test]
async fn test_publish_fetch_lifecycle() -> Result<()> {
    let (repo, _dir) = create_local_repository()?;

    let v1 = document(serde_json::json!({"version": "1.0", "pool_size": 10}));
    let v2 = document(serde_json::json!({"version": "2.0", "pool_size": 20}));

    repo.publish("database", Some("1.0"), &v1).await?;
    repo.publish("database", Some("2.0"), &v2).await?;

    // Explicit versions stay immutable; latest follows the newest publish
    assert_eq!(repo.fetch("database", "1.0").await?, v1);
    assert_eq!(repo.fetch("database", "2.0").await?, v2);
    assert_eq!(repo.fetch("database", "latest").await?, v2);

    let listing = repo.list_versions("database").await?;
    assert_eq!(listing.versions, vec!["1.0", "2.0"]);
    assert_eq!(listing.latest.as_deref(), Some("2.0"));

    Ok(())
}

#[tokio::test]
async fn test_append_only_versions() -> Result<()> {
    let (repo, _dir) = create_local_repository()?;

    let original = document(serde_json::json!({"version": "1.0", "value": "first"}));
    repo.publish("service", Some("1.0"), &original).await?;

    let replacement = document(serde_json::json!({"version": "1.0", "value": "second"}));
    let err = repo
        .publish("service", Some("1.0"), &replacement)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::VersionAlreadyExists(_)));

    // The failed publish must not have moved latest either
    assert_eq!(repo.fetch("service", "latest").await?["value"], "first");

    Ok(())
}

#[tokio::test]
async fn test_errors_carry_context() -> Result<()> {
    let (repo, _dir) = create_local_repository()?;

    let err = repo.fetch("payments", "3.1").await.unwrap_err();
    assert!(err.to_string().contains("payments@3.1"));

    let err = repo
        .publish("payments", None, &Document::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("payments"));
    assert!(err.to_string().contains("version"));

    Ok(())
}

// ============================================================================
// End-to-End Merge Flow
// ============================================================================

#[tokio::test]
async fn test_merge_end_to_end() -> Result<()> {
    let (repo, _dir) = create_local_repository()?;

    let base_doc = document(serde_json::json!({
        "version": "1.0",
        "log_level": "info",
        "timeout": 30
    }));
    let prod_doc = document(serde_json::json!({
        "version": "1.0",
        "log_level": "warn",
        "replicas": 4
    }));
    repo.publish("defaults", Some("1.0"), &base_doc).await?;
    repo.publish("production", Some("1.0"), &prod_doc).await?;

    let engine = MergeEngine::new(repo);
    let identifiers = vec![name::parse("defaults")?, name::parse("production")?];
    let merged = engine.merge(&identifiers).await?;

    // Later sources win; keys unique to either side survive
    assert_eq!(merged["log_level"], "warn");
    assert_eq!(merged["timeout"], 30);
    assert_eq!(merged["replicas"], 4);

    // The merged accumulator itself round-trips through every codec
    for ext in ["json", "yaml", "yml"] {
        let c = codec::codec_for(ext)?;
        assert_eq!(c.decode(&c.encode(&merged)?)?, merged);
    }

    Ok(())
}

// ============================================================================
// Enumeration
// ============================================================================

#[tokio::test]
async fn test_list_bases_enumerates_configs_not_versions() -> Result<()> {
    let (repo, _dir) = create_local_repository()?;

    let doc = document(serde_json::json!({"version": "1.0"}));
    for base in ["api", "web", "worker"] {
        repo.publish(base, Some("1.0"), &doc).await?;
    }
    let doc2 = document(serde_json::json!({"version": "2.0"}));
    repo.publish("api", Some("2.0"), &doc2).await?;

    // Four publishes, three configs
    let bases = repo.list_bases().await?;
    assert_eq!(bases, vec!["api", "web", "worker"]);

    Ok(())
}
