use anyhow::Result;
use config_store::{
    codec, name, ConfigRepository, MergeEngine, ObjectStoreAdapter, RepositoryOptions,
    StoreConfig,
};
use shared_types::Document;
use std::sync::Arc;

fn document(value: serde_json::Value) -> Result<Document> {
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("document must be an object"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Create a repository over a local "bucket"
    let storage_path = std::env::var("STORAGE_PATH").unwrap_or_else(|_| "./data".to_string());
    println!("Using storage path: {}", storage_path);
    std::fs::create_dir_all(&storage_path)?;

    let adapter = Arc::new(ObjectStoreAdapter::from_config(StoreConfig::local(
        storage_path,
    ))?);
    let repository = Arc::new(ConfigRepository::new(adapter, RepositoryOptions::default()));

    // Publish two versions of a database config
    let v1 = document(serde_json::json!({
        "version": "1.0",
        "host": "db.example.com",
        "port": 5432,
        "pool_size": 20
    }))?;
    println!("\nPublishing database@1.0");
    repository.publish("database", Some("1.0"), &v1).await?;

    let v2 = document(serde_json::json!({
        "version": "2.0",
        "host": "db-new.example.com",
        "port": 5432,
        "pool_size": 30,
        "ssl_enabled": true
    }))?;
    println!("Publishing database@2.0");
    repository.publish("database", Some("2.0"), &v2).await?;

    // Latest follows the newest publish
    println!("\nRetrieving database@latest:");
    let latest = repository.fetch("database", "latest").await?;
    println!("{}", serde_json::to_string_pretty(&latest)?);

    // List versions
    println!("\nListing versions:");
    let listing = repository.list_versions("database").await?;
    for version in &listing.versions {
        println!("  - {}", version);
    }
    println!("Latest: {}", listing.latest.as_deref().unwrap_or("none"));

    // Publish an override config and merge it over the database config
    let overrides = document(serde_json::json!({
        "version": "1.0",
        "pool_size": 5
    }))?;
    println!("\nPublishing overrides@1.0");
    repository.publish("overrides", Some("1.0"), &overrides).await?;

    let engine = MergeEngine::new(repository.clone());
    let identifiers = vec![name::parse("database")?, name::parse("overrides")?];
    let merged = engine.merge(&identifiers).await?;

    println!("\nMerged output as YAML:");
    let yaml = codec::codec_for("yaml")?.encode(&merged)?;
    println!("{}", String::from_utf8(yaml)?);

    // Enumerate all configs in the bucket
    println!("Listing all configs:");
    for base in repository.list_bases().await? {
        println!("  - {}", base);
    }

    Ok(())
}
