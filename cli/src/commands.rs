use anyhow::{Context, Result};
use config_store::{codec, name, ConfigRepository, MergeEngine};
use std::sync::Arc;

/// Fetch each named config and write `<base>.<ext>` in the current
/// directory. Names are processed independently; the first failure aborts
/// the command but files already written stand.
pub async fn get(repository: &ConfigRepository, names: &[String]) -> Result<()> {
    for raw in names {
        let identifier = name::parse(raw)?;
        let version = identifier.version_or_latest();
        let document = repository.fetch(&identifier.base, version).await?;

        let extension = identifier.extension_or(repository.default_extension());
        let bytes = codec::codec_for(extension)?.encode(&document)?;

        let file_name = format!("{}.{extension}", identifier.base);
        std::fs::write(&file_name, bytes).with_context(|| format!("writing {file_name}"))?;
        println!("{file_name} <- {}@{version}", identifier.base);
    }
    Ok(())
}

/// Read each named local file and publish it as a new immutable version,
/// taking the version from the document's configured version field.
pub async fn put(repository: &ConfigRepository, names: &[String]) -> Result<()> {
    for raw in names {
        let identifier = name::parse(raw)?;
        let extension = identifier.extension_or(repository.default_extension());

        let file_name = format!("{}.{extension}", identifier.base);
        let bytes = std::fs::read(&file_name).with_context(|| format!("reading {file_name}"))?;
        let document = codec::codec_for(extension)?.decode(&bytes)?;

        let version = codec::document_version(&document, repository.version_field());
        let published = repository
            .publish(&identifier.base, version.as_deref(), &document)
            .await?;
        println!("{file_name} -> {}@{published}", identifier.base);
    }
    Ok(())
}

/// Merge the named configs in argument order and write the merged
/// accumulator to the output file.
pub async fn merge(
    repository: Arc<ConfigRepository>,
    names: &[String],
    output: Option<&str>,
) -> Result<()> {
    let identifiers = names
        .iter()
        .map(|raw| name::parse(raw))
        .collect::<config_store::Result<Vec<_>>>()?;
    let default_extension = repository.default_extension().to_string();

    let engine = MergeEngine::new(repository);
    let merged = engine.merge(&identifiers).await?;

    let target = match output {
        Some(raw) => name::parse(raw)?,
        None => engine.default_output(),
    };
    let extension = target.extension_or(&default_extension);
    let bytes = codec::codec_for(extension)?.encode(&merged)?;

    let file_name = format!("{}.{extension}", target.base);
    std::fs::write(&file_name, bytes).with_context(|| format!("writing {file_name}"))?;
    println!("merged {} configs -> {file_name}", identifiers.len());
    Ok(())
}

/// List every config base in the bucket, or the versions of the named bases.
pub async fn list(repository: &ConfigRepository, names: &[String]) -> Result<()> {
    if names.is_empty() {
        for base in repository.list_bases().await? {
            println!("{base}");
        }
        return Ok(());
    }

    for raw in names {
        let identifier = name::parse(raw)?;
        let listing = repository.list_versions(&identifier.base).await?;
        println!("{}:", identifier.base);
        for version in &listing.versions {
            println!("  {version}");
        }
        println!("  latest -> {}", listing.latest.as_deref().unwrap_or("?"));
    }
    Ok(())
}
