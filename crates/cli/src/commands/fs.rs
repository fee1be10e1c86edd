use std::io::{Read, Write};
use std::path::Path;

use webfs_client::{FileStatus, WebFsClient};
use webfs_core::{Error, Result};

pub fn stat(client: &WebFsClient, path: &str) -> Result<()> {
    let status = client.get_file_status(path)?;
    println!("{}", format_status(&status, path));
    Ok(())
}

pub fn ls(client: &WebFsClient, path: &str) -> Result<()> {
    for status in client.list_status(path)? {
        println!("{}", format_status(&status, &status.path_suffix));
    }
    Ok(())
}

pub fn cat(client: &WebFsClient, path: &str) -> Result<()> {
    let data = client.open(path)?;
    std::io::stdout()
        .write_all(&data)
        .map_err(|e| Error::transport("stdout", e.to_string()))
}

pub fn put(client: &WebFsClient, source: &Path, destination: &str, force: bool) -> Result<()> {
    let data = read_source(source)?;
    client.create(destination, &data, force)?;
    tracing::info!(destination, bytes = data.len(), "uploaded");
    Ok(())
}

pub fn mkdir(client: &WebFsClient, path: &str) -> Result<()> {
    println!("{}", client.mkdirs(path)?);
    Ok(())
}

pub fn rm(client: &WebFsClient, path: &str, recursive: bool) -> Result<()> {
    println!("{}", client.delete(path, recursive)?);
    Ok(())
}

pub fn mv(client: &WebFsClient, source: &str, destination: &str) -> Result<()> {
    println!("{}", client.rename(source, destination)?);
    Ok(())
}

/// Contents of a local file, or stdin for "-"
pub fn read_source(source: &Path) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    let outcome = if source.as_os_str() == "-" {
        std::io::stdin().read_to_end(&mut data).map(|_| ())
    } else {
        std::fs::File::open(source).and_then(|mut f| f.read_to_end(&mut data).map(|_| ()))
    };
    outcome.map_err(|e| {
        Error::configuration(format!("cannot read '{}': {e}", source.display()))
    })?;
    Ok(data)
}

pub fn format_status(status: &FileStatus, name: &str) -> String {
    let kind = if status.is_dir() { 'd' } else { '-' };
    format!(
        "{kind}{:>4} {:>3} {:<10} {:<10} {:>12} {}",
        status.permission, status.replication, status.owner, status.group, status.length, name
    )
}
