use anyhow::Result;
use sparky_infrastructure::SparkyPaths;

/// Prints the resolved configuration and state locations.
pub fn run() -> Result<()> {
    let config_file = SparkyPaths::config_file().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let secret_file = SparkyPaths::secret_file().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let state_dir = SparkyPaths::state_dir().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let logs_dir = SparkyPaths::logs_dir().map_err(|e| anyhow::anyhow!(e.to_string()))?;

    println!("config:  {}", config_file.display());
    println!("secrets: {}", secret_file.display());
    println!("state:   {}", state_dir.display());
    println!("logs:    {}", logs_dir.display());

    Ok(())
}
