use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("statline version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
