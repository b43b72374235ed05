//! Version command

use crate::cli::VersionArgs;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: &'static str,
    target_os: &'static str,
    target_arch: &'static str,
}

impl VersionInfo {
    fn current() -> Self {
        Self {
            version: imgbump_update::VERSION,
            target_os: std::env::consts::OS,
            target_arch: std::env::consts::ARCH,
        }
    }
}

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("imgbump {} ({}-{})", info.version, info.target_os, info.target_arch);
    }

    Ok(())
}
