use super::{json_pretty, EXIT_SUCCESS};
use reqsync_schema::{read_manifest, ManifestFormat, DEVELOP_SECTION};
use std::path::Path;

/// Print the canonical, sorted form of every package in one manifest.
pub fn run(
    path: &Path,
    format: Option<ManifestFormat>,
    sections: &[String],
    dev: bool,
    json: bool,
) -> Result<u8, String> {
    let format = format.unwrap_or_else(|| ManifestFormat::detect(path));

    let mut sections = sections.to_vec();
    if dev && !sections.iter().any(|s| s == DEVELOP_SECTION) {
        sections.push(DEVELOP_SECTION.to_owned());
    }

    let manifest = read_manifest(path, format, sections.as_slice())
        .map_err(|e| format!("manifest error: {e}"))?;
    let specs = manifest.canonical_specs();

    if json {
        let payload = serde_json::json!({
            "manifest": manifest.path,
            "format": manifest.format,
            "packages": specs,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        for spec in &specs {
            println!("{spec}");
        }
    }
    Ok(EXIT_SUCCESS)
}
