use std::path::Path;
use std::process::Command;

/// Asks ffprobe for the duration of a media file, in seconds.
pub fn probe_duration(file_path: &Path) -> anyhow::Result<f64> {
    let output = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(file_path)
        .output()?;

    if !output.status.success() {
        return Err(anyhow::anyhow!("ffprobe failed for {}", file_path.display()));
    }

    let json_str = String::from_utf8(output.stdout)?;
    let info: serde_json::Value = serde_json::from_str(&json_str)?;

    let duration = info["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(duration)
}
