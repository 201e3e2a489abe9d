//! Job planning and per-file execution for the minify run.
//!
//! A run is a set of independent file jobs. Each job reads one source
//! file, drives one core pipeline, and writes one output (plus an
//! optional munge map). Jobs share nothing and run in parallel.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use miette::{miette, IntoDiagnostic, Result};
use rayon::prelude::*;
use serde::Serialize;
use squish_core::{CollectingReporter, Options};
use walkdir::WalkDir;

/// Version of the `--json` summary object. Bump on breaking changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything a run needs, resolved from the command line.
pub struct Request {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub options: Options,
    /// Output-name substring rewrite, e.g. `(".js", "-min.js")`.
    pub pattern: Option<(String, String)>,
    /// Tag output names with an abbreviated content digest.
    pub digest: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct Summary {
    ok: bool,
    schema_version: u32,
    files: Vec<FileSummary>,
}

#[derive(Serialize)]
struct FileSummary {
    input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,
    ok: bool,
    bytes_in: u64,
    bytes_out: u64,
    warnings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

struct Job {
    input: PathBuf,
    /// `None` means stdout (single-file mode without `--output`).
    output: Option<PathBuf>,
}

/// Split a `FROM:TO` rewrite spec. `TO` may be empty (pure deletion);
/// `FROM` may not.
pub fn parse_pattern(raw: &str) -> Option<(String, String)> {
    let (from, to) = raw.split_once(':')?;
    if from.is_empty() {
        return None;
    }
    Some((from.to_string(), to.to_string()))
}

/// Run the whole request and print the summary. Fails when any file
/// fails, after all files have been attempted.
pub fn run(request: &Request) -> Result<()> {
    let jobs = plan_jobs(request)?;
    if jobs.is_empty() {
        return Err(miette!(
            "no .js files found under {}",
            request.input.display()
        ));
    }

    let files: Vec<FileSummary> = jobs.par_iter().map(|job| process(job, request)).collect();

    let failed = files.iter().filter(|f| !f.ok).count();
    let total = files.len();

    if request.json {
        let summary = Summary {
            ok: failed == 0,
            schema_version: SCHEMA_VERSION,
            files,
        };
        let json = serde_json::to_string_pretty(&summary).into_diagnostic()?;
        println!("{json}");
    } else {
        for file in &files {
            if let Some(output) = &file.output {
                tracing::info!(
                    "{} -> {} ({} -> {} bytes)",
                    file.input.display(),
                    output.display(),
                    file.bytes_in,
                    file.bytes_out
                );
            }
        }
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(miette!("{failed} of {total} file(s) failed"))
    }
}

/// Expand the input into file jobs. A directory input requires an
/// output directory and mirrors its subdirectory structure there.
fn plan_jobs(request: &Request) -> Result<Vec<Job>> {
    if !request.input.is_dir() {
        // A directory target keeps the input's file name.
        let output = match &request.output {
            Some(out) if out.is_dir() => match request.input.file_name() {
                Some(name) => Some(out.join(name)),
                None => Some(out.clone()),
            },
            other => other.clone(),
        };
        return Ok(vec![Job {
            input: request.input.clone(),
            output,
        }]);
    }

    let out_dir = request.output.as_ref().ok_or_else(|| {
        miette!("--output directory is required when the input is a directory")
    })?;

    let mut jobs = Vec::new();
    for entry in WalkDir::new(&request.input) {
        let entry = entry.into_diagnostic()?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("js") {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(&request.input)
            .into_diagnostic()?;
        jobs.push(Job {
            input: entry.path().to_path_buf(),
            output: Some(out_dir.join(rel)),
        });
    }
    jobs.sort_by(|a, b| a.input.cmp(&b.input));
    Ok(jobs)
}

/// Apply the name rewrite and digest tag to a planned output path.
/// The digest covers the minified bytes, so it runs after the pipeline.
fn output_path(
    planned: &Path,
    code: &[u8],
    pattern: Option<&(String, String)>,
    digest: bool,
) -> PathBuf {
    let mut path = planned.to_path_buf();
    if let Some((from, to)) = pattern {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            let renamed = name.replace(from.as_str(), to.as_str());
            path.set_file_name(renamed);
        }
    }
    if digest {
        path = squish_util::fs::tagged_path(&path, &squish_util::hash::content_tag(code));
    }
    path
}

fn process(job: &Job, request: &Request) -> FileSummary {
    let span = tracing::info_span!("minify", file = %job.input.display());
    let _guard = span.enter();

    let mut summary = FileSummary {
        input: job.input.clone(),
        output: None,
        ok: false,
        bytes_in: 0,
        bytes_out: 0,
        warnings: 0,
        error: None,
    };

    let source = match squish_util::fs::read_source_lossy(&job.input) {
        Ok(source) => source,
        Err(err) => {
            tracing::error!("read failed: {err}");
            summary.error = Some(format!("read failed: {err}"));
            return summary;
        }
    };
    summary.bytes_in = source.len() as u64;

    let mut reporter = CollectingReporter::new();
    let out = match squish_core::minify(&source, &request.options, &mut reporter) {
        Ok(out) => out,
        Err(err) => {
            for message in &reporter.errors {
                tracing::error!("{message}");
            }
            summary.warnings = reporter.warnings.len();
            summary.error = Some(err.to_string());
            return summary;
        }
    };
    for message in &reporter.warnings {
        tracing::warn!("{message}");
    }
    summary.warnings = reporter.warnings.len();
    summary.bytes_out = out.code.len() as u64;

    match &job.output {
        Some(planned) => {
            let target = output_path(
                planned,
                out.code.as_bytes(),
                request.pattern.as_ref(),
                request.digest,
            );
            if let Err(err) = write_outputs(&target, &out.code, out.munge_map.as_deref()) {
                tracing::error!("write failed: {err}");
                summary.error = Some(format!("write failed: {err}"));
                return summary;
            }
            summary.output = Some(target);
        }
        None => {
            println!("{}", out.code);
        }
    }

    summary.ok = true;
    summary
}

fn write_outputs(target: &Path, code: &str, munge_map: Option<&str>) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    squish_util::fs::atomic_write(target, code.as_bytes())?;
    if let Some(map) = munge_map {
        squish_util::fs::atomic_write(&map_path(target), map.as_bytes())?;
    }
    Ok(())
}

/// The munge map sits next to its output: `app-min.js` -> `app-min.js.map`.
fn map_path(target: &Path) -> PathBuf {
    let mut raw: OsString = target.into();
    raw.push(".map");
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pattern_basic() {
        assert_eq!(
            parse_pattern(".js:-min.js"),
            Some((".js".to_string(), "-min.js".to_string()))
        );
    }

    #[test]
    fn test_parse_pattern_empty_to_deletes() {
        assert_eq!(
            parse_pattern(".debug:"),
            Some((".debug".to_string(), String::new()))
        );
    }

    #[test]
    fn test_parse_pattern_rejects_missing_colon_or_from() {
        assert_eq!(parse_pattern("nocolon"), None);
        assert_eq!(parse_pattern(":to"), None);
    }

    #[test]
    fn test_output_path_pattern_rewrite() {
        let path = output_path(
            Path::new("dist/app.js"),
            b"x=1;",
            Some(&(".js".to_string(), "-min.js".to_string())),
            false,
        );
        assert_eq!(path, PathBuf::from("dist/app-min.js"));
    }

    #[test]
    fn test_output_path_digest_tag() {
        let path = output_path(Path::new("dist/app.js"), b"x=1;", None, true);
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("app-"));
        assert!(name.ends_with(".js"));
        assert_eq!(name.len(), "app-.js".len() + 6);
    }

    #[test]
    fn test_map_path_appends_suffix() {
        assert_eq!(
            map_path(Path::new("dist/app-min.js")),
            PathBuf::from("dist/app-min.js.map")
        );
    }
}
