//! Artifact Persistence
//!
//! Filesystem store for per-gene-set run artifacts, keyed by gene set
//! identifier under `<output_dir>/runs/<id>/`. Every stage writes its output
//! as soon as it completes so a failed run is auditable up to the failing
//! stage. Failed runs additionally append a line to `<output_dir>/errors.log`;
//! that append is best-effort and never raises.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::pipeline::PipelineRun;
use crate::utils::error::AppResult;

const RUNS_DIR: &str = "runs";
const ERRORS_LOG: &str = "errors.log";

const BASELINE_FILE: &str = "baseline.txt";
const TOPIC_CLAIMS_FILE: &str = "topic_claims.json";
const TOPIC_VERIFICATION_FILE: &str = "topic_verification.txt";
const REVISED_FILE: &str = "revised.txt";
const ANALYSIS_CLAIMS_FILE: &str = "analysis_claims.json";
const ANALYSIS_VERIFICATION_FILE: &str = "analysis_verification.txt";
const FINAL_FILE: &str = "final.txt";
const TOPIC_RESULT_FILE: &str = "topic.txt";
const COT_FILE: &str = "cot.txt";

/// Artifacts read back for one gene set; absent stages stay `None`.
#[derive(Debug, Default, Clone)]
pub struct StoredRun {
    pub baseline: Option<String>,
    pub topic_claims: Option<Vec<String>>,
    pub topic_verification: Option<String>,
    pub revised: Option<String>,
    pub analysis_claims: Option<Vec<String>>,
    pub analysis_verification: Option<String>,
    pub final_text: Option<String>,
}

/// Filesystem store rooted at the configured output directory.
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `output_dir`, creating the directory tree.
    pub fn new(output_dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(output_dir.join(RUNS_DIR))?;
        Ok(Self {
            root: output_dir.to_path_buf(),
        })
    }

    fn run_dir(&self, id: &str) -> PathBuf {
        self.root.join(RUNS_DIR).join(id)
    }

    fn write_file(&self, id: &str, file: &str, content: &str) -> AppResult<()> {
        let dir = self.run_dir(id);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(file), content)?;
        Ok(())
    }

    fn read_file(&self, id: &str, file: &str) -> Option<String> {
        fs::read_to_string(self.run_dir(id).join(file)).ok()
    }

    pub fn save_baseline(&self, id: &str, text: &str) -> AppResult<()> {
        self.write_file(id, BASELINE_FILE, text)
    }

    pub fn save_topic_claims(&self, id: &str, claims: &[String]) -> AppResult<()> {
        self.write_file(id, TOPIC_CLAIMS_FILE, &serde_json::to_string_pretty(claims)?)
    }

    pub fn save_topic_verification(&self, id: &str, blob: &str) -> AppResult<()> {
        self.write_file(id, TOPIC_VERIFICATION_FILE, blob)
    }

    pub fn save_revised(&self, id: &str, text: &str) -> AppResult<()> {
        self.write_file(id, REVISED_FILE, text)
    }

    pub fn save_analysis_claims(&self, id: &str, claims: &[String]) -> AppResult<()> {
        self.write_file(
            id,
            ANALYSIS_CLAIMS_FILE,
            &serde_json::to_string_pretty(claims)?,
        )
    }

    pub fn save_analysis_verification(&self, id: &str, blob: &str) -> AppResult<()> {
        self.write_file(id, ANALYSIS_VERIFICATION_FILE, blob)
    }

    pub fn save_final(&self, id: &str, text: &str) -> AppResult<()> {
        self.write_file(id, FINAL_FILE, text)
    }

    /// Topic-mode result (single-round revised process name).
    pub fn save_topic_result(&self, id: &str, text: &str) -> AppResult<()> {
        self.write_file(id, TOPIC_RESULT_FILE, text)
    }

    /// CoT-mode result (baseline-only chain-of-thought annotation).
    pub fn save_cot_summary(&self, id: &str, text: &str) -> AppResult<()> {
        self.write_file(id, COT_FILE, text)
    }

    /// Persist every artifact of a completed run at once.
    pub fn save_run(&self, run: &PipelineRun) -> AppResult<()> {
        self.save_baseline(&run.id, &run.baseline)?;
        self.save_topic_claims(&run.id, &run.topic_claims)?;
        self.save_topic_verification(
            &run.id,
            &crate::models::pipeline::verification_blob(&run.topic_verification),
        )?;
        self.save_revised(&run.id, &run.revised)?;
        self.save_analysis_claims(&run.id, &run.analysis_claims)?;
        self.save_analysis_verification(
            &run.id,
            &crate::models::pipeline::verification_blob(&run.analysis_verification),
        )?;
        self.save_final(&run.id, &run.final_text)
    }

    /// Read back whatever artifacts exist for a gene set.
    pub fn load_run(&self, id: &str) -> StoredRun {
        let parse_claims = |file: &str| {
            self.read_file(id, file)
                .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
        };
        StoredRun {
            baseline: self.read_file(id, BASELINE_FILE),
            topic_claims: parse_claims(TOPIC_CLAIMS_FILE),
            topic_verification: self.read_file(id, TOPIC_VERIFICATION_FILE),
            revised: self.read_file(id, REVISED_FILE),
            analysis_claims: parse_claims(ANALYSIS_CLAIMS_FILE),
            analysis_verification: self.read_file(id, ANALYSIS_VERIFICATION_FILE),
            final_text: self.read_file(id, FINAL_FILE),
        }
    }

    /// Append a failure line for a gene set to the errors log.
    ///
    /// Best-effort: a failure to record a failure is logged and swallowed.
    pub fn append_error(&self, id: &str, error: &str) {
        let line = format!("{}\t====There are an error {} here.====\n", id, error);
        let result = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join(ERRORS_LOG))
            .and_then(|mut f| f.write_all(line.as_bytes()));
        if let Err(e) = result {
            tracing::warn!(error = %e, id, "failed to append error record");
        }
    }

    /// Path of the errors log (exposed for the CLI summary).
    pub fn errors_log_path(&self) -> PathBuf {
        self.root.join(ERRORS_LOG)
    }
}
