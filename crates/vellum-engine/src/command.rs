//! Render engine backed by the Mermaid command-line renderer (`mmdc`).

use std::{io, process::Stdio};

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::{fs, process::Command};

use vellum_core::{
    artifact::VectorArtifact, engine::RenderEngine, error::EngineError, generation::RenderId,
};

use crate::{config::EngineConfig, detect::detect};

const INPUT_FILE: &str = "input.mmd";
const OUTPUT_FILE: &str = "output.svg";

/// Renders diagrams by running an external program once per attempt.
///
/// Each attempt gets its own temporary directory holding the input text and
/// the produced SVG, so concurrent attempts never share files. Validation
/// is done in-process by [`detect`]; only rendering spawns the program.
#[derive(Debug, Clone, Default)]
pub struct CommandEngine {
    config: EngineConfig,
}

impl CommandEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn spawn_error(&self, err: io::Error) -> EngineError {
        if err.kind() == io::ErrorKind::NotFound {
            EngineError::new(format!(
                "Renderer `{}` not found; install @mermaid-js/mermaid-cli or set engine.program",
                self.config.program().display()
            ))
        } else {
            EngineError::new(format!(
                "Failed to run `{}`: {err}",
                self.config.program().display()
            ))
        }
    }
}

#[async_trait]
impl RenderEngine for CommandEngine {
    async fn validate(&self, text: &str) -> Result<bool, EngineError> {
        match detect(text) {
            Ok(Some(kind)) => {
                debug!(kind:%; "Detected diagram type");
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => Err(EngineError::new(err.to_string())),
        }
    }

    async fn render(&self, id: &RenderId, text: &str) -> Result<VectorArtifact, EngineError> {
        let workdir = tempfile::Builder::new().prefix("vellum-").tempdir()?;
        let input = workdir.path().join(INPUT_FILE);
        let output = workdir.path().join(OUTPUT_FILE);
        fs::write(&input, text).await?;

        debug!(
            program = self.config.program().display().to_string(),
            id:%;
            "Running renderer"
        );
        let result = Command::new(self.config.program())
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .arg("--theme")
            .arg(self.config.theme())
            .arg("--backgroundColor")
            .arg(self.config.background())
            .arg("--svgId")
            .arg(id.to_string())
            .arg("--quiet")
            .args(self.config.extra_args())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| self.spawn_error(err))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            warn!(id:%, status:% = result.status; "Renderer failed");
            return Err(match failure_message(&stderr) {
                Some(message) => EngineError::new(message),
                None => EngineError::unknown(),
            });
        }

        let svg = fs::read_to_string(&output).await?;
        info!(id:%, bytes = svg.len(); "Renderer produced SVG");
        Ok(VectorArtifact::from(svg))
    }
}

/// Extract the user-facing part of the renderer's stderr.
///
/// Mermaid reports parse errors as an `Error:` line followed by a source
/// excerpt and then a JavaScript stack trace. The excerpt is kept, the
/// stack trace dropped.
fn failure_message(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim_end)
        .take_while(|line| !line.trim_start().starts_with("at "))
        .filter(|line| !line.trim().is_empty())
        .collect();

    let (first, rest) = lines.split_first()?;
    let first = first.trim_start();
    let first = first.strip_prefix("Error:").map_or(first, str::trim_start);

    let mut message = first.to_string();
    for line in rest {
        message.push('\n');
        message.push_str(line);
    }
    Some(message)
}
