//! Run pipeline
//!
//! The end-to-end path of one simulation request: resolve the backend, parse
//! the shot-count header, compile the instruction stream, execute, and render
//! the output record text. Any failure aborts the run before output is
//! produced.

use pulsim_backend::{BackendKind, SimulationResult};
use pulsim_compiler::InstructionCompiler;
use pulsim_config::DeviceConfig;
use pulsim_core::{PulsimError, PulsimResult, Shots};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// Run Configuration
// ============================================================================

/// Per-run settings
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Backend identifier, resolved through the dispatcher
    pub backend: String,
    /// RNG seed; a fresh entropy seed is drawn when absent
    pub seed: Option<u64>,
    /// Override for the stream's shot-count header
    pub shots: Option<Shots>,
    /// Print pipeline diagnostics to stderr
    pub verbose: bool,
}

impl RunConfig {
    /// Settings for the given backend, with defaults otherwise
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            seed: None,
            shots: None,
            verbose: false,
        }
    }

    /// Fix the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the shot count
    pub fn with_shots(mut self, shots: Shots) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Enable pipeline diagnostics
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

// ============================================================================
// Simulator
// ============================================================================

/// One configured simulator instance
#[derive(Debug, Clone)]
pub struct Simulator {
    device: DeviceConfig,
    run: RunConfig,
}

impl Simulator {
    /// Build from an already-parsed device configuration
    pub fn new(device: DeviceConfig, run: RunConfig) -> Self {
        Self { device, run }
    }

    /// Build from the device configuration JSON document
    pub fn from_json(config_json: &str, run: RunConfig) -> PulsimResult<Self> {
        Ok(Self::new(DeviceConfig::from_json(config_json)?, run))
    }

    /// The device configuration
    pub fn device(&self) -> &DeviceConfig {
        &self.device
    }

    /// Run an instruction stream and return the structured result
    ///
    /// The first line of the stream is the shot count; the remaining lines
    /// are channel instructions.
    pub fn run_program(&self, program_text: &str) -> PulsimResult<SimulationResult> {
        // resolve the backend before doing any work on the stream
        let kind = BackendKind::from_name(&self.run.backend)?;

        let mut lines = program_text.lines();
        let header = lines
            .next()
            .ok_or_else(|| PulsimError::InvalidShotCount("<empty stream>".into()))?;
        let shots = self.run.shots.map(Ok).unwrap_or_else(|| {
            header
                .trim()
                .parse::<Shots>()
                .map_err(|_| PulsimError::InvalidShotCount(header.to_string()))
        })?;

        let program = InstructionCompiler::new(&self.device).compile(lines)?;
        if self.run.verbose {
            eprintln!(
                "pulsim: compiled {} instructions, {} measured qubits, horizon {}",
                program.instructions.len(),
                program.measured_qubits.len(),
                program.time_horizon()
            );
            eprintln!("pulsim: dispatching {shots} shots to {kind}");
        }

        let mut rng = match self.run.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        kind.backend()
            .execute(&self.device, &program, shots, &mut rng)
    }

    /// Run an instruction stream and render the output record text
    pub fn execute(&self, program_text: &str) -> PulsimResult<String> {
        Ok(render(&self.run_program(program_text)?))
    }
}

/// Render a result as the two-block output record text: one line of
/// space-joined bits per shot, then one `I Q` line per measured qubit per
/// shot
pub fn render(result: &SimulationResult) -> String {
    let mut out = String::new();
    for record in &result.records {
        let bits: Vec<String> = record.bits.iter().map(u8::to_string).collect();
        out.push_str(&bits.join(" "));
        out.push('\n');
    }
    for record in &result.records {
        for point in &record.iq {
            out.push_str(&point.to_string());
            out.push('\n');
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
