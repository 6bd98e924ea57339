//! Layered generation pipeline
//!
//! Generators are registered per [`GeneratorLevel`]. Levels run in
//! increasing order; each one writes into a fresh delta that is compacted
//! into the base before the next level starts, so later levels can read
//! but never erase what earlier levels committed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::accessibility::AccessibilityParams;
use crate::error::{MapGenError, Result};
use crate::grid::Grid;
use crate::overlay::Overlay;
use crate::pattern::PatternLibrary;
use crate::terrain::TerrainKind;

/// Pipeline priority tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GeneratorLevel {
    Ground,
    River,
    Landscape,
    Resource,
    Structure,
    Transportation,
}

impl GeneratorLevel {
    pub const ALL: [GeneratorLevel; 6] = [
        GeneratorLevel::Ground,
        GeneratorLevel::River,
        GeneratorLevel::Landscape,
        GeneratorLevel::Resource,
        GeneratorLevel::Structure,
        GeneratorLevel::Transportation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GeneratorLevel::Ground => "Ground",
            GeneratorLevel::River => "River",
            GeneratorLevel::Landscape => "Landscape",
            GeneratorLevel::Resource => "Resource",
            GeneratorLevel::Structure => "Structure",
            GeneratorLevel::Transportation => "Transportation",
        }
    }
}

impl fmt::Display for GeneratorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shared state handed to every generator of a run.
pub struct GenContext<'a> {
    pub patterns: &'a PatternLibrary,
    pub rng: &'a mut ChaCha8Rng,
    pub accessibility: &'a AccessibilityParams,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> GenContext<'a> {
    pub fn new(
        patterns: &'a PatternLibrary,
        rng: &'a mut ChaCha8Rng,
        accessibility: &'a AccessibilityParams,
    ) -> Self {
        Self {
            patterns,
            rng,
            accessibility,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// A terrain generator plugged into one level of the pipeline.
///
/// Returning an error aborts the whole run. Failing to place a feature
/// after internal retries is not an error: leave the delta unchanged and
/// return `Ok(())`.
pub trait MapGenerator {
    fn name(&self) -> &str;

    fn level(&self) -> GeneratorLevel;

    fn generate(&self, overlay: &mut Overlay, ctx: &mut GenContext<'_>) -> Result<()>;
}

pub struct Pipeline {
    levels: BTreeMap<GeneratorLevel, Vec<Box<dyn MapGenerator>>>,
    ground: TerrainKind,
    accessibility: AccessibilityParams,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            ground: TerrainKind::Plain,
            accessibility: AccessibilityParams::default(),
            cancel: None,
        }
    }

    /// Open ground kind of the region (the base grid's fill).
    pub fn with_ground(mut self, ground: TerrainKind) -> Self {
        self.ground = ground;
        self
    }

    pub fn with_accessibility(mut self, params: AccessibilityParams) -> Self {
        self.accessibility = params;
        self
    }

    /// Flag checked between levels; setting it aborts the run.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn ground(&self) -> TerrainKind {
        self.ground
    }

    /// Register a generator at its own level, after any already registered there.
    pub fn add(&mut self, generator: Box<dyn MapGenerator>) -> &mut Self {
        self.levels.entry(generator.level()).or_default().push(generator);
        self
    }

    pub fn generator_count(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    /// Names of the generators registered at `level`, in run order.
    pub fn generator_names(&self, level: GeneratorLevel) -> Vec<&str> {
        self.levels
            .get(&level)
            .map(|gens| gens.iter().map(|g| g.name()).collect())
            .unwrap_or_default()
    }

    /// Run every level against `base` and return the committed grid.
    pub fn generate(&self, base: Grid, rng: &mut ChaCha8Rng) -> Result<Grid> {
        let patterns = PatternLibrary::new();
        let mut overlay = Overlay::for_ground(base, self.ground);

        for (&level, generators) in &self.levels {
            if self.is_cancelled() {
                log::warn!("generation cancelled before level {}", level);
                return Err(MapGenError::Cancelled(level));
            }

            log::info!("level {}: {} generator(s)", level, generators.len());
            overlay.reset_delta();
            for generator in generators {
                let mut ctx = GenContext::new(&patterns, rng, &self.accessibility);
                if let Some(flag) = self.cancel.as_deref() {
                    ctx = ctx.with_cancel(flag);
                }
                log::debug!("running {} at level {}", generator.name(), level);
                generator.generate(&mut overlay, &mut ctx)?;
            }
            overlay.compact();
        }

        Ok(overlay.into_base())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
