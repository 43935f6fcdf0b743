//! Trying candidates until one opens

use crate::collector::shuffle_candidates;
use crate::launcher::Launcher;
use crate::opener::{open_at_page, pick_page};
use crate::page_count::PageCounter;
use crate::RandpageError;
use rand::Rng;
use std::collections::VecDeque;
use std::path::PathBuf;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The viewer fetched `path`, opened at `page`
    Success { path: PathBuf, page: u32 },
    /// Every candidate failed
    Exhausted,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Shuffles candidates and opens the first one that works
///
/// Randomness, page counting and launching are all injected so a run can
/// be made deterministic.
pub struct Driver<R, C, L> {
    rng: R,
    counter: C,
    launcher: L,
}

impl<R, C, L> Driver<R, C, L>
where
    R: Rng,
    C: PageCounter,
    L: Launcher,
{
    pub fn new(rng: R, counter: C, launcher: L) -> Self {
        Self {
            rng,
            counter,
            launcher,
        }
    }

    /// Try candidates in shuffled order; a failed candidate is never retried
    pub fn run(&mut self, mut candidates: Vec<PathBuf>) -> Outcome {
        shuffle_candidates(&mut candidates, &mut self.rng);
        let mut candidates = VecDeque::from(candidates);

        while let Some(path) = candidates.pop_front() {
            let page_count = match self.counter.page_count(&path).and_then(|n| {
                if n == 0 {
                    Err(RandpageError::PageCount("document has no pages".to_string()))
                } else {
                    Ok(n)
                }
            }) {
                Ok(n) => n,
                Err(e) => {
                    log::info!("counting pages path={} err={}", path.display(), e);
                    continue;
                }
            };

            let page = pick_page(&mut self.rng, page_count);
            log::info!("opening pdf path={} page={}", path.display(), page);

            if let Err(e) = open_at_page(&path, page, &self.launcher) {
                log::error!("opening pdf path={} err={}", path.display(), e);
                continue;
            }

            return Outcome::Success { path, page };
        }

        Outcome::Exhausted
    }
}
