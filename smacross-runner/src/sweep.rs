//! Parameter sweep over short × long window grids.

use rayon::prelude::*;
use std::cmp::Ordering;

use smacross_core::{EngineConfig, SharpeRatio, StrategyParams};

use crate::data_loader::LoadedSeries;
use crate::runner::{BacktestResult, RunError, Runner};

/// Window values to sweep over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamGrid {
    pub short_windows: Vec<usize>,
    pub long_windows: Vec<usize>,
    /// Keep pairs with `short >= long`. Off by default.
    pub include_degenerate: bool,
}

impl ParamGrid {
    pub fn new(short_windows: Vec<usize>, long_windows: Vec<usize>) -> Self {
        Self {
            short_windows,
            long_windows,
            include_degenerate: false,
        }
    }

    /// Short 10, 20, 50 against long 100, 150, 200.
    pub fn crossover_default() -> Self {
        Self::new(vec![10, 20, 50], vec![100, 150, 200])
    }

    pub fn with_degenerate(mut self, include: bool) -> Self {
        self.include_degenerate = include;
        self
    }

    /// Number of pairs [`Self::pairs`] yields.
    pub fn size(&self) -> usize {
        self.pairs().len()
    }

    /// Pairs in short-major order.
    pub fn pairs(&self) -> Vec<StrategyParams> {
        self.short_windows
            .iter()
            .flat_map(|&short| {
                self.long_windows
                    .iter()
                    .map(move |&long| StrategyParams::new(short, long))
            })
            .filter(|p| self.include_degenerate || !p.is_degenerate())
            .collect()
    }
}

/// Parameter sweep executor.
///
/// Runs one backtest per grid pair over a shared series, optionally in parallel.
/// Parallel and sequential sweeps return identical results in grid order.
pub struct ParamSweep {
    runner: Runner,
    engine_config: EngineConfig,
    parallel: bool,
}

impl ParamSweep {
    pub fn new(runner: Runner) -> Self {
        Self {
            runner,
            engine_config: EngineConfig::default(),
            parallel: true,
        }
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_engine_config(mut self, engine_config: EngineConfig) -> Self {
        self.engine_config = engine_config;
        self
    }

    pub fn sweep(&self, grid: &ParamGrid, loaded: &LoadedSeries) -> Result<SweepResults, RunError> {
        self.sweep_with_progress(grid, loaded, |_, _, _| {})
    }

    /// The callback receives (grid index, total, result). Under
    /// parallel execution calls arrive in completion order.
    pub fn sweep_with_progress<F>(
        &self,
        grid: &ParamGrid,
        loaded: &LoadedSeries,
        progress: F,
    ) -> Result<SweepResults, RunError>
    where
        F: Fn(usize, usize, &BacktestResult) + Send + Sync,
    {
        let pairs = grid.pairs();
        let total = pairs.len();
        let run = |(idx, params): (usize, &StrategyParams)| -> Result<BacktestResult, RunError> {
            let result = self.runner.run(loaded, params, &self.engine_config)?;
            progress(idx, total, &result);
            Ok(result)
        };

        let results = if self.parallel {
            pairs
                .par_iter()
                .enumerate()
                .map(run)
                .collect::<Result<Vec<_>, RunError>>()?
        } else {
            pairs
                .iter()
                .enumerate()
                .map(run)
                .collect::<Result<Vec<_>, RunError>>()?
        };

        Ok(SweepResults::new(results))
    }
}

/// Results from a parameter sweep, in grid order.
#[derive(Debug, Clone)]
pub struct SweepResults {
    results: Vec<BacktestResult>,
}

impl SweepResults {
    fn new(results: Vec<BacktestResult>) -> Self {
        Self { results }
    }

    pub fn all(&self) -> &[BacktestResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, params: &StrategyParams) -> Option<&BacktestResult> {
        self.results.iter().find(|r| r.params == *params)
    }

    /// Best first: defined Sharpe descending, undefined Sharpe last, then
    /// total return descending.
    pub fn ranked(&self) -> Vec<&BacktestResult> {
        let mut sorted: Vec<_> = self.results.iter().collect();
        sorted.sort_by(|a, b| compare_results(a, b));
        sorted
    }

    pub fn top_n(&self, n: usize) -> Vec<&BacktestResult> {
        self.ranked().into_iter().take(n).collect()
    }

    pub fn best(&self) -> Option<&BacktestResult> {
        self.ranked().into_iter().next()
    }
}

fn compare_results(a: &BacktestResult, b: &BacktestResult) -> Ordering {
    let (ma, mb) = (&a.output.metrics, &b.output.metrics);
    let by_sharpe = match (ma.sharpe_ratio, mb.sharpe_ratio) {
        (SharpeRatio::Defined(x), SharpeRatio::Defined(y)) => y.total_cmp(&x),
        (SharpeRatio::Defined(_), SharpeRatio::Undefined(_)) => Ordering::Less,
        (SharpeRatio::Undefined(_), SharpeRatio::Defined(_)) => Ordering::Greater,
        (SharpeRatio::Undefined(_), SharpeRatio::Undefined(_)) => Ordering::Equal,
    };
    by_sharpe.then_with(|| mb.total_return.total_cmp(&ma.total_return))
}
