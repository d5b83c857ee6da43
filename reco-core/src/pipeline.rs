use std::io::BufRead;
use std::sync::Arc;

use tracing::{debug, info, warn, Span};
use uuid::Uuid;

use crate::aggregator::SearchAggregator;
use crate::decoder::decode_bytes;
use crate::decorator::{DecorateError, Decorator};
use crate::geo::GeoResolver;
use crate::models::{Reco, Search};
use crate::rates::RateTable;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to read input stream: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Decorate(#[from] DecorateError),
}

/// Counters for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub lines: u64,
    pub decoded: u64,
    pub skipped: u64,
    pub searches: u64,
    pub failed: u64,
}

/// Decode → group → decorate over a line stream.
///
/// The rate snapshot belongs to this pipeline; the geography resolver is
/// shared with whoever built it.
pub struct Pipeline {
    rates: Option<RateTable>,
    geo: Arc<dyn GeoResolver>,
}

impl Pipeline {
    pub fn new(rates: Option<RateTable>, geo: Arc<dyn GeoResolver>) -> Self {
        if rates.is_none() {
            warn!("No rate snapshot loaded, non-EUR amounts will use the default rate");
        }
        Self { rates, geo }
    }

    /// Lazily produce one search per contiguous group of recos in `reader`
    pub fn run<R: BufRead>(&self, reader: R) -> Searches<'_, R> {
        let run_id = Uuid::new_v4();
        Searches {
            lines: reader.split(b'\n'),
            aggregator: SearchAggregator::new(),
            decorator: Decorator::new(self.rates.as_ref(), self.geo.as_ref()),
            stats: PipelineStats::default(),
            span: tracing::info_span!("pipeline", %run_id),
            done: false,
        }
    }
}

/// Iterator returned by [`Pipeline::run`]
pub struct Searches<'a, R> {
    lines: std::io::Split<R>,
    aggregator: SearchAggregator,
    decorator: Decorator<'a>,
    stats: PipelineStats,
    span: Span,
    done: bool,
}

impl<R: BufRead> Searches<'_, R> {
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    fn decorate(&mut self, group: Vec<Reco>) -> Option<Result<Search, PipelineError>> {
        match self.decorator.decorate(&group) {
            Ok(search) => {
                self.stats.searches += 1;
                Some(Ok(search))
            }
            Err(DecorateError::EmptyGroup) => None,
            Err(e) => {
                warn!("Dropping search: {}", e);
                self.stats.failed += 1;
                Some(Err(e.into()))
            }
        }
    }

    fn finish(&mut self) {
        self.done = true;
        info!(
            lines = self.stats.lines,
            decoded = self.stats.decoded,
            skipped = self.stats.skipped,
            searches = self.stats.searches,
            failed = self.stats.failed,
            "Pipeline run complete"
        );
    }
}

impl<R: BufRead> Iterator for Searches<'_, R> {
    type Item = Result<Search, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let span = self.span.clone();
        let _enter = span.enter();

        while !self.done {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    warn!(
                        pending = self.aggregator.pending(),
                        "Input unreadable, dropping the open group"
                    );
                    self.finish();
                    return Some(Err(e.into()));
                }
                None => {
                    self.finish();
                    let group = self.aggregator.finish()?;
                    return self.decorate(group);
                }
            };

            self.stats.lines += 1;
            let reco = match decode_bytes(&line) {
                Ok(reco) => reco,
                Err(e) => {
                    debug!(line = self.stats.lines, "Skipping record: {}", e);
                    self.stats.skipped += 1;
                    continue;
                }
            };
            self.stats.decoded += 1;

            if let Some(group) = self.aggregator.push(reco) {
                if let Some(item) = self.decorate(group) {
                    return Some(item);
                }
            }
        }
        None
    }
}
