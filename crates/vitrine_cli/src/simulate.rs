//! Headless simulations printed as JSON lines

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::Serialize;
use vitrine_animation::{ContinuousCounter, SpringConfig, SpringStatus};
use vitrine_core::events::{EventSource, FrameTick};
use vitrine_landing::stats::StatFormat;
use vitrine_landing::{LandingConfig, LandingPage, PageFrame, StatKind, StatsError, Viewport};

/// One counter frame
#[derive(Debug, Serialize)]
pub struct CounterRow {
    pub frame: u32,
    pub time: f64,
    pub value: f64,
    pub display: String,
    pub status: SpringStatus,
}

pub struct CounterRun {
    pub from: f64,
    pub to: f64,
    pub config: SpringConfig,
    pub format: StatFormat,
    pub dt: f64,
    pub frames: u32,
}

/// Step a counter until it settles or `frames` run out
pub fn counter(run: &CounterRun) -> Vec<CounterRow> {
    let mut counter =
        ContinuousCounter::with_formatter(run.from, run.to, run.config, run.format.formatter());
    let mut rows = Vec::with_capacity(run.frames as usize);

    for frame in 1..=run.frames {
        let status = counter.tick(run.dt);
        rows.push(CounterRow {
            frame,
            time: frame as f64 * run.dt,
            value: counter.value(),
            display: counter.display(),
            status,
        });
        if status != SpringStatus::Animating {
            break;
        }
    }
    rows
}

/// Hero channel values at one headline progress
#[derive(Debug, Serialize)]
pub struct ScrollRow {
    pub progress: f64,
    pub blob_opacity: f64,
    pub blur_px: f64,
    pub blur_filter: String,
}

/// Sample the hero channels at each progress
pub fn scroll(config: &LandingConfig, progress: &[f64]) -> Result<Vec<ScrollRow>> {
    let opacity = config.hero.opacity_breakpoints()?;
    let blur = config.hero.blur_breakpoints()?;

    Ok(progress
        .iter()
        .map(|&p| {
            let blur_px = blur.sample(p);
            ScrollRow {
                progress: p,
                blob_opacity: opacity.sample(p),
                blur_px,
                blur_filter: vitrine_landing::hero::blur_filter(blur_px),
            }
        })
        .collect())
}

pub struct PageRun {
    pub viewport_height: f64,
    pub frames: u32,
    pub dt: f64,
    /// Pixels scrolled per frame
    pub scroll_step: f64,
    /// Print every n-th frame
    pub every: u32,
    pub blocks: f64,
}

#[derive(Debug, Serialize)]
pub struct PageRow {
    pub frame: u32,
    pub scroll_y: f64,
    #[serde(flatten)]
    pub page: PageFrame,
}

/// Statistics that look like a live network: the chain grows one block per fetch
fn scripted_source(start: f64) -> impl FnMut(StatKind) -> Result<f64, StatsError> {
    let mut height = start;
    move |kind| match kind {
        StatKind::BlocksProcessed => {
            height += 1.0;
            Ok(height)
        }
        StatKind::SubnetCount => Ok(37.0),
        StatKind::TransactionRate => Ok(11_500.0),
        StatKind::StateSize => Ok(3_456_789_000_000.0),
    }
}

/// Mount a page on scripted frame and scroll sources, scroll down while ticking
pub fn page(config: &LandingConfig, run: &PageRun) -> Result<Vec<PageRow>> {
    let mut page = LandingPage::new(config, Viewport::new(0.0, run.viewport_height))
        .context("Failed to build landing page")?;
    page.set_stats_source(scripted_source(run.blocks));
    let page = Rc::new(RefCell::new(page));

    let frames = EventSource::<FrameTick>::new();
    let scroll = EventSource::<Viewport>::new();
    let mut mounted = LandingPage::mount(&page, &frames, &scroll);

    let every = run.every.max(1);
    let mut rows = Vec::new();
    for frame in 0..run.frames {
        let scroll_y = f64::from(frame) * run.scroll_step;
        scroll.emit(&Viewport::new(scroll_y, run.viewport_height));
        frames.emit(&FrameTick::new(run.dt));

        if frame % every == 0 || frame + 1 == run.frames {
            rows.push(PageRow {
                frame,
                scroll_y,
                page: page.borrow().frame(),
            });
        }
    }

    mounted.unmount();
    Ok(rows)
}

/// Print rows as JSON lines (or one pretty document)
pub fn print_rows<T: Serialize>(rows: &[T], pretty: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, rows).context("Failed to write JSON")?;
        writeln!(out)?;
    } else {
        for row in rows {
            serde_json::to_writer(&mut out, row).context("Failed to write JSON")?;
            writeln!(out)?;
        }
    }
    Ok(())
}
