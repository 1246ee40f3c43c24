use crate::config::PlotConfig;
use anyhow::{Result, bail};
use ndarray::Array1;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// Plot mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Cell id against standardized intensity, colored by normal direction.
    #[value(name = "2d")]
    Flat,
    /// Normal direction, cell id and standardized intensity in 3D.
    #[value(name = "3d")]
    Solid,
}

/// 2D scatter data with an optional color value per point.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter2d {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    /// Either empty (single color) or one value per point.
    pub color: Array1<f64>,
}

impl Scatter2d {
    pub fn new(x: Array1<f64>, y: Array1<f64>, color: Array1<f64>) -> Result<Self> {
        if x.len() != y.len() {
            bail!("x and y must have equal lengths, but have {} and {}", x.len(), y.len());
        }
        if !color.is_empty() && color.len() != x.len() {
            bail!("color must be empty or have length {}, but has {}", x.len(), color.len());
        }
        Ok(Self { x, y, color })
    }
}

/// 3D scatter data.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter3d {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub z: Array1<f64>,
}

impl Scatter3d {
    pub fn new(x: Array1<f64>, y: Array1<f64>, z: Array1<f64>) -> Result<Self> {
        if x.len() != y.len() || x.len() != z.len() {
            bail!(
                "x, y and z must have equal lengths, but have {}, {} and {}",
                x.len(),
                y.len(),
                z.len()
            );
        }
        Ok(Self { x, y, z })
    }
}

/// A figure ready to be drawn on any backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Flat(Scatter2d),
    Solid(Scatter3d),
}

impl Figure {
    pub fn draw<DB>(&self, root: DrawingArea<DB, Shift>, cfg: &PlotConfig) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        match self {
            Figure::Flat(scatter) => draw_2d(root, scatter, cfg),
            Figure::Solid(scatter) => draw_3d(root, scatter, cfg),
        }
    }
}

pub fn draw_2d<DB>(root: DrawingArea<DB, Shift>, scatter: &Scatter2d, cfg: &PlotConfig) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(axis_range(&scatter.x), axis_range(&scatter.y))?;

    chart
        .configure_mesh()
        .x_desc("Cell-id")
        .y_desc("Standardised intensity")
        .draw()?;

    let size = cfg.point_size as i32;
    let color_range = value_range(&scatter.color);
    let points = scatter
        .x
        .iter()
        .zip(scatter.y.iter())
        .enumerate()
        .filter(|(_, (x, y))| x.is_finite() && y.is_finite())
        .map(|(i_pnt, (&x, &y))| {
            let color = match (scatter.color.get(i_pnt), &color_range) {
                (Some(&val), Some(range)) => point_color(val, range),
                _ => BLUE.to_rgba(),
            };
            Circle::new((x, y), size, color.filled())
        });
    chart.draw_series(points)?;

    root.present()?;

    Ok(())
}

pub fn draw_3d<DB>(root: DrawingArea<DB, Shift>, scatter: &Scatter3d, cfg: &PlotConfig) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    // Plotters draws its second axis vertically, so intensity goes there.
    let x_range = axis_range(&scatter.x);
    let v_range = axis_range(&scatter.z);
    let d_range = axis_range(&scatter.y);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_3d(x_range.clone(), v_range.clone(), d_range.clone())?;

    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.4;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    chart.configure_axes().draw()?;

    let size = cfg.point_size as i32;
    let points = scatter
        .x
        .iter()
        .zip(scatter.y.iter())
        .zip(scatter.z.iter())
        .filter(|((x, y), z)| x.is_finite() && y.is_finite() && z.is_finite())
        .map(|((&x, &y), &z)| Circle::new((x, z, y), size, BLUE.filled()));
    chart.draw_series(points)?;

    let style = ("sans-serif", 16).into_font().color(&BLACK);
    chart.draw_series([
        Text::new(
            "Normal direction",
            (x_range.end, v_range.start, d_range.start),
            style.clone(),
        ),
        Text::new(
            "Cell-id",
            (x_range.start, v_range.start, d_range.end),
            style.clone(),
        ),
        Text::new(
            "Standardises intensity",
            (x_range.start, v_range.end, d_range.start),
            style,
        ),
    ])?;

    root.present()?;

    Ok(())
}

/// Range of the finite values, or `None` if there are none.
fn value_range(vals: &Array1<f64>) -> Option<Range<f64>> {
    vals.iter()
        .copied()
        .filter(|val| val.is_finite())
        .fold(None, |range, val| match range {
            None => Some(val..val),
            Some(range) => Some(range.start.min(val)..range.end.max(val)),
        })
}

/// Padded axis range covering every finite value.
fn axis_range(vals: &Array1<f64>) -> Range<f64> {
    match value_range(vals) {
        None => 0.0..1.0,
        Some(range) if range.start == range.end => (range.start - 1.0)..(range.end + 1.0),
        Some(range) => {
            let pad = 0.05 * (range.end - range.start);
            (range.start - pad)..(range.end + pad)
        }
    }
}

/// Map a value onto a blue to red hue over the given range.
fn point_color(val: f64, range: &Range<f64>) -> RGBAColor {
    let span = range.end - range.start;
    let frac = if span > 0.0 && val.is_finite() {
        ((val - range.start) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    HSLColor(0.66 * (1.0 - frac), 0.8, 0.45).to_rgba()
}
