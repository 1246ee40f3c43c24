use crate::config::PlotConfig;
use crate::plot::Figure;
use anyhow::{Context, Result};
use minifb::{Key, Window, WindowOptions};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const WINDOW_TITLE: &str = "normal-intensity";

/// Where a figure is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Native window, blocking until it is closed.
    Window,
    /// Image file; `.svg` is written as vector graphics, anything else as a bitmap.
    File(PathBuf),
}

impl Target {
    pub fn render(&self, figure: &Figure, cfg: &PlotConfig) -> Result<()> {
        match self {
            Target::Window => show_window(figure, cfg),
            Target::File(file) => write_file(figure, cfg, file),
        }
    }
}

fn show_window(figure: &Figure, cfg: &PlotConfig) -> Result<()> {
    let width = cfg.width as usize;
    let height = cfg.height as usize;

    let mut rgb = vec![0u8; width * height * 3];
    let root = BitMapBackend::with_buffer(&mut rgb, (cfg.width, cfg.height)).into_drawing_area();
    figure.draw(root, cfg).context("failed to draw figure")?;
    let pixels = rgb_to_pixels(&rgb);

    let mut window = Window::new(WINDOW_TITLE, width, height, WindowOptions::default())
        .context("failed to open window")?;
    window.set_target_fps(30);
    log::info!("waiting for the window to be closed");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window
            .update_with_buffer(&pixels, width, height)
            .context("failed to update window")?;
    }

    Ok(())
}

fn write_file(figure: &Figure, cfg: &PlotConfig, file: &Path) -> Result<()> {
    let size = (cfg.width, cfg.height);
    let is_svg = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    let result = if is_svg {
        figure.draw(SVGBackend::new(file, size).into_drawing_area(), cfg)
    } else {
        figure.draw(BitMapBackend::new(file, size).into_drawing_area(), cfg)
    };
    result.with_context(|| format!("failed to write {file:?}"))?;

    log::info!("wrote {file:?}");

    Ok(())
}

/// Pack an RGB byte buffer into the `0RGB` words the window expects.
fn rgb_to_pixels(rgb: &[u8]) -> Vec<u32> {
    rgb.chunks_exact(3)
        .map(|px| u32::from_be_bytes([0, px[0], px[1], px[2]]))
        .collect()
}
