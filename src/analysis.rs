use crate::config::Config;
use crate::display::Target;
use crate::plot::{Figure, Mode, Scatter2d, Scatter3d};
use crate::stats::{standardize, summarize};
use crate::table::{Profile, load_table};
use anyhow::{Context, Result};
use ndarray::Array1;
use std::path::Path;

/// Standardize-and-plot pipeline over one intensity log.
pub struct Analysis {
    cfg: Config,
}

impl Analysis {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    pub fn run<P: AsRef<Path>>(&self, file: P, mode: Mode, target: &Target) -> Result<()> {
        let profile = self.load(file).context("failed to load profile")?;

        let figure = self
            .figure(&profile, mode)
            .context("failed to prepare figure")?;

        log::info!("rendering {mode:?} figure to {target:?}");
        target
            .render(&figure, &self.cfg.plot)
            .context("failed to render figure")?;

        Ok(())
    }

    pub fn load<P: AsRef<Path>>(&self, file: P) -> Result<Profile> {
        let file = file.as_ref();
        let table = load_table(file).context("failed to load table")?;
        log::info!("loaded {file:?}: {} rows x {} columns", table.nrows(), table.ncols());

        let profile = Profile::from_table(table.view()).context("failed to extract profile")?;
        log::info!("extracted {} samples", profile.len());

        Ok(profile)
    }

    pub fn standardized_intensity(&self, profile: &Profile) -> Result<Array1<f64>> {
        let intensity_z = standardize(profile.intensity.view(), &self.cfg.reference)
            .context("failed to standardize intensity")?;

        log::info!("raw intensity: {:?}", summarize(profile.intensity.view()));
        log::info!("standardized intensity: {:?}", summarize(intensity_z.view()));

        Ok(intensity_z)
    }

    /// Cell id against standardized intensity, colored by normal direction.
    pub fn scatter_2d(&self, profile: &Profile) -> Result<Scatter2d> {
        let intensity_z = self.standardized_intensity(profile)?;
        Scatter2d::new(
            profile.cell_id.clone(),
            intensity_z,
            profile.normal_dir.clone(),
        )
    }

    /// Normal direction, cell id and standardized intensity.
    pub fn scatter_3d(&self, profile: &Profile) -> Result<Scatter3d> {
        let intensity_z = self.standardized_intensity(profile)?;
        Scatter3d::new(
            profile.normal_dir.clone(),
            profile.cell_id.clone(),
            intensity_z,
        )
    }

    pub fn figure(&self, profile: &Profile, mode: Mode) -> Result<Figure> {
        let figure = match mode {
            Mode::Flat => Figure::Flat(self.scatter_2d(profile)?),
            Mode::Solid => Figure::Solid(self.scatter_3d(profile)?),
        };
        Ok(figure)
    }
}
